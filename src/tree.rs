// SPDX-License-Identifier: MIT

//! The API review tree: lines of typed tokens, nested by scope.
//!
//! Language front ends produce a forest of [`ReviewLine`]s per revision.
//! Everything downstream (rendering, identity hashing, diffing) works on
//! that forest and never looks at source code.

mod code_file;
mod index;
mod line;
mod token;

pub use code_file::{CodeDiagnostic, CodeFile, DiagnosticLevel};
pub use index::{DanglingReference, IndexedLine, LineIndex, ReferenceKind};
pub use line::{DiffKind, ReviewLine};
pub use token::{ReviewToken, TokenKind, DIFF_CHANGE_CLASS};

/// Visit every line of a forest in pre-order together with its depth.
pub fn walk<'a, F>(lines: &'a [ReviewLine], f: &mut F)
where
    F: FnMut(&'a ReviewLine, usize),
{
    fn walk_impl<'a, F>(lines: &'a [ReviewLine], depth: usize, f: &mut F)
    where
        F: FnMut(&'a ReviewLine, usize),
    {
        for line in lines {
            f(line, depth);
            walk_impl(&line.children, depth + 1, f);
        }
    }

    walk_impl(lines, 0, f)
}

/// Mutable pre-order visit. The visiting order matches [`walk`] and
/// [`LineIndex`], so per-line results computed on an index can be written
/// back by counting.
pub fn walk_mut<F>(lines: &mut [ReviewLine], f: &mut F)
where
    F: FnMut(&mut ReviewLine),
{
    for line in lines {
        f(line);
        walk_mut(&mut line.children, f);
    }
}
