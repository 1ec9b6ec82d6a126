// SPDX-License-Identifier: MIT

//! Flat view over a line forest.
//!
//! Cross references between lines (`related_to_line`, `navigate_to_id`) are
//! ids, not pointers. [`LineIndex`] lays the forest out in pre-order so that
//! every line has an integer index and ids resolve in O(1).

use std::collections::HashMap;

use log::warn;

use super::{walk, ReviewLine};

#[derive(Debug, Clone, Copy)]
pub struct IndexedLine<'a> {
    pub line: &'a ReviewLine,
    pub parent: Option<usize>,
    pub depth: usize,
    /// Position among the parent's children.
    pub sibling_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Related,
    Navigation,
}

/// A reference to a line id that does not exist in the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Pre-order index of the referencing line.
    pub from: usize,
    pub target: String,
    pub kind: ReferenceKind,
}

#[derive(Debug)]
pub struct LineIndex<'a> {
    lines: Vec<IndexedLine<'a>>,
    by_id: HashMap<&'a str, Vec<usize>>,
}

impl<'a> LineIndex<'a> {
    pub fn new(forest: &'a [ReviewLine]) -> Self {
        let mut lines: Vec<IndexedLine<'a>> = Vec::new();
        let mut by_id: HashMap<&'a str, Vec<usize>> = HashMap::new();

        // Most recent line index seen at each depth, plus how many children
        // the line at that depth has received so far.
        let mut open: Vec<(usize, usize)> = Vec::new();
        let mut roots = 0;

        walk(forest, &mut |line, depth| {
            open.truncate(depth);
            let (parent, sibling_index) = match open.last_mut() {
                Some((parent, num_children)) => {
                    *num_children += 1;
                    (Some(*parent), *num_children - 1)
                }
                None => {
                    roots += 1;
                    (None, roots - 1)
                }
            };

            let idx = lines.len();
            lines.push(IndexedLine {
                line,
                parent,
                depth,
                sibling_index,
            });
            if let Some(id) = line.line_id.as_deref() {
                by_id.entry(id).or_default().push(idx);
            }
            open.push((idx, 0));
        });

        Self { lines, by_id }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, idx: usize) -> &IndexedLine<'a> {
        &self.lines[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedLine<'a>> + '_ {
        self.lines.iter()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All pre-order indices of lines carrying `id`. An id can occur more
    /// than once, e.g. in a merged diff forest where a modified declaration
    /// appears both as removed and as added.
    pub fn lookup(&self, id: &str) -> &[usize] {
        self.by_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find all references to ids that do not exist. Each one is logged.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for (idx, entry) in self.lines.iter().enumerate() {
            if let Some(target) = entry.line.related_to_line.as_deref() {
                if !self.contains_id(target) {
                    dangling.push(DanglingReference {
                        from: idx,
                        target: target.to_string(),
                        kind: ReferenceKind::Related,
                    });
                }
            }
            for token in &entry.line.tokens {
                if let Some(target) = token.navigate_to_id.as_deref() {
                    if !self.contains_id(target) {
                        dangling.push(DanglingReference {
                            from: idx,
                            target: target.to_string(),
                            kind: ReferenceKind::Navigation,
                        });
                    }
                }
            }
        }

        for reference in &dangling {
            let from = &self.lines[reference.from].line;
            warn!(
                "line {:?} has a {:?} reference to unknown line id {:?}",
                from.line_id.as_deref().unwrap_or("<anonymous>"),
                reference.kind,
                reference.target
            );
        }

        dangling
    }
}
