// SPDX-License-Identifier: MIT

//! Structural diff of two revisions of a line forest.
//!
//! The result is a single merged forest: lines of the new revision in their
//! new order, with removed lines of the old revision interleaved at the
//! position they used to occupy. Every line carries a [`DiffKind`].

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, warn};

use crate::render::canonical_text;
use crate::tree::{walk, CodeFile, DiffKind, ReviewLine, ReviewToken};
use crate::visibility::propagate_visibility;

mod align;
mod token_diff;

use align::{align, Step};
pub use token_diff::mark_token_changes;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub unchanged: usize,
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
    /// Unchanged lines whose position shifted.
    pub moved: usize,
}
impl DiffStats {
    fn collect(lines: &[ReviewLine]) -> Self {
        let mut stats = DiffStats::default();
        walk(lines, &mut |line, _| {
            match line.diff_kind {
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
                DiffKind::Changed => stats.changed += 1,
                DiffKind::Unchanged | DiffKind::NoneDiff => stats.unchanged += 1,
            }
            if line.is_moved {
                stats.moved += 1;
            }
        });
        stats
    }
}
impl std::fmt::Display for DiffStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = [
            (self.added, "added"),
            (self.removed, "removed"),
            (self.changed, "changed"),
            (self.unchanged, "unchanged"),
            (self.moved, "moved"),
        ];
        let text = counts
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, what)| format!("{count} {what}"))
            .join(", ");
        if text.is_empty() {
            f.write_str("empty")
        } else {
            f.write_str(&text)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreeDiff {
    pub lines: Vec<ReviewLine>,
    pub stats: DiffStats,
}
impl TreeDiff {
    pub fn has_diff(&self) -> bool {
        self.stats.added + self.stats.removed + self.stats.changed > 0
    }
}

/// Diff two forests rooted at equivalent scopes.
pub fn diff_trees(old: &[ReviewLine], new: &[ReviewLine]) -> TreeDiff {
    let mut lines = Vec::new();
    diff_level(old, new, &mut lines);
    let hidden = propagate_visibility(&mut lines);
    let stats = DiffStats::collect(&lines);

    debug!("diff: {}; {} newly hidden", stats, hidden);

    TreeDiff { lines, stats }
}

/// Diff two code files. The result carries the metadata of `new` and the
/// merged forest.
pub fn diff_code_files(old: &CodeFile, new: &CodeFile) -> CodeFile {
    let diff = diff_trees(&old.review_lines, &new.review_lines);
    new.with_review_lines(diff.lines)
}

/// Lines that do not take part in alignment and instead follow the keyed
/// line in front of them.
fn is_passenger(line: &ReviewLine) -> bool {
    line.is_context_end_line || (line.is_empty() && line.children.is_empty())
}

/// One side of a sibling list, split into keyed lines and passengers.
struct Side<'a> {
    lines: &'a [ReviewLine],
    keyed: Vec<&'a ReviewLine>,
    keys: Vec<String>,
    /// Passengers in front of the first keyed line.
    head: Vec<&'a ReviewLine>,
    /// Passengers following each keyed line.
    passengers: Vec<Vec<&'a ReviewLine>>,
}
impl<'a> Side<'a> {
    fn new(lines: &'a [ReviewLine]) -> Self {
        let mut side = Side {
            lines,
            keyed: Vec::new(),
            keys: Vec::new(),
            head: Vec::new(),
            passengers: Vec::new(),
        };
        for line in lines {
            if is_passenger(line) {
                match side.passengers.last_mut() {
                    Some(passengers) => passengers.push(line),
                    None => side.head.push(line),
                }
            } else {
                side.keyed.push(line);
                side.keys.push(canonical_text(line));
                side.passengers.push(Vec::new());
            }
        }
        side
    }
}

/// Token vectors with `diff-change` marks for removed/added lines sharing a
/// line id, keyed by keyed-line position on each side.
struct TokenMarks {
    old: HashMap<usize, Vec<ReviewToken>>,
    new: HashMap<usize, Vec<ReviewToken>>,
}
impl TokenMarks {
    fn new(old: &Side, new: &Side, steps: &[Step]) -> Self {
        let mut removed_by_id: HashMap<&str, usize> = HashMap::new();
        for step in steps {
            if let Step::Removed(i) = *step {
                if let Some(id) = old.keyed[i].line_id.as_deref() {
                    removed_by_id.entry(id).or_insert(i);
                }
            }
        }

        let mut marks = TokenMarks {
            old: HashMap::new(),
            new: HashMap::new(),
        };
        if removed_by_id.is_empty() {
            return marks;
        }

        for step in steps {
            let Step::Added(j) = *step else { continue };
            let Some(id) = new.keyed[j].line_id.as_deref() else { continue };
            let Some(i) = removed_by_id.remove(id) else { continue };

            let mut before = old.keyed[i].tokens.clone();
            let mut after = new.keyed[j].tokens.clone();
            if mark_token_changes(&mut before, &mut after) {
                marks.old.insert(i, before);
                marks.new.insert(j, after);
            }
        }
        marks
    }
}

fn shallow_clone(line: &ReviewLine) -> ReviewLine {
    ReviewLine {
        line_id: line.line_id.clone(),
        cross_language_id: line.cross_language_id.clone(),
        tokens: line.tokens.clone(),
        children: Vec::new(),
        is_hidden: line.is_hidden,
        is_context_end_line: line.is_context_end_line,
        related_to_line: line.related_to_line.clone(),
        diff_kind: DiffKind::NoneDiff,
        is_moved: false,
    }
}

fn whole_subtree(line: &ReviewLine, kind: DiffKind, tokens: Option<&Vec<ReviewToken>>) -> ReviewLine {
    let mut line = line.clone();
    line.set_diff_kind_recursive(kind);
    if let Some(tokens) = tokens {
        line.tokens = tokens.clone();
    }
    line
}

/// Kind of a passenger line emitted after `owner_kind` into `out`.
fn passenger_kind(line: &ReviewLine, owner_kind: DiffKind, out: &[ReviewLine]) -> DiffKind {
    if !line.is_context_end_line {
        return match owner_kind {
            DiffKind::Added | DiffKind::Removed => owner_kind,
            _ => DiffKind::Unchanged,
        };
    }

    let Some(target) = line.related_to_line.as_deref() else {
        return owner_kind;
    };
    match out
        .iter()
        .rev()
        .find(|sibling| sibling.line_id.as_deref() == Some(target))
    {
        Some(sibling) => sibling.diff_kind,
        None => {
            warn!("context end line refers to unknown sibling {:?}", target);
            owner_kind
        }
    }
}

fn emit_passengers(passengers: &[&ReviewLine], owner_kind: DiffKind, out: &mut Vec<ReviewLine>) {
    for passenger in passengers {
        let kind = passenger_kind(passenger, owner_kind, out);
        out.push(whole_subtree(passenger, kind, None));
    }
}

/// Diff one sibling list into `out`. Returns whether anything in it, or
/// below it, was added, removed or changed.
fn diff_level(old: &[ReviewLine], new: &[ReviewLine], out: &mut Vec<ReviewLine>) -> bool {
    let old = Side::new(old);
    let new = Side::new(new);
    let steps = align(&old.keys, &new.keys);
    let marks = TokenMarks::new(&old, &new, &steps);

    #[cfg(feature = "debug-diff")]
    {
        eprintln!(
            "diff_level: {} old lines, {} new lines",
            old.lines.len(),
            new.lines.len()
        );
        for step in &steps {
            eprintln!("  {:?}", step);
        }
    }

    out.reserve(new.lines.len());
    emit_passengers(&new.head, DiffKind::Unchanged, out);

    let mut changed = false;
    for step in steps {
        match step {
            Step::Matched {
                old: i,
                new: j,
                moved,
            } => {
                let mut line = shallow_clone(new.keyed[j]);
                let below = diff_level(&old.keyed[i].children, &new.keyed[j].children, &mut line.children);
                line.diff_kind = if below {
                    DiffKind::Changed
                } else {
                    DiffKind::Unchanged
                };
                line.is_moved = moved;
                changed |= below;

                let kind = line.diff_kind;
                out.push(line);
                emit_passengers(&new.passengers[j], kind, out);
            }
            Step::Added(j) => {
                changed = true;
                out.push(whole_subtree(new.keyed[j], DiffKind::Added, marks.new.get(&j)));
                emit_passengers(&new.passengers[j], DiffKind::Added, out);
            }
            Step::Removed(i) => {
                changed = true;
                out.push(whole_subtree(old.keyed[i], DiffKind::Removed, marks.old.get(&i)));
                emit_passengers(&old.passengers[i], DiffKind::Removed, out);
            }
        }
    }
    changed
}
