// SPDX-License-Identifier: MIT

//! Hidden-state propagation.
//!
//! A line bound to a hidden line via `related_to_line` is hidden too, as are
//! the documentation lines directly in front of a hidden line. Both rules
//! are applied to a fixpoint.
//!
//! In a merged diff forest the two revisions share one tree. A line only
//! follows lines of its own revision: removed lines see the old side
//! (everything but added lines), all other lines see the new side
//! (everything but removed lines).

use std::collections::HashMap;

use log::warn;

use crate::tree::{walk_mut, DiffKind, LineIndex, ReviewLine};

/// Whether a line of kind `from` belongs to a revision that contains lines
/// of kind `to`.
fn same_revision(from: DiffKind, to: DiffKind) -> bool {
    match from {
        DiffKind::Removed => to != DiffKind::Added,
        _ => to != DiffKind::Removed,
    }
}

/// Compute the hidden bitmap of an indexed forest, in pre-order.
pub fn compute_hidden(index: &LineIndex) -> Vec<bool> {
    let len = index.len();
    let kind = |idx: usize| index.get(idx).line.diff_kind;

    // dependents[t] lists the lines that become hidden when t is hidden.
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); len];

    for (idx, entry) in index.iter().enumerate() {
        let Some(id) = entry.line.related_to_line.as_deref() else { continue };
        let targets = index.lookup(id);
        if targets.is_empty() {
            warn!(
                "line {:?} is related to unknown line id {:?}",
                entry.line.line_id.as_deref().unwrap_or("<anonymous>"),
                id
            );
        }
        for &target in targets {
            if same_revision(entry.line.diff_kind, kind(target)) {
                dependents[target].push(idx);
            }
        }
    }

    // Documentation lines depend on the next sibling of their own revision.
    let mut siblings: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
    for (idx, entry) in index.iter().enumerate() {
        siblings.entry(entry.parent).or_default().push(idx);
    }
    for list in siblings.values() {
        let mut next_new: Option<usize> = None;
        let mut next_old: Option<usize> = None;
        for &idx in list.iter().rev() {
            let line_kind = kind(idx);
            if index.get(idx).line.is_documentation() {
                let next = if line_kind == DiffKind::Removed { next_old } else { next_new };
                if let Some(next) = next {
                    dependents[next].push(idx);
                }
            }
            if line_kind != DiffKind::Removed {
                next_new = Some(idx);
            }
            if line_kind != DiffKind::Added {
                next_old = Some(idx);
            }
        }
    }

    let mut hidden: Vec<bool> = index.iter().map(|entry| entry.line.is_hidden).collect();
    let mut worklist: Vec<usize> = (0..len).filter(|&idx| hidden[idx]).collect();
    while let Some(idx) = worklist.pop() {
        for &dependent in &dependents[idx] {
            if !hidden[dependent] {
                hidden[dependent] = true;
                worklist.push(dependent);
            }
        }
    }
    hidden
}

/// Propagate hidden state through `lines` in place. Returns the number of
/// lines that became hidden.
pub fn propagate_visibility(lines: &mut [ReviewLine]) -> usize {
    let hidden = compute_hidden(&LineIndex::new(lines));

    let mut newly_hidden = 0;
    let mut idx = 0;
    walk_mut(lines, &mut |line| {
        if hidden[idx] && !line.is_hidden {
            line.is_hidden = true;
            newly_hidden += 1;
        }
        idx += 1;
    });
    newly_hidden
}
