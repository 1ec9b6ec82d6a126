// SPDX-License-Identifier: MIT

//! Alignment of two sibling lists.
//!
//! Lines are matched by key equality regardless of position; the i-th old
//! occurrence of a key pairs with the i-th new occurrence. Among the matched
//! pairs, the longest run that is increasing on both sides stays in place and
//! serves as anchors for interleaving removed lines into the output. The
//! remaining pairs are reported as moved.
//!
//! Matching is a hash lookup and the anchor run is found with patience
//! sorting, so the whole alignment is O(n log n).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Matched { old: usize, new: usize, moved: bool },
    Added(usize),
    Removed(usize),
}

/// For each element of `seq`, whether it belongs to a longest strictly
/// increasing subsequence.
fn longest_increasing(seq: &[usize]) -> Vec<bool> {
    // tails[k] is the position in `seq` of the smallest value that ends an
    // increasing subsequence of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = Vec::with_capacity(seq.len());

    for (pos, &value) in seq.iter().enumerate() {
        let len = tails.partition_point(|&tail| seq[tail] < value);
        prev.push(len.checked_sub(1).map(|k| tails[k]));
        if len == tails.len() {
            tails.push(pos);
        } else {
            tails[len] = pos;
        }
    }

    let mut in_run = vec![false; seq.len()];
    let mut cur = tails.last().copied();
    while let Some(pos) = cur {
        in_run[pos] = true;
        cur = prev[pos];
    }
    in_run
}

/// Align `old` against `new` and return the merged sequence of steps.
///
/// New lines appear in new order. A removed old line is emitted right before
/// the first added line or anchor that follows it in old order, so removals
/// precede additions within a changed region.
pub fn align<K: Eq + Hash>(old: &[K], new: &[K]) -> Vec<Step> {
    let mut positions: HashMap<&K, VecDeque<usize>> = HashMap::new();
    for (idx, key) in old.iter().enumerate() {
        positions.entry(key).or_default().push_back(idx);
    }

    let mut old_matched = vec![false; old.len()];
    let new_match: Vec<Option<usize>> = new
        .iter()
        .map(|key| {
            let old_idx = positions.get_mut(key).and_then(VecDeque::pop_front);
            if let Some(old_idx) = old_idx {
                old_matched[old_idx] = true;
            }
            old_idx
        })
        .collect();

    let matched: Vec<usize> = new_match.iter().flatten().copied().collect();
    let in_run = longest_increasing(&matched);

    let mut anchored = vec![false; new.len()];
    {
        let mut run = in_run.iter();
        for (new_idx, m) in new_match.iter().enumerate() {
            if m.is_some() {
                anchored[new_idx] = *run.next().unwrap_or(&false);
            }
        }
    }

    // Old index of the next anchor at or after each new position.
    let mut next_anchor = vec![old.len(); new.len() + 1];
    for new_idx in (0..new.len()).rev() {
        next_anchor[new_idx] = match new_match[new_idx] {
            Some(old_idx) if anchored[new_idx] => old_idx,
            _ => next_anchor[new_idx + 1],
        };
    }

    let mut steps = Vec::with_capacity(old.len() + new.len());
    let mut next_old = 0;
    let mut flush = |upto: usize, steps: &mut Vec<Step>| {
        while next_old < upto {
            if !old_matched[next_old] {
                steps.push(Step::Removed(next_old));
            }
            next_old += 1;
        }
    };

    for (new_idx, m) in new_match.iter().enumerate() {
        match *m {
            Some(old_idx) if anchored[new_idx] => {
                flush(old_idx + 1, &mut steps);
                steps.push(Step::Matched {
                    old: old_idx,
                    new: new_idx,
                    moved: false,
                });
            }
            Some(old_idx) => steps.push(Step::Matched {
                old: old_idx,
                new: new_idx,
                moved: true,
            }),
            None => {
                flush(next_anchor[new_idx], &mut steps);
                steps.push(Step::Added(new_idx));
            }
        }
    }
    flush(old.len(), &mut steps);

    #[cfg(feature = "debug-diff")]
    eprintln!(
        "align: {} old, {} new, {} matched, {} anchored",
        old.len(),
        new.len(),
        matched.len(),
        anchored.iter().filter(|&&a| a).count()
    );

    steps
}

#[cfg(test)]
mod test {
    use super::*;
    use Step::*;

    fn m(old: usize, new: usize) -> Step {
        Matched { old, new, moved: false }
    }

    fn mv(old: usize, new: usize) -> Step {
        Matched { old, new, moved: true }
    }

    #[test]
    fn lis_marks_one_longest_run() {
        let run = longest_increasing(&[3, 0, 1, 4, 2]);
        assert_eq!(run.iter().filter(|&&x| x).count(), 3);
        assert_eq!(run, vec![false, true, true, false, true]);
        assert!(longest_increasing(&[]).is_empty());
    }

    #[test]
    fn identical_lists() {
        assert_eq!(align(&["a", "b", "c"], &["a", "b", "c"]), vec![m(0, 0), m(1, 1), m(2, 2)]);
    }

    #[test]
    fn added_and_removed() {
        assert_eq!(
            align(&["a", "x", "c"], &["a", "y", "c"]),
            vec![m(0, 0), Removed(1), Added(1), m(2, 2)]
        );
        assert_eq!(align::<&str>(&[], &["a"]), vec![Added(0)]);
        assert_eq!(align::<&str>(&["a"], &[]), vec![Removed(0)]);
    }

    #[test]
    fn reorder_is_matched() {
        let steps = align(&["a", "b"], &["b", "a"]);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| matches!(s, Matched { .. })));
        assert_eq!(steps, vec![mv(1, 0), m(0, 1)]);
    }

    #[test]
    fn duplicates_match_positionally() {
        // Second "f" pairs with the second "f", wherever it went.
        assert_eq!(
            align(&["f", "f", "g"], &["f", "g", "f"]),
            vec![m(0, 0), mv(2, 1), m(1, 2)]
        );
    }

    #[test]
    fn trailing_removals_are_flushed() {
        assert_eq!(
            align(&["a", "b", "c"], &["a"]),
            vec![m(0, 0), Removed(1), Removed(2)]
        );
    }
}
