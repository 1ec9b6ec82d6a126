// SPDX-License-Identifier: MIT

use crate::tree::{ReviewToken, DIFF_CHANGE_CLASS};

fn diff_value(tokens: &[ReviewToken], pos: usize) -> Option<&str> {
    tokens
        .get(pos)
        .filter(|token| !token.skip_diff)
        .map(|token| token.value.as_str())
}

/// Mark the tokens that differ between two revisions of one line.
///
/// Tokens are compared position by position. A token whose counterpart at
/// the same position has a different value (or is missing) gets the
/// `diff-change` render class. Tokens marked `skip_diff` never differ.
/// Nothing is marked when one side has no tokens at all.
///
/// Returns whether any difference was found.
pub fn mark_token_changes(before: &mut [ReviewToken], after: &mut [ReviewToken]) -> bool {
    let mark = !before.is_empty() && !after.is_empty();
    let mut differs = false;

    for pos in 0..before.len().max(after.len()) {
        let skipped = |tokens: &[ReviewToken]| tokens.get(pos).is_some_and(|t| t.skip_diff);
        if skipped(before) || skipped(after) {
            continue;
        }
        if diff_value(before, pos) == diff_value(after, pos) {
            continue;
        }

        differs = true;
        if mark {
            if let Some(token) = before.get_mut(pos) {
                token.add_render_class(DIFF_CHANGE_CLASS);
            }
            if let Some(token) = after.get_mut(pos) {
                token.add_render_class(DIFF_CHANGE_CLASS);
            }
        }
    }

    differs
}
