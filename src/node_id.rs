// SPDX-License-Identifier: MIT

//! Stable per-line identifiers.
//!
//! These ids are persisted as comment anchors, so the scheme must stay fixed:
//! the same tree (content, structure, position, diff state) always hashes to
//! the same ids, in any process.

use crate::tree::ReviewLine;

/// Scaffolding prefix of every generated id.
pub const NODE_ID_PREFIX: &str = "nId";

/// Parent hash used for top-level lines.
pub const ROOT_NODE_ID: &str = "root";

/// Placeholder for lines without a `line_id`.
const NO_ID: &str = "noId";

/// 32-bit polynomial string hash (`h * 31 + c`), wrapping.
fn hash_str(input: &str) -> i32 {
    input
        .chars()
        .fold(0i32, |hash, ch| hash.wrapping_mul(31).wrapping_add(ch as u32 as i32))
}

/// Compute the stable id of `line` given its parent's id and its position
/// among its siblings.
pub fn node_id_hash(line: &ReviewLine, parent_hash: &str, sibling_index: usize) -> String {
    let mut input = String::from(line.line_id.as_deref().unwrap_or(NO_ID));

    if let Some(class) = line.first_render_class() {
        input.push('-');
        input.push_str(class);
    }

    input.push('-');
    input.push_str(&sibling_index.to_string());
    input.push('-');
    input.push_str(line.diff_kind.name());

    let parent = parent_hash.strip_prefix(NODE_ID_PREFIX).unwrap_or(parent_hash);
    input.push('-');
    input.push_str(parent);

    format!("{}{}", NODE_ID_PREFIX, hash_str(&input))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::{DiffKind, ReviewToken};

    fn method() -> ReviewLine {
        ReviewLine::new(Some("Foo.Bar()"), vec![ReviewToken::member_name("Bar")])
    }

    #[test]
    fn known_values() {
        assert_eq!(hash_str(""), 0);
        assert_eq!(hash_str("a"), 97);
        assert_eq!(hash_str("ab"), 97 * 31 + 98);
        // Wraps instead of overflowing.
        let long = "z".repeat(64);
        assert_eq!(hash_str(&long), hash_str(&long));
    }

    #[test]
    fn deterministic_and_prefixed() {
        let a = node_id_hash(&method(), ROOT_NODE_ID, 3);
        let b = node_id_hash(&method(), ROOT_NODE_ID, 3);
        assert_eq!(a, b);
        assert!(a.starts_with(NODE_ID_PREFIX));
    }

    #[test]
    fn position_diff_state_and_class_disambiguate() {
        let base = node_id_hash(&method(), ROOT_NODE_ID, 0);
        assert_ne!(base, node_id_hash(&method(), ROOT_NODE_ID, 1));

        let mut added = method();
        added.diff_kind = DiffKind::Added;
        assert_ne!(base, node_id_hash(&added, ROOT_NODE_ID, 0));

        let mut property = method();
        property.tokens[0].add_render_class("property");
        assert_ne!(base, node_id_hash(&property, ROOT_NODE_ID, 0));
    }

    #[test]
    fn parent_scaffolding_is_normalized() {
        let parent = node_id_hash(&ReviewLine::new(Some("Foo"), Vec::new()), ROOT_NODE_ID, 0);
        let stripped = parent.strip_prefix(NODE_ID_PREFIX).unwrap();
        assert_eq!(
            node_id_hash(&method(), &parent, 0),
            node_id_hash(&method(), stripped, 0)
        );
        assert_ne!(
            node_id_hash(&method(), &parent, 0),
            node_id_hash(&method(), ROOT_NODE_ID, 0)
        );
    }
}
