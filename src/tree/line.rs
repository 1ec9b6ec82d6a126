// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::ReviewToken;

/// Diff classification of a line.
///
/// `NoneDiff` marks a tree that has not been through the diff engine.
/// `Changed` is never assigned from a line's own tokens: it means the line
/// itself matched but something in its subtree was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiffKind {
    #[default]
    NoneDiff,
    Unchanged,
    Added,
    Removed,
    Changed,
}
impl DiffKind {
    pub fn name(self) -> &'static str {
        match self {
            DiffKind::NoneDiff => "NoneDiff",
            DiffKind::Unchanged => "Unchanged",
            DiffKind::Added => "Added",
            DiffKind::Removed => "Removed",
            DiffKind::Changed => "Changed",
        }
    }

    /// Whether the line, or something below it, differs between revisions.
    pub fn is_modified(self) -> bool {
        matches!(self, DiffKind::Added | DiffKind::Removed | DiffKind::Changed)
    }

    pub fn symbol(self) -> char {
        match self {
            DiffKind::Added => '+',
            DiffKind::Removed => '-',
            DiffKind::Changed => '~',
            DiffKind::NoneDiff | DiffKind::Unchanged => ' ',
        }
    }
}
impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_none_diff(kind: &DiffKind) -> bool {
    *kind == DiffKind::NoneDiff
}

/// One row of API text plus its nested scope.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReviewLine {
    /// Identifier scoped to one revision; set on commentable lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,

    /// Identifier of the same API member in other languages' trees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_language_id: Option<String>,

    #[serde(default)]
    pub tokens: Vec<ReviewToken>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ReviewLine>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_hidden: bool,

    /// Synthetic scope terminator without an identity of its own.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_context_end_line: bool,

    /// Line whose visibility this line follows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to_line: Option<String>,

    #[serde(default, skip_serializing_if = "is_none_diff")]
    pub diff_kind: DiffKind,

    /// Matched by the diff, but at a shifted position among its siblings.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_moved: bool,
}

impl ReviewLine {
    pub fn new<S: Into<String>>(line_id: Option<S>, tokens: Vec<ReviewToken>) -> Self {
        Self {
            line_id: line_id.map(Into::into),
            tokens,
            ..Default::default()
        }
    }

    /// A line without an id.
    pub fn anonymous(tokens: Vec<ReviewToken>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    /// An empty spacer line.
    pub fn blank() -> Self {
        Self::default()
    }

    /// A closing line such as `}`.
    pub fn context_end(tokens: Vec<ReviewToken>) -> Self {
        Self {
            tokens,
            is_context_end_line: true,
            ..Default::default()
        }
    }

    pub fn with_children(mut self, children: Vec<ReviewLine>) -> Self {
        self.children = children;
        self
    }

    pub fn push_child(&mut self, child: ReviewLine) {
        self.children.push(child);
    }

    pub fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    pub fn related_to<S: Into<String>>(mut self, line_id: S) -> Self {
        self.related_to_line = Some(line_id.into());
        self
    }

    pub fn cross_language<S: Into<String>>(mut self, id: S) -> Self {
        self.cross_language_id = Some(id.into());
        self
    }

    /// A documentation line starts with a documentation token.
    pub fn is_documentation(&self) -> bool {
        self.tokens.first().is_some_and(|token| token.is_documentation)
    }

    /// True if nothing on the line takes part in diffing.
    pub fn is_empty(&self) -> bool {
        self.tokens.iter().all(|token| token.skip_diff)
    }

    /// First render class found on any token, in token order.
    pub fn first_render_class(&self) -> Option<&str> {
        self.tokens
            .iter()
            .find_map(|token| token.render_classes.first())
            .map(String::as_str)
    }

    /// Set the diff kind of this line and its whole subtree, clearing any
    /// move marks.
    pub fn set_diff_kind_recursive(&mut self, kind: DiffKind) {
        self.diff_kind = kind;
        self.is_moved = false;
        for child in &mut self.children {
            child.set_diff_kind_recursive(kind);
        }
    }

    /// Number of lines in this subtree, including this one.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(ReviewLine::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::ReviewToken;

    #[test]
    fn derived_predicates() {
        assert!(ReviewLine::blank().is_empty());

        let header = ReviewLine::anonymous(vec![ReviewToken::text("version 1.2.3").skip_diff()]);
        assert!(header.is_empty());

        let doc = ReviewLine::anonymous(vec![ReviewToken::documentation("/// Frobs.")]);
        assert!(doc.is_documentation());
        assert!(!doc.is_empty());

        let decl = ReviewLine::new(Some("M1"), vec![ReviewToken::keyword("void")]);
        assert!(!decl.is_documentation());
    }

    #[test]
    fn first_render_class_skips_plain_tokens() {
        let line = ReviewLine::anonymous(vec![
            ReviewToken::keyword("public"),
            ReviewToken::type_name("Foo").with_render_class("class"),
            ReviewToken::member_name("Bar").with_render_class("property"),
        ]);
        assert_eq!(line.first_render_class(), Some("class"));
        assert_eq!(ReviewLine::blank().first_render_class(), None);
    }

    #[test]
    fn json_field_names() {
        let json = r#"{
            "LineId": "T1",
            "Tokens": [{"Kind": 2, "Value": "class"}],
            "Children": [{"Tokens": []}],
            "IsContextEndLine": false,
            "RelatedToLine": "N1"
        }"#;
        let line: ReviewLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.line_id.as_deref(), Some("T1"));
        assert_eq!(line.children.len(), 1);
        assert_eq!(line.related_to_line.as_deref(), Some("N1"));
        assert_eq!(line.diff_kind, DiffKind::NoneDiff);
        assert_eq!(line.subtree_len(), 2);
    }
}
