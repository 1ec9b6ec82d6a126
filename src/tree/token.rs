// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

/// Render class attached to tokens that differ between the two sides of a
/// modified line.
pub const DIFF_CHANGE_CLASS: &str = "diff-change";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TokenKind {
    Text,
    Punctuation,
    Keyword,
    TypeName,
    MemberName,
    StringLiteral,
    Literal,
    Comment,
}
impl TryFrom<u8> for TokenKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TokenKind::Text,
            1 => TokenKind::Punctuation,
            2 => TokenKind::Keyword,
            3 => TokenKind::TypeName,
            4 => TokenKind::MemberName,
            5 => TokenKind::StringLiteral,
            6 => TokenKind::Literal,
            7 => TokenKind::Comment,
            _ => return Err(format!("unknown token kind {value}")),
        })
    }
}
impl From<TokenKind> for u8 {
    fn from(kind: TokenKind) -> u8 {
        kind as u8
    }
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_true(value: &bool) -> bool {
    *value
}

/// The smallest styled unit of a rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReviewToken {
    pub kind: TokenKind,
    pub value: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub has_prefix_space: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub has_suffix_space: bool,

    /// Leave the token out of the line's diff identity (e.g. version numbers).
    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_diff: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_documentation: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_deprecated: bool,

    /// Line id this token links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigate_to_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub render_classes: Vec<String>,
}

impl ReviewToken {
    pub fn new<S: Into<String>>(kind: TokenKind, value: S) -> Self {
        Self {
            kind,
            value: value.into(),
            has_prefix_space: false,
            has_suffix_space: true,
            skip_diff: false,
            is_documentation: false,
            is_deprecated: false,
            navigate_to_id: None,
            render_classes: Vec::new(),
        }
    }

    pub fn text<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Text, value)
    }

    pub fn keyword<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Keyword, value)
    }

    pub fn type_name<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::TypeName, value)
    }

    pub fn member_name<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::MemberName, value)
    }

    pub fn string_literal<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::StringLiteral, value)
    }

    pub fn literal<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Literal, value)
    }

    pub fn comment<S: Into<String>>(value: S) -> Self {
        Self::new(TokenKind::Comment, value)
    }

    /// A comment token that belongs to a documentation line.
    pub fn documentation<S: Into<String>>(value: S) -> Self {
        Self {
            is_documentation: true,
            ..Self::comment(value)
        }
    }

    /// Punctuation without a trailing space for openers (`(`, `<`, `[`, `.`)
    /// and with one for everything else.
    pub fn punctuation<S: Into<String>>(value: S) -> Self {
        let value = value.into();
        let has_suffix_space = !matches!(value.as_str(), "(" | "<" | "[" | "." | "::");
        Self::punctuation_with(value, has_suffix_space)
    }

    pub fn punctuation_with<S: Into<String>>(value: S, has_suffix_space: bool) -> Self {
        Self {
            has_suffix_space,
            ..Self::new(TokenKind::Punctuation, value)
        }
    }

    pub fn with_prefix_space(mut self, has_prefix_space: bool) -> Self {
        self.has_prefix_space = has_prefix_space;
        self
    }

    pub fn with_suffix_space(mut self, has_suffix_space: bool) -> Self {
        self.has_suffix_space = has_suffix_space;
        self
    }

    pub fn skip_diff(mut self) -> Self {
        self.skip_diff = true;
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.is_deprecated = true;
        self
    }

    pub fn navigate_to<S: Into<String>>(mut self, line_id: S) -> Self {
        self.navigate_to_id = Some(line_id.into());
        self
    }

    pub fn with_render_class<S: Into<String>>(mut self, class: S) -> Self {
        self.add_render_class(class);
        self
    }

    /// Add a style tag, keeping insertion order and ignoring duplicates.
    pub fn add_render_class<S: Into<String>>(&mut self, class: S) {
        let class = class.into();
        if !self.render_classes.contains(&class) {
            self.render_classes.push(class);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn factory_defaults() {
        let kw = ReviewToken::keyword("public");
        assert_eq!(kw.kind, TokenKind::Keyword);
        assert!(kw.has_suffix_space);
        assert!(!kw.has_prefix_space);

        assert!(!ReviewToken::punctuation("(").has_suffix_space);
        assert!(ReviewToken::punctuation(",").has_suffix_space);
        assert!(ReviewToken::documentation("/// docs").is_documentation);
    }

    #[test]
    fn render_classes_are_a_set() {
        let mut token = ReviewToken::type_name("Foo").with_render_class("class");
        token.add_render_class("class");
        token.add_render_class("deprecated");
        assert_eq!(token.render_classes, vec!["class", "deprecated"]);
    }

    #[test]
    fn json_defaults_and_kind_numbers() {
        let token: ReviewToken =
            serde_json::from_str(r#"{"Kind": 2, "Value": "class"}"#).unwrap();
        assert_eq!(token, ReviewToken::keyword("class"));

        let json = serde_json::to_string(&ReviewToken::punctuation("(")).unwrap();
        assert_eq!(json, r#"{"Kind":1,"Value":"(","HasSuffixSpace":false}"#);

        assert!(serde_json::from_str::<ReviewToken>(r#"{"Kind": 42, "Value": "x"}"#).is_err());
    }
}
