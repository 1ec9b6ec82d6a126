// SPDX-License-Identifier: MIT

//! Plain text forms of a line tree.
//!
//! [`render_text`] is the export format. [`canonical_text`] is the form used
//! for diff identity and never shown to users.

use crate::tree::{ReviewLine, ReviewToken};

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Leave out documentation lines ("code only" export).
    pub skip_docs: bool,
    /// Spaces per indentation level.
    pub indent_width: usize,
}
impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            skip_docs: false,
            indent_width: 4,
        }
    }
}

/// Join tokens using their spacing flags.
///
/// A separating space is inserted at most once between two tokens: a prefix
/// space request is dropped if the previous token already emitted a suffix
/// space, and at the start of the line.
fn join_tokens<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a ReviewToken>,
{
    let mut out = String::new();
    let mut separated = true;
    for token in tokens {
        if token.has_prefix_space && !separated {
            out.push(' ');
        }
        out.push_str(&token.value);
        if token.has_suffix_space {
            out.push(' ');
        }
        separated = token.has_suffix_space;
    }
    out.truncate(out.trim_end().len());
    out
}

/// Display text of a single line, without indentation or children.
pub fn line_text(line: &ReviewLine) -> String {
    join_tokens(&line.tokens)
}

/// Diff identity of a line: the text of all tokens not marked `skip_diff`.
pub fn canonical_text(line: &ReviewLine) -> String {
    let text = join_tokens(line.tokens.iter().filter(|token| !token.skip_diff));
    match text.len() - text.trim_start().len() {
        0 => text,
        leading => text[leading..].to_string(),
    }
}

fn render_into(out: &mut String, line: &ReviewLine, indent: usize, options: &RenderOptions) {
    if options.skip_docs && line.is_documentation() {
        return;
    }

    let text = line_text(line);
    if !text.is_empty() {
        out.extend(std::iter::repeat(' ').take(indent * options.indent_width));
        out.push_str(&text);
    }
    out.push('\n');

    for child in &line.children {
        render_into(out, child, indent + 1, options);
    }
}

/// Render a line and its subtree as indented text, one output line per
/// tree line.
pub fn render_text(line: &ReviewLine, indent: usize, skip_docs: bool, indent_width: usize) -> String {
    let mut out = String::new();
    render_into(
        &mut out,
        line,
        indent,
        &RenderOptions {
            skip_docs,
            indent_width,
        },
    );
    out
}

/// Render a whole forest starting at indentation level 0.
pub fn render_forest(lines: &[ReviewLine], options: &RenderOptions) -> String {
    let mut out = String::new();
    for line in lines {
        render_into(&mut out, line, 0, options);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::ReviewToken as T;

    fn class_line() -> ReviewLine {
        ReviewLine::new(
            Some("T"),
            vec![T::keyword("public"), T::keyword("class"), T::type_name("Foo"), T::punctuation("{")],
        )
        .with_children(vec![
            ReviewLine::anonymous(vec![T::documentation("/// Does things.")]),
            ReviewLine::new(
                Some("T.Bar"),
                vec![
                    T::keyword("public"),
                    T::keyword("void"),
                    T::member_name("Bar").with_suffix_space(false),
                    T::punctuation("("),
                    T::punctuation_with(")", false),
                    T::punctuation(";").with_prefix_space(true),
                ],
            ),
            ReviewLine::blank(),
        ])
    }

    #[test]
    fn spacing_rules() {
        let line = ReviewLine::anonymous(vec![
            T::keyword("a"),
            T::text("b").with_prefix_space(true).with_suffix_space(false),
            T::punctuation_with(",", false),
            T::text("c").with_prefix_space(true),
        ]);
        assert_eq!(line_text(&line), "a b, c");

        let leading = ReviewLine::anonymous(vec![T::text("x").with_prefix_space(true)]);
        assert_eq!(line_text(&leading), "x");
    }

    #[test]
    fn renders_indented_tree() {
        let text = render_text(&class_line(), 0, false, 4);
        assert_eq!(
            text,
            "public class Foo {\n    /// Does things.\n    public void Bar() ;\n\n"
        );

        let code_only = render_text(&class_line(), 1, true, 2);
        assert_eq!(code_only, "  public class Foo {\n    public void Bar() ;\n\n");
    }

    #[test]
    fn parent_render_is_concatenation_of_children() {
        let line = class_line();
        let mut expected = render_text(&ReviewLine { children: Vec::new(), ..line.clone() }, 2, false, 3);
        for child in &line.children {
            expected.push_str(&render_text(child, 3, false, 3));
        }
        assert_eq!(render_text(&line, 2, false, 3), expected);
    }

    #[test]
    fn whitespace_only_line_has_no_indent() {
        let line = ReviewLine::anonymous(vec![T::text(""), T::text(" ").with_suffix_space(false)])
            .with_children(vec![ReviewLine::anonymous(vec![T::keyword("x")])]);
        assert_eq!(render_text(&line, 2, false, 4), "\n            x\n");
    }

    #[test]
    fn canonical_text_ignores_skipped_tokens() {
        let a = ReviewLine::anonymous(vec![
            T::string_literal("Azure.Core"),
            T::string_literal("-1.2.0").skip_diff(),
        ]);
        let b = ReviewLine::anonymous(vec![
            T::string_literal("Azure.Core"),
            T::string_literal("-1.3.0").skip_diff(),
        ]);
        assert_eq!(canonical_text(&a), "Azure.Core");
        assert_eq!(canonical_text(&a), canonical_text(&b));
        assert_eq!(line_text(&a), "Azure.Core -1.2.0");
    }

    #[test]
    fn rendering_is_deterministic() {
        let forest = vec![class_line(), ReviewLine::blank(), class_line()];
        let options = RenderOptions::default();
        assert_eq!(render_forest(&forest, &options), render_forest(&forest, &options));
    }
}
