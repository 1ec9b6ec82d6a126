// SPDX-License-Identifier: MIT

use std::io::Write;

use lazy_static::lazy_static;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::panel::{CodePanel, CodePanelRow};
use crate::tree::{CodeDiagnostic, DiffKind};

#[derive(Default)]
struct Colors {
    default: ColorSpec,
    added: ColorSpec,
    removed: ColorSpec,
    changed: ColorSpec,
    moved: ColorSpec,
    hidden: ColorSpec,
    diagnostic: ColorSpec,
}
impl Colors {
    fn new() -> Self {
        let mut colors = Colors {
            ..Default::default()
        };
        colors.added.set_fg(Some(Color::Green));
        colors.removed.set_fg(Some(Color::Red));
        colors.changed.set_fg(Some(Color::Yellow));
        colors.moved.set_fg(Some(Color::Cyan));
        colors.hidden.set_dimmed(true);
        colors.diagnostic.set_fg(Some(Color::Magenta));
        colors
    }
}
lazy_static! {
    static ref COLORS: Colors = Colors::new();
}

fn get_row_color(row: &CodePanelRow) -> &'static ColorSpec {
    if row.is_hidden {
        return &COLORS.hidden;
    }
    match row.diff_kind {
        DiffKind::Added => &COLORS.added,
        DiffKind::Removed => &COLORS.removed,
        DiffKind::Changed => &COLORS.changed,
        DiffKind::Unchanged | DiffKind::NoneDiff => {
            if row.is_moved {
                &COLORS.moved
            } else {
                &COLORS.default
            }
        }
    }
}

/// Writes panel rows as a line-by-line diff: a one character diff marker,
/// then the indented line text. Diagnostics follow their row, marked `!`.
pub struct Writer {
    indent_width: usize,
}
impl Writer {
    pub fn new(indent_width: usize) -> Self {
        Self { indent_width }
    }

    pub fn write_row(&self, out: &mut dyn WriteColor, row: &CodePanelRow) -> std::io::Result<()> {
        let color = get_row_color(row);
        if color != &COLORS.default {
            out.set_color(color)?;
        }

        let mut text = String::new();
        text.push(row.diff_kind.symbol());
        if !row.text.is_empty() {
            text.push(' ');
            text.extend(std::iter::repeat(' ').take(row.indent * self.indent_width));
            text.push_str(&row.text);
        }
        out.write_all(text.trim_end().as_bytes())?;

        if color != &COLORS.default {
            out.reset()?;
        }
        out.write_all(b"\n")
    }

    fn write_diagnostic(
        &self,
        out: &mut dyn WriteColor,
        indent: usize,
        diagnostic: &CodeDiagnostic,
    ) -> std::io::Result<()> {
        out.set_color(&COLORS.diagnostic)?;
        write!(
            out,
            "! {}{}: {}",
            " ".repeat(indent * self.indent_width),
            diagnostic.level.name(),
            diagnostic.text
        )?;
        out.reset()?;
        out.write_all(b"\n")
    }

    pub fn write(&self, out: &mut dyn WriteColor, panel: &CodePanel) -> std::io::Result<()> {
        for row in panel.rows() {
            self.write_row(out, row)?;
            for diagnostic in &row.diagnostics {
                self.write_diagnostic(out, row.indent, diagnostic)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::diff::diff_trees;
    use crate::panel::{build_code_panel, build_file_panel, PanelOptions};
    use crate::tree::{CodeFile, DiagnosticLevel, ReviewLine, ReviewToken as T};

    #[test]
    fn markers_and_indentation() -> std::io::Result<()> {
        let old = vec![ReviewLine::new(Some("T"), vec![T::keyword("class"), T::type_name("T")])
            .with_children(vec![ReviewLine::new(Some("A"), vec![T::member_name("A")])])];
        let new = vec![ReviewLine::new(Some("T"), vec![T::keyword("class"), T::type_name("T")])
            .with_children(vec![
                ReviewLine::new(Some("A"), vec![T::member_name("A")]),
                ReviewLine::blank(),
                ReviewLine::new(Some("B"), vec![T::member_name("B")]),
            ])];

        let diff = diff_trees(&old, &new);
        let panel = build_code_panel(&diff.lines, &PanelOptions::default());

        let mut out = termcolor::NoColor::new(Vec::new());
        Writer::new(2).write(&mut out, &panel)?;
        assert_eq!(
            String::from_utf8_lossy(&out.into_inner()),
            "~ class T\n    A\n\n+   B\n"
        );
        Ok(())
    }

    #[test]
    fn diagnostics_follow_their_row() -> std::io::Result<()> {
        let mut file = CodeFile::new(
            "pkg",
            vec![ReviewLine::new(Some("T"), vec![T::keyword("class"), T::type_name("T")])
                .with_children(vec![ReviewLine::new(Some("A"), vec![T::member_name("A")])])],
        );
        file.diagnostics.push(CodeDiagnostic {
            diagnostic_id: "AZC0012".into(),
            target_id: "A".into(),
            text: "Avoid single word names".into(),
            level: DiagnosticLevel::Warning,
        });
        let panel = build_file_panel(&file, &PanelOptions::default());

        let mut out = termcolor::NoColor::new(Vec::new());
        Writer::new(4).write(&mut out, &panel)?;
        assert_eq!(
            String::from_utf8_lossy(&out.into_inner()),
            "  class T\n      A\n!     warning: Avoid single word names\n"
        );
        Ok(())
    }
}
