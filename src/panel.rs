// SPDX-License-Identifier: MIT

//! Flattened view of an annotated forest, one row per displayed line.
//!
//! Each row carries the stable node id of its line and of its parent; the
//! ids are what a review front end stores comment anchors against.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use crate::node_id::{node_id_hash, ROOT_NODE_ID};
use crate::render::line_text;
use crate::tree::{CodeDiagnostic, CodeFile, DiffKind, ReviewLine};

#[derive(Debug, Clone, Copy, Default)]
pub struct PanelOptions {
    /// Keep hidden lines (and their subtrees) as rows.
    pub show_hidden: bool,
    /// Drop documentation lines (and their subtrees).
    pub skip_docs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodePanelRow {
    pub node_id_hash: String,
    pub parent_node_id_hash: String,
    pub line_id: Option<String>,
    pub indent: usize,
    pub diff_kind: DiffKind,
    pub is_moved: bool,
    pub is_hidden: bool,
    pub is_documentation: bool,
    pub is_context_end_line: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<CodeDiagnostic>,
}

/// Outline entry for a displayed scope (a line with an id and children).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub node_id_hash: String,
    pub line_id: String,
    pub label: String,
    pub depth: usize,
    pub diff_kind: DiffKind,
}

#[derive(Debug, Default)]
pub struct CodePanel {
    rows: Vec<CodePanelRow>,
    children: HashMap<String, Vec<String>>,
    navigation: Vec<NavigationEntry>,
    /// Row of each line id, preferring the new revision.
    by_line_id: HashMap<String, usize>,
}
impl CodePanel {
    pub fn rows(&self) -> &[CodePanelRow] {
        &self.rows
    }

    /// Node ids of the rows directly below `node_id_hash`, in order. Use
    /// [`ROOT_NODE_ID`] for the top level.
    pub fn children_of(&self, node_id_hash: &str) -> &[String] {
        self.children
            .get(node_id_hash)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn row(&self, node_id_hash: &str) -> Option<&CodePanelRow> {
        self.rows.iter().find(|row| row.node_id_hash == node_id_hash)
    }

    /// The row a link to `line_id` (e.g. a token's `navigate_to_id`)
    /// resolves to. Removed and context end rows are never link targets.
    pub fn row_for_line_id(&self, line_id: &str) -> Option<&CodePanelRow> {
        self.by_line_id.get(line_id).map(|&idx| &self.rows[idx])
    }

    pub fn navigation(&self) -> &[NavigationEntry] {
        &self.navigation
    }

    /// Attach diagnostics to the rows of their target lines. Returns the
    /// diagnostics whose target is not displayed.
    pub fn attach_diagnostics<'d, I>(&mut self, diagnostics: I) -> Vec<&'d CodeDiagnostic>
    where
        I: IntoIterator<Item = &'d CodeDiagnostic>,
    {
        let mut unplaced = Vec::new();
        for diagnostic in diagnostics {
            match self.by_line_id.get(&diagnostic.target_id) {
                Some(&idx) => self.rows[idx].diagnostics.push(diagnostic.clone()),
                None => unplaced.push(diagnostic),
            }
        }
        unplaced
    }

    pub fn has_diff(&self) -> bool {
        self.rows.iter().any(|row| row.diff_kind.is_modified())
    }

    /// Rows that are not hidden, even if the panel was built to include
    /// hidden rows.
    pub fn visible_rows(&self) -> impl Iterator<Item = &CodePanelRow> + '_ {
        self.rows.iter().filter(|row| !row.is_hidden)
    }

    fn add_rows(&mut self, lines: &[ReviewLine], parent: &str, indent: usize, options: &PanelOptions) {
        for (sibling_index, line) in lines.iter().enumerate() {
            if line.is_hidden && !options.show_hidden {
                continue;
            }
            if line.is_documentation() && options.skip_docs {
                continue;
            }

            let hash = node_id_hash(line, parent, sibling_index);
            self.children
                .entry(parent.to_string())
                .or_default()
                .push(hash.clone());

            let text = line_text(line);
            if let Some(line_id) = &line.line_id {
                if !line.is_context_end_line && line.diff_kind != DiffKind::Removed {
                    self.by_line_id.entry(line_id.clone()).or_insert(self.rows.len());
                }
                if !line.children.is_empty() && !line.is_context_end_line {
                    self.navigation.push(NavigationEntry {
                        node_id_hash: hash.clone(),
                        line_id: line_id.clone(),
                        label: text.clone(),
                        depth: indent,
                        diff_kind: line.diff_kind,
                    });
                }
            }
            self.rows.push(CodePanelRow {
                node_id_hash: hash.clone(),
                parent_node_id_hash: parent.to_string(),
                line_id: line.line_id.clone(),
                indent,
                diff_kind: line.diff_kind,
                is_moved: line.is_moved,
                is_hidden: line.is_hidden,
                is_documentation: line.is_documentation(),
                is_context_end_line: line.is_context_end_line,
                text,
                diagnostics: Vec::new(),
            });

            self.add_rows(&line.children, &hash, indent + 1, options);
        }
    }
}

/// Flatten `lines` into panel rows in pre-order.
pub fn build_code_panel(lines: &[ReviewLine], options: &PanelOptions) -> CodePanel {
    let mut panel = CodePanel::default();
    panel.add_rows(lines, ROOT_NODE_ID, 0, options);
    panel
}

/// Flatten a code file, attaching its diagnostics to their rows.
pub fn build_file_panel(code_file: &CodeFile, options: &PanelOptions) -> CodePanel {
    let mut panel = build_code_panel(&code_file.review_lines, options);
    for diagnostic in panel.attach_diagnostics(code_file.resolved_diagnostics()) {
        debug!(
            "diagnostic {:?} targets {:?}, which is not displayed",
            diagnostic.diagnostic_id, diagnostic.target_id
        );
    }
    panel
}
