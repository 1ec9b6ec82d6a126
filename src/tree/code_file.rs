// SPDX-License-Identifier: MIT

use log::warn;
use serde::{Deserialize, Serialize};

use super::{LineIndex, ReviewLine};
use crate::utils::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}
impl DiagnosticLevel {
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticLevel::Info => "info",
            DiagnosticLevel::Warning => "warning",
            DiagnosticLevel::Error => "error",
        }
    }
}

/// A system generated remark attached to a line id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDiagnostic {
    #[serde(default)]
    pub diagnostic_id: String,
    pub target_id: String,
    pub text: String,
    pub level: DiagnosticLevel,
}

/// One revision of a package's API as produced by a language front end.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeFile {
    #[serde(default)]
    pub package_name: String,
    #[serde(default)]
    pub package_version: String,
    #[serde(default)]
    pub parser_version: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_language_package_id: Option<String>,
    pub review_lines: Vec<ReviewLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<CodeDiagnostic>,
}

impl CodeFile {
    pub fn new<S: Into<String>>(package_name: S, review_lines: Vec<ReviewLine>) -> Self {
        Self {
            package_name: package_name.into(),
            review_lines,
            ..Default::default()
        }
    }

    /// A copy of this file's metadata around a different forest.
    pub fn with_review_lines(&self, review_lines: Vec<ReviewLine>) -> CodeFile {
        CodeFile {
            package_name: self.package_name.clone(),
            package_version: self.package_version.clone(),
            parser_version: self.parser_version.clone(),
            language: self.language.clone(),
            cross_language_package_id: self.cross_language_package_id.clone(),
            review_lines,
            diagnostics: self.diagnostics.clone(),
        }
    }

    pub fn from_json(text: &str) -> Result<CodeFile> {
        try_forward(
            || -> Result<CodeFile> { Ok(serde_json::from_str(text)?) },
            || "parsing code file",
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Diagnostics whose target line exists. Others are logged and dropped.
    pub fn resolved_diagnostics(&self) -> Vec<&CodeDiagnostic> {
        let index = LineIndex::new(&self.review_lines);
        self.diagnostics
            .iter()
            .filter(|diagnostic| {
                let found = index.contains_id(&diagnostic.target_id);
                if !found {
                    warn!(
                        "{}: diagnostic {:?} targets unknown line {:?}",
                        self.package_name, diagnostic.diagnostic_id, diagnostic.target_id
                    );
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"{
        "PackageName": "azure.template",
        "PackageVersion": "1.0.0",
        "Language": "C#",
        "ReviewLines": [
            {"LineId": "N1", "Tokens": [{"Kind": 2, "Value": "namespace"}, {"Kind": 0, "Value": "Azure"}]},
            {"Tokens": []}
        ],
        "Diagnostics": [
            {"DiagnosticId": "AZC0001", "TargetId": "N1", "Text": "bad", "Level": "Warning"},
            {"TargetId": "gone", "Text": "stale", "Level": "Info"}
        ]
    }"#;

    #[test]
    fn parse_sample() -> Result<()> {
        let file = CodeFile::from_json(SAMPLE)?;
        assert_eq!(file.package_name, "azure.template");
        assert_eq!(file.review_lines.len(), 2);
        assert_eq!(file.diagnostics.len(), 2);

        let resolved = file.resolved_diagnostics();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].diagnostic_id, "AZC0001");
        Ok(())
    }

    #[test]
    fn json_round_trip_keeps_tree() -> Result<()> {
        let file = CodeFile::from_json(SAMPLE)?;
        let again = CodeFile::from_json(&file.to_json()?)?;
        assert_eq!(file, again);
        Ok(())
    }

    #[test]
    fn parse_error_has_context() {
        let err = CodeFile::from_json("{").unwrap_err();
        assert!(err.to_string().starts_with("parsing code file: "));
    }
}
