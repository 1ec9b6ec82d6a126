// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::panel::PanelOptions;
use crate::render::RenderOptions;
use crate::utils::*;

pub const CONFIG_FILE_NAME: &str = "api-tree-diff.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub indent_width: usize,
    pub skip_documentation: bool,
    pub show_hidden: bool,
    /// `None` decides based on whether stdout is a terminal.
    pub color: Option<bool>,
    pub pager: Option<bool>,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: 4,
            skip_documentation: false,
            show_hidden: false,
            color: None,
            pager: None,
        }
    }
}
impl Config {
    pub fn from_toml(text: &str) -> Result<Config> {
        Ok(toml::from_str(text)?)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            skip_docs: self.skip_documentation,
            indent_width: self.indent_width,
        }
    }

    pub fn panel_options(&self) -> PanelOptions {
        PanelOptions {
            show_hidden: self.show_hidden,
            skip_docs: self.skip_documentation,
        }
    }
}

pub fn get_project_dirs() -> Option<&'static ProjectDirs> {
    lazy_static! {
        static ref PROJECT_DIRS: Option<ProjectDirs> = ProjectDirs::from("", "", "api-tree-diff");
    }
    PROJECT_DIRS.as_ref()
}

pub fn default_config_path() -> Option<PathBuf> {
    get_project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn load_file(path: &Path) -> Result<Config> {
    try_forward(
        || Config::from_toml(std::str::from_utf8(&read_bytes(path)?)?),
        || format!("Error loading {}", path.display()),
    )
}

/// Load the configuration from `path`, or from the default location if no
/// path is given. Only an explicitly given file is required to exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_file(path);
    }

    match default_config_path() {
        Some(path) if path.is_file() => load_file(&path),
        _ => Ok(Config::default()),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() -> Result<()> {
        let config = Config::from_toml("indent_width = 2\ncolor = false\n")?;
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.color, Some(false));
        assert_eq!(config.pager, None);
        assert!(!config.skip_documentation);
        assert_eq!(config.render_options().indent_width, 2);
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_toml("indent = 2\n").is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = load_config(Some(Path::new("no/such/config.toml"))).unwrap_err();
        assert!(err.to_string().starts_with("Error loading no/such/config.toml"));
    }
}
