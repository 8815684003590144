//! Render configuration.
//!
//! # Examples
//!
//! ```
//! use sheet_stencil::template::RenderConfig;
//!
//! # fn main() -> sheet_stencil::Result<()> {
//! let config = RenderConfig::from_yaml_str(
//!     "search_roots: [/srv/templates, /usr/share/templates]\ntracker_name: pos\n",
//! )?;
//! assert_eq!(config.search_roots.len(), 2);
//! assert_eq!(config.tracker_name, "pos");
//! assert_eq!(config.content_entry, "content.xml");
//! # Ok(())
//! # }
//! ```

use crate::common::{Error, Result};
use crate::odf::constants::ODF_CONTENT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default context name of the position tracker.
pub const DEFAULT_TRACKER_NAME: &str = "tbl";

/// Plain-text stand-ins for the evaluator's value delimiters.
///
/// Spreadsheet applications tend to autocorrect braces, so templates may
/// spell `{{ x }}` as `_start_ x _end_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aliases {
    /// Replaced by the opening delimiter
    pub start: String,
    /// Replaced by the closing delimiter
    pub end: String,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            start: "_start_".to_string(),
            end: "_end_".to_string(),
        }
    }
}

/// Settings shared by every render of a [`TemplateRenderer`](super::TemplateRenderer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Directories searched, in order, for relative template names
    pub search_roots: Vec<PathBuf>,
    /// Container entry holding the content stream
    pub content_entry: String,
    /// Context name under which a fresh position tracker is injected
    pub tracker_name: String,
    /// Directory for rendered outputs (system temp directory when unset)
    pub temp_dir: Option<PathBuf>,
    /// Delimiter aliases
    pub aliases: Aliases,
    /// Output file suffix, e.g. `.ods` (template's own extension when unset)
    pub output_suffix: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            content_entry: ODF_CONTENT.to_string(),
            tracker_name: DEFAULT_TRACKER_NAME.to_string(),
            temp_dir: None,
            aliases: Aliases::default(),
            output_suffix: None,
        }
    }
}

impl RenderConfig {
    /// Parse a YAML document; missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse render configuration: {}", e)))
    }

    /// Load a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml_string(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize render configuration: {}", e)))
    }

    /// Append a search root.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_roots.push(root.into());
        self
    }

    /// Set the output directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Set the tracker's context name.
    pub fn with_tracker_name(mut self, name: impl Into<String>) -> Self {
        self.tracker_name = name.into();
        self
    }

    /// Set the delimiter aliases.
    pub fn with_aliases(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.aliases = Aliases {
            start: start.into(),
            end: end.into(),
        };
        self
    }

    /// Set the content entry name.
    pub fn with_content_entry(mut self, entry: impl Into<String>) -> Self {
        self.content_entry = entry.into();
        self
    }

    /// Set the output suffix.
    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = Some(suffix.into());
        self
    }

    /// Output directory in effect.
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
