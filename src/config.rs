//! Import configuration
//!
//! Every heuristic the importer leans on (extension allow-list, tab width,
//! snap window, classifier ratios) is a named knob here, loadable from an
//! optional YAML file. With no config file present the defaults mirror the
//! module constants they come from.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::align::{AlignPolicy, DEFAULT_SNAP_WINDOW, DEFAULT_TAB_WIDTH};
use crate::classify::{ClassifyPolicy, DEFAULT_CHORD_FILE_RATIO, DEFAULT_CHORD_LINE_RATIO};
use crate::error::ChartError;

/// Tunable import settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportConfig {
    /// Document extensions to import.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Formats recognized but not importable; skipped with a warning.
    #[serde(default = "default_unsupported_extensions")]
    pub unsupported_extensions: Vec<String>,

    /// Tab stop width used when expanding chord/lyric columns.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// How far (in characters) a chord may snap to reach a word start.
    #[serde(default = "default_snap_window")]
    pub snap_window: usize,

    /// Minimum fraction of a line's tokens that must be chords.
    #[serde(default = "default_chord_line_ratio")]
    pub chord_line_ratio: f64,

    /// Fraction of non-empty lines that must carry chords for a file to
    /// classify as a chord chart.
    #[serde(default = "default_chord_file_ratio")]
    pub chord_file_ratio: f64,
}

fn default_extensions() -> Vec<String> {
    vec!["odt".into(), "doc".into(), "docx".into(), "txt".into()]
}

fn default_unsupported_extensions() -> Vec<String> {
    vec!["pages".into()]
}

fn default_tab_width() -> usize {
    DEFAULT_TAB_WIDTH
}

fn default_snap_window() -> usize {
    DEFAULT_SNAP_WINDOW
}

fn default_chord_line_ratio() -> f64 {
    DEFAULT_CHORD_LINE_RATIO
}

fn default_chord_file_ratio() -> f64 {
    DEFAULT_CHORD_FILE_RATIO
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            unsupported_extensions: default_unsupported_extensions(),
            tab_width: default_tab_width(),
            snap_window: default_snap_window(),
            chord_line_ratio: default_chord_line_ratio(),
            chord_file_ratio: default_chord_file_ratio(),
        }
    }
}

impl ImportConfig {
    /// Load settings from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ChartError> {
        let contents = fs::read_to_string(path).map_err(|e| ChartError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&contents).map_err(|e| ChartError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn classify_policy(&self) -> ClassifyPolicy {
        ClassifyPolicy {
            chord_line_ratio: self.chord_line_ratio,
            chord_file_ratio: self.chord_file_ratio,
        }
    }

    pub fn align_policy(&self) -> AlignPolicy {
        AlignPolicy {
            tab_width: self.tab_width,
            snap_window: self.snap_window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ImportConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ImportConfig::default());
        assert_eq!(config.tab_width, DEFAULT_TAB_WIDTH);
        assert!(config.extensions.contains(&"docx".to_string()));
    }

    #[test]
    fn test_partial_yaml_overrides() {
        let config = ImportConfig::from_yaml("snap_window: 6\nextensions: [rtf]\n").unwrap();
        assert_eq!(config.snap_window, 6);
        assert_eq!(config.extensions, vec!["rtf".to_string()]);
        // Untouched fields keep their defaults
        assert_eq!(config.chord_file_ratio, DEFAULT_CHORD_FILE_RATIO);
    }

    #[test]
    fn test_policies_derive_from_config() {
        let config = ImportConfig::from_yaml("chord_line_ratio: 1.0\ntab_width: 8\n").unwrap();
        assert_eq!(config.classify_policy().chord_line_ratio, 1.0);
        assert_eq!(config.align_policy().tab_width, 8);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = ImportConfig::load(Path::new("/no/such/config.yaml")).unwrap_err();
        assert!(matches!(err, ChartError::Config { .. }));
    }
}
