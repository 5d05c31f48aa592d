//! Panel configuration
//!
//! Read from `~/.config/textpane/config.yaml`. Every field is optional;
//! a missing or broken file means defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::fs_watcher::{DEFAULT_POLL_INTERVAL, MIN_POLL_INTERVAL};
use crate::highlight::{detect_formatter, RenderSettings};
use crate::panel::{PositionIndicator, Sigils};
use crate::style::FALLBACK_STYLE_ID;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    #[default]
    Sigils,
    Fraction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Single-source form
    pub file_path: Option<String>,
    /// Multiple-source form
    pub file_paths: Vec<String>,
    /// Syntax highlighting on/off
    pub format: bool,
    pub format_style: String,
    pub formatter: String,
    pub poll_interval_ms: u64,
    pub indicator: IndicatorKind,
    pub sigils: Sigils,
    /// Capacity of the redraw queue between the watcher and the UI
    pub queue_capacity: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            file_paths: Vec::new(),
            format: false,
            format_style: FALLBACK_STYLE_ID.to_string(),
            formatter: detect_formatter().to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            indicator: IndicatorKind::default(),
            sigils: Sigils::default(),
            queue_capacity: 16,
        }
    }
}

impl PanelConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// `file_path` then `file_paths`, duplicates removed, order kept
    pub fn sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for path in self.file_path.iter().chain(self.file_paths.iter()) {
            if !path.is_empty() && !sources.contains(path) {
                sources.push(path.clone());
            }
        }
        sources
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            highlight_enabled: self.format,
            style_name: self.format_style.clone(),
            formatter_name: self.formatter.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }

    pub fn position_indicator(&self) -> PositionIndicator {
        match self.indicator {
            IndicatorKind::Sigils => PositionIndicator::Sigils(self.sigils.clone()),
            IndicatorKind::Fraction => PositionIndicator::Fraction,
        }
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert!(!config.format);
        assert_eq!(config.format_style, "monokai");
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert_eq!(config.queue_capacity(), 16);
        assert!(config.sources().is_empty());
    }

    #[test]
    fn test_sources_merge_and_dedup() {
        let config: PanelConfig = serde_yaml::from_str(
            "file_path: /tmp/a.go\nfile_paths: [/tmp/b.txt, /tmp/a.go, /tmp/c.rs]\n",
        )
        .unwrap();
        assert_eq!(config.sources(), vec!["/tmp/a.go", "/tmp/b.txt", "/tmp/c.rs"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: PanelConfig =
            serde_yaml::from_str("format: true\nformat_style: github-dark\n").unwrap();
        let settings = config.render_settings();
        assert!(settings.highlight_enabled);
        assert_eq!(settings.style_name, "github-dark");
        assert_eq!(config.sigils, Sigils::default());
    }

    #[test]
    fn test_poll_interval_clamped() {
        let config = PanelConfig {
            poll_interval_ms: 1,
            ..PanelConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_indicator_kinds() {
        let config: PanelConfig = serde_yaml::from_str("indicator: fraction\n").unwrap();
        assert_eq!(config.position_indicator(), PositionIndicator::Fraction);

        let config: PanelConfig =
            serde_yaml::from_str("sigils:\n  normal: \"-\"\n  selected: \"*\"\n").unwrap();
        assert_eq!(
            config.position_indicator(),
            PositionIndicator::Sigils(Sigils {
                normal: "-".to_string(),
                selected: "*".to_string(),
            })
        );
    }

    #[test]
    fn test_load_from_missing_or_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert_eq!(PanelConfig::load_from(&path), PanelConfig::default());

        std::fs::write(&path, "format: [not a bool").unwrap();
        assert_eq!(PanelConfig::load_from(&path), PanelConfig::default());
    }
}
