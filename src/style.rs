//! Colour styles for syntax highlighting
//!
//! Provides YAML-based styles with compile-time embedded builtins and
//! user-defined styles from the config directory.
//!
//! Style loading priority:
//! 1. User config: `~/.config/textpane/styles/{id}.yaml`
//! 2. Embedded: Built-in styles compiled into binary
//!
//! A style maps tree-sitter capture names to colours. Names resolve
//! hierarchically, so a style that only defines `keyword` also colours
//! `keyword.function` and `keyword.return`.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::syntax::{HighlightId, HIGHLIGHT_NAMES};

// Embed style YAML files at compile time
pub const MONOKAI_YAML: &str = include_str!("../styles/monokai.yaml");
pub const GITHUB_DARK_YAML: &str = include_str!("../styles/github-dark.yaml");
pub const GITHUB_LIGHT_YAML: &str = include_str!("../styles/github-light.yaml");
pub const SOLARIZED_DARK_YAML: &str = include_str!("../styles/solarized-dark.yaml");

/// Style used when the configured name is unknown
pub const FALLBACK_STYLE_ID: &str = "monokai";

/// A built-in style entry
pub struct BuiltinStyle {
    /// Stable identifier for config (e.g. "monokai", "github-dark")
    pub id: &'static str,
    /// Embedded YAML content
    pub yaml: &'static str,
}

/// Registry of all built-in styles
pub const BUILTIN_STYLES: &[BuiltinStyle] = &[
    BuiltinStyle {
        id: "monokai",
        yaml: MONOKAI_YAML,
    },
    BuiltinStyle {
        id: "github-dark",
        yaml: GITHUB_DARK_YAML,
    },
    BuiltinStyle {
        id: "github-light",
        yaml: GITHUB_LIGHT_YAML,
    },
    BuiltinStyle {
        id: "solarized-dark",
        yaml: SOLARIZED_DARK_YAML,
    },
];

/// Errors from loading a style
#[derive(Debug, Error)]
pub enum StyleError {
    #[error("failed to read style file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid color format: {0}")]
    InvalidColor(String),
    #[error("unknown style id: {0}")]
    Unknown(String),
}

/// Where the style came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    /// User-defined style in ~/.config/textpane/styles/
    User,
    /// Built-in style embedded in binary
    Builtin,
}

/// Information about an available style
#[derive(Debug, Clone)]
pub struct StyleInfo {
    /// Stable identifier (e.g., "monokai", "my-custom-style")
    pub id: String,
    /// Display name from YAML (e.g., "Monokai")
    pub name: String,
    /// Where this style is loaded from
    pub source: StyleSource,
}

/// RGB color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from "#RRGGBB" hex string
    pub fn from_hex(s: &str) -> Result<Self, StyleError> {
        let hex = s.trim_start_matches('#');
        let invalid = || StyleError::InvalidColor(s.to_string());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Format as lowercase "#rrggbb"
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Raw style data as parsed from YAML
#[derive(Debug, Clone, Deserialize)]
pub struct StyleData {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub syntax: HashMap<String, TokenStyleData>,
}

/// Colours and attributes for one capture name (raw strings from YAML)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenStyleData {
    #[serde(default)]
    pub fg: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

/// Resolved colours and attributes for one token class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStyle {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TokenStyle {
    /// True when applying this style changes nothing
    pub fn is_plain(&self) -> bool {
        *self == TokenStyle::default()
    }

    fn from_data(data: &TokenStyleData) -> Result<Self, StyleError> {
        Ok(TokenStyle {
            fg: data.fg.as_deref().map(Color::from_hex).transpose()?,
            bg: data.bg.as_deref().map(Color::from_hex).transpose()?,
            bold: data.bold,
            italic: data.italic,
            underline: data.underline,
        })
    }
}

/// Resolved style with parsed colours, indexed by highlight id
#[derive(Debug, Clone)]
pub struct Style {
    pub name: String,
    /// Default text colour
    pub foreground: Option<Color>,
    /// Default background colour
    pub background: Option<Color>,
    tokens: Vec<TokenStyle>,
}

impl Style {
    /// Load style from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        let data: StyleData = serde_yaml::from_str(yaml)?;
        Self::from_data(data)
    }

    /// Load a built-in style by id
    pub fn from_builtin(id: &str) -> Result<Self, StyleError> {
        let entry = BUILTIN_STYLES
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| StyleError::Unknown(id.to_string()))?;
        Style::from_yaml(entry.yaml)
    }

    /// Load a style from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, StyleError> {
        let content = std::fs::read_to_string(path).map_err(|source| StyleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Style::from_yaml(&content)
    }

    /// Convert raw style data to a resolved style
    pub fn from_data(data: StyleData) -> Result<Self, StyleError> {
        let mut parsed = HashMap::with_capacity(data.syntax.len());
        for (name, token) in &data.syntax {
            parsed.insert(name.as_str(), TokenStyle::from_data(token)?);
        }

        // Resolve each known capture name, walking up to parent names
        let tokens = HIGHLIGHT_NAMES
            .iter()
            .map(|&name| {
                let mut current = name;
                loop {
                    if let Some(style) = parsed.get(current) {
                        return *style;
                    }
                    match current.rfind('.') {
                        Some(dot) => current = &current[..dot],
                        None => return TokenStyle::default(),
                    }
                }
            })
            .collect();

        Ok(Style {
            name: data.name,
            foreground: data.foreground.as_deref().map(Color::from_hex).transpose()?,
            background: data.background.as_deref().map(Color::from_hex).transpose()?,
            tokens,
        })
    }

    /// Style for a highlight id (plain if the style does not colour it)
    pub fn token_style(&self, id: HighlightId) -> TokenStyle {
        self.tokens.get(id as usize).copied().unwrap_or_default()
    }

    /// Base style for untokenized text
    pub fn base(&self) -> TokenStyle {
        TokenStyle {
            fg: self.foreground,
            ..TokenStyle::default()
        }
    }

    /// The fallback style (YAML-backed with a Rust fallback)
    pub fn fallback() -> Self {
        match Style::from_builtin(FALLBACK_STYLE_ID) {
            Ok(style) => style,
            Err(e) => {
                tracing::error!("Embedded fallback style failed to load: {}", e);
                Style {
                    name: "Fallback".to_string(),
                    foreground: None,
                    background: None,
                    tokens: vec![TokenStyle::default(); HIGHLIGHT_NAMES.len()],
                }
            }
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Load a style from the user styles directory only
pub fn load_user_style(dir: &Path, id: &str) -> Option<Result<Style, StyleError>> {
    let path = dir.join(format!("{}.yaml", id));
    if !path.exists() {
        return None;
    }
    tracing::info!("Loading user style from {}", path.display());
    Some(Style::from_file(&path))
}

/// List all available styles from all sources
///
/// User styles override builtins with the same id.
pub fn list_available_styles(user_dir: Option<&Path>) -> Vec<StyleInfo> {
    let mut styles = Vec::new();
    let mut seen_ids = HashSet::new();

    if let Some(entries) = user_dir.and_then(|dir| std::fs::read_dir(dir).ok()) {
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
            .collect();
        paths.sort();

        for path in paths {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if seen_ids.insert(id.to_string()) {
                let name = Style::from_file(&path)
                    .map(|s| s.name)
                    .unwrap_or_else(|_| id.to_string());
                styles.push(StyleInfo {
                    id: id.to_string(),
                    name,
                    source: StyleSource::User,
                });
            }
        }
    }

    for builtin in BUILTIN_STYLES {
        if seen_ids.insert(builtin.id.to_string()) {
            let name = Style::from_yaml(builtin.yaml)
                .map(|s| s.name)
                .unwrap_or_else(|_| builtin.id.to_string());
            styles.push(StyleInfo {
                id: builtin.id.to_string(),
                name,
                source: StyleSource::Builtin,
            });
        }
    }

    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::highlight_id_for_name;

    #[test]
    fn test_color_from_hex() {
        let color = Color::from_hex("#1E1E1E").unwrap();
        assert_eq!(color, Color::rgb(0x1E, 0x1E, 0x1E));
        assert_eq!(color.to_hex(), "#1e1e1e");
    }

    #[test]
    fn test_color_from_hex_invalid() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#GGGGGG").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_all_builtin_styles_parse() {
        for builtin in BUILTIN_STYLES {
            let style = Style::from_yaml(builtin.yaml)
                .unwrap_or_else(|e| panic!("Failed to parse style '{}': {}", builtin.id, e));
            assert!(!style.name.is_empty(), "Style '{}' has empty name", builtin.id);
            assert!(style.foreground.is_some());
        }
    }

    #[test]
    fn test_fallback_is_monokai() {
        let style = Style::fallback();
        assert_eq!(style.name, "Monokai");
    }

    #[test]
    fn test_unknown_builtin_is_error() {
        assert!(matches!(
            Style::from_builtin("unknown-style"),
            Err(StyleError::Unknown(_))
        ));
    }

    #[test]
    fn test_hierarchical_resolution() {
        let style = Style::from_yaml(
            r##"
version: 1
name: "Test"
syntax:
  keyword: { fg: "#FF0000", bold: true }
"##,
        )
        .unwrap();

        let keyword = highlight_id_for_name("keyword").unwrap();
        let keyword_fn = highlight_id_for_name("keyword.function").unwrap();
        let comment = highlight_id_for_name("comment").unwrap();

        assert_eq!(style.token_style(keyword).fg, Some(Color::rgb(0xFF, 0, 0)));
        assert_eq!(style.token_style(keyword_fn), style.token_style(keyword));
        assert!(style.token_style(comment).is_plain());
    }

    #[test]
    fn test_specific_name_overrides_parent() {
        let style = Style::from_yaml(
            r##"
version: 1
name: "Test"
syntax:
  keyword: { fg: "#FF0000" }
  keyword.return: { fg: "#00FF00" }
"##,
        )
        .unwrap();

        let ret = highlight_id_for_name("keyword.return").unwrap();
        assert_eq!(style.token_style(ret).fg, Some(Color::rgb(0, 0xFF, 0)));
    }

    #[test]
    fn test_invalid_color_in_yaml_is_error() {
        let result = Style::from_yaml(
            r##"
version: 1
name: "Broken"
syntax:
  keyword: { fg: "red" }
"##,
        );
        assert!(matches!(result, Err(StyleError::InvalidColor(_))));
    }

    #[test]
    fn test_user_style_overrides_builtin_in_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("monokai.yaml"),
            "version: 1\nname: \"My Monokai\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let styles = list_available_styles(Some(dir.path()));
        let monokai: Vec<_> = styles.iter().filter(|s| s.id == "monokai").collect();
        assert_eq!(monokai.len(), 1);
        assert_eq!(monokai[0].source, StyleSource::User);
        assert_eq!(monokai[0].name, "My Monokai");
        assert_eq!(styles.len(), BUILTIN_STYLES.len());
    }

    #[test]
    fn test_load_user_style_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_user_style(dir.path(), "nope").is_none());
    }
}
