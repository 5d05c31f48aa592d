//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use textpane::highlight::{default_formatters, default_lexers, default_styles};
use textpane::panel::{Panel, RecordingHost};
use textpane::{RenderSettings, Renderer, SourceSet};

/// Scratch directory holding the files a test displays
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Write `contents` to `name` and return the path as a source string
    pub fn write(&self, name: &str, contents: impl AsRef<[u8]>) -> String {
        let path = self.path(name);
        fs::write(&path, contents).expect("Failed to write fixture file");
        path.to_string_lossy().to_string()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn source(&self, name: &str) -> String {
        self.path(name).to_string_lossy().to_string()
    }
}

pub fn settings(highlight: bool, style: &str) -> RenderSettings {
    RenderSettings {
        highlight_enabled: highlight,
        style_name: style.to_string(),
        formatter_name: "terminal256".to_string(),
    }
}

/// Renderer that ignores the user's styles directory
pub fn test_renderer() -> Renderer {
    Renderer::with_chains(default_lexers(), default_styles(None), default_formatters())
}

pub fn test_panel(paths: Vec<String>, settings: RenderSettings) -> Panel<RecordingHost> {
    Panel::new(SourceSet::new(paths), settings, RecordingHost::new(40)).with_renderer(test_renderer())
}
