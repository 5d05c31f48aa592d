//! Ordered set of configured source files
//!
//! Tracks which file is "current" and supports cycling forward/backward.
//! The index is only ever moved by user navigation, never by the watcher.

use thiserror::Error;

/// Returned when a source set has no paths to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no source files configured")]
pub struct EmptySetError;

/// Ordered list of configured file paths with a current position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    paths: Vec<String>,
    index: usize,
}

impl SourceSet {
    /// Create a set from paths in configured order, starting at the first one
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths, index: 0 }
    }

    /// The currently selected path
    pub fn current(&self) -> Result<&str, EmptySetError> {
        self.paths
            .get(self.index)
            .map(String::as_str)
            .ok_or(EmptySetError)
    }

    /// Advance to the next source, wrapping at the end
    pub fn next(&mut self) {
        if self.paths.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.paths.len();
    }

    /// Retreat to the previous source, wrapping at the start
    pub fn previous(&mut self) {
        if self.paths.is_empty() {
            return;
        }
        self.index = (self.index + self.paths.len() - 1) % self.paths.len();
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Replace the configured paths.
    ///
    /// Keeps the current path selected if it survives the change, otherwise
    /// resets to the first entry.
    pub fn replace(&mut self, paths: Vec<String>) {
        let keep = self
            .current()
            .ok()
            .and_then(|current| paths.iter().position(|p| p == current));
        self.paths = paths;
        self.index = keep.unwrap_or(0);
    }
}
