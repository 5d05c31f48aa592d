//! Message types for the Elm-style update loop
//!
//! Everything that changes the panel arrives as a [`Msg`] on the UI thread,
//! whether it came from the watcher thread or from the keyboard.

use std::path::PathBuf;

use crate::fs_watcher::WatchEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A watched file was written (resolved path)
    FileChanged(PathBuf),
    /// The watcher reported an error and is running degraded
    WatcherFailed(String),
    /// The watcher saw writes again after a failure
    WatcherRecovered,
    /// Show the next source
    NextSource,
    /// Show the previous source
    PreviousSource,
    /// Re-read and redraw the current source
    Refresh,
    Quit,
}

impl From<WatchEvent> for Msg {
    fn from(event: WatchEvent) -> Self {
        match event {
            WatchEvent::Changed(path) => Msg::FileChanged(path),
            WatchEvent::Failed(reason) => Msg::WatcherFailed(reason),
            WatchEvent::Recovered => Msg::WatcherRecovered,
        }
    }
}

/// What the runtime should do after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    None,
    /// Re-render the current source
    Redraw,
    /// Paint the last display state again with a fresh title
    Repaint,
    Quit,
}

impl Cmd {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Cmd::Redraw | Cmd::Repaint)
    }
}
