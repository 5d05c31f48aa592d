//! textpane - live-updating text file panel
//!
//! A panel cycles through a list of files, renders the current one as plain
//! or syntax-highlighted text, and redraws it whenever the file is written.
//! The file watcher runs on its own thread and talks to the panel only
//! through a bounded message queue.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod fs_watcher;
pub mod highlight;
pub mod markup;
pub mod messages;
pub mod panel;
pub mod runtime;
pub mod sources;
pub mod style;
pub mod syntax;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::PanelConfig;
pub use fs_watcher::{WatchError, WatchEvent, Watcher, WatcherState};
pub use highlight::{RenderSettings, RenderedText, Renderer};
pub use messages::{Cmd, Msg};
pub use panel::{DisplayState, Health, Host, Panel};
pub use runtime::PanelRuntime;
pub use sources::{EmptySetError, SourceSet};
