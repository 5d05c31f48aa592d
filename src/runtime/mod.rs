//! Runtime module - wires the panel to its watcher
//!
//! - `app` - the message loop between the watcher thread and the panel

pub mod app;

pub use app::{post, PanelRuntime};
