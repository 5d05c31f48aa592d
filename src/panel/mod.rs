//! The text panel: current source, rendered and handed to the host
//!
//! A [`Panel`] owns the source list and the renderer and lives on the UI
//! thread. It never fails: render problems are already display text, and
//! watcher trouble only marks the panel as degraded.

mod host;
mod indicator;

pub use host::{DisplayState, Host, RecordingHost};
pub use indicator::{PositionIndicator, Sigils, DEFAULT_NORMAL_SIGIL, DEFAULT_SELECTED_SIGIL};

use std::path::Path;

use crate::highlight::{RenderSettings, RenderedText, Renderer};
use crate::markup;
use crate::messages::{Cmd, Msg};
use crate::sources::SourceSet;
use crate::util::expand_home;

/// Whether the file watcher is still trustworthy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Health {
    #[default]
    Healthy,
    Degraded { reason: String },
}

pub struct Panel<H: Host> {
    sources: SourceSet,
    renderer: Renderer,
    settings: RenderSettings,
    indicator: PositionIndicator,
    health: Health,
    host: H,
    last: Option<DisplayState>,
}

impl<H: Host> Panel<H> {
    pub fn new(sources: SourceSet, settings: RenderSettings, host: H) -> Self {
        Self {
            sources,
            renderer: Renderer::new(),
            settings,
            indicator: PositionIndicator::default(),
            health: Health::Healthy,
            host,
            last: None,
        }
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_indicator(mut self, indicator: PositionIndicator) -> Self {
        self.indicator = indicator;
        self
    }

    /// Render the current source and paint it
    pub fn display(&mut self) {
        let (title, body) = match self.sources.current() {
            Ok(current) => {
                let current = current.to_string();
                let body = self.renderer.render(&current, &self.settings);
                (self.title(&current), body)
            }
            Err(e) => (self.title(""), RenderedText::message(e.to_string())),
        };

        let state = DisplayState {
            title,
            indicator: self.position_indicator(),
            body,
        };
        self.host.paint(&state);
        self.last = Some(state);
    }

    pub fn next(&mut self) {
        self.sources.next();
        self.display();
    }

    pub fn previous(&mut self) {
        self.sources.previous();
        self.display();
    }

    pub fn refresh(&mut self) {
        self.display();
    }

    /// Paint the last frame again with an up-to-date title
    pub fn repaint(&mut self) {
        let Some(mut state) = self.last.take() else {
            self.display();
            return;
        };
        state.title = self.title(self.sources.current().unwrap_or(""));
        self.host.paint(&state);
        self.last = Some(state);
    }

    /// Apply a message and say what should happen next
    pub fn update(&mut self, msg: Msg) -> Cmd {
        match msg {
            Msg::FileChanged(path) => {
                if self.is_current(&path) {
                    Cmd::Redraw
                } else {
                    tracing::trace!("Ignoring change to {}", path.display());
                    Cmd::None
                }
            }
            Msg::WatcherFailed(reason) => {
                tracing::warn!("Panel degraded: {}", reason);
                self.health = Health::Degraded { reason };
                Cmd::Repaint
            }
            Msg::WatcherRecovered => {
                if self.health == Health::Healthy {
                    return Cmd::None;
                }
                tracing::info!("Panel healthy again");
                self.mark_healthy();
                Cmd::Repaint
            }
            Msg::NextSource => {
                self.sources.next();
                Cmd::Redraw
            }
            Msg::PreviousSource => {
                self.sources.previous();
                Cmd::Redraw
            }
            Msg::Refresh => Cmd::Redraw,
            Msg::Quit => Cmd::Quit,
        }
    }

    /// Carry out a command returned by [`Panel::update`]
    pub fn apply(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Redraw => self.display(),
            Cmd::Repaint => self.repaint(),
            Cmd::None | Cmd::Quit => {}
        }
    }

    /// Whether `path` is the resolved path of the current source
    pub fn is_current(&self, path: &Path) -> bool {
        self.sources
            .current()
            .ok()
            .and_then(|current| expand_home(current).ok())
            .is_some_and(|resolved| resolved == path)
    }

    pub fn position_indicator(&self) -> String {
        self.indicator
            .render(self.sources.index(), self.sources.len(), self.host.width())
    }

    fn title(&self, current: &str) -> String {
        let mut title = format!("[green:-:-]{}{}", markup::escape(current), markup::RESET_TAG);
        if matches!(self.health, Health::Degraded { .. }) {
            title.push_str(" [yellow:-:-](watch degraded)");
            title.push_str(markup::RESET_TAG);
        }
        title
    }

    /// Replace the source list, keeping the current source when it survives
    pub fn replace_sources(&mut self, paths: Vec<String>) {
        self.sources.replace(paths);
    }

    /// Back to healthy, e.g. after a successful rebind
    pub fn mark_healthy(&mut self) {
        self.health = Health::Healthy;
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn last_state(&self) -> Option<&DisplayState> {
        self.last.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
