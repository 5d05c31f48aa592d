//! The host's paint primitive and what gets painted

use crate::highlight::{BodyKind, RenderedText};

/// One full frame of panel content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    /// Title in host markup
    pub title: String,
    /// Position indicator line, empty for a single source
    pub indicator: String,
    pub body: RenderedText,
}

impl DisplayState {
    /// Indicator followed by the body, as the host's text area shows it
    pub fn content_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.indicator.len() + self.body.as_bytes().len());
        bytes.extend_from_slice(self.indicator.as_bytes());
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }

    pub fn body_kind(&self) -> BodyKind {
        self.body.kind()
    }
}

/// The dashboard that owns the text area a panel draws into
///
/// The host handles scrolling, wrapping and focus.
pub trait Host {
    /// Columns available to the panel
    fn width(&self) -> usize {
        80
    }

    /// Replace the panel's title and content
    fn paint(&mut self, state: &DisplayState);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn paint(&mut self, state: &DisplayState) {
        (**self).paint(state)
    }
}

/// Host that keeps every painted frame
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub width: usize,
    pub frames: Vec<DisplayState>,
}

impl RecordingHost {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            frames: Vec::new(),
        }
    }

    pub fn last(&self) -> Option<&DisplayState> {
        self.frames.last()
    }
}

impl Host for RecordingHost {
    fn width(&self) -> usize {
        self.width
    }

    fn paint(&mut self, state: &DisplayState) {
        self.frames.push(state.clone());
    }
}
