//! File to displayable text
//!
//! Rendering never fails: any problem reading the file becomes the text
//! that gets displayed.

use std::borrow::Cow;
use std::path::Path;

use super::formatter::{detect_formatter, NoopFormatter};
use super::providers::{
    default_formatters, default_lexers, default_styles, FormatterChain, LexerChain, StyleChain,
};
use crate::markup;
use crate::style::{Style, FALLBACK_STYLE_ID};
use crate::syntax::ParserState;
use crate::util::{expand_home, is_likely_binary, read_source};

/// How the renderer should present file content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    pub highlight_enabled: bool,
    pub style_name: String,
    pub formatter_name: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            highlight_enabled: false,
            style_name: FALLBACK_STYLE_ID.to_string(),
            formatter_name: detect_formatter().to_string(),
        }
    }
}

/// Whether the host should interpret markup tags in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Raw file bytes or an error message
    Plain,
    /// Host markup produced by the highlighter
    Markup,
}

/// Output of one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    bytes: Vec<u8>,
    kind: BodyKind,
}

impl RenderedText {
    pub fn plain(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            kind: BodyKind::Plain,
        }
    }

    pub fn markup(text: String) -> Self {
        Self {
            bytes: text.into_bytes(),
            kind: BodyKind::Markup,
        }
    }

    /// Error text shown in place of content
    pub fn message(text: impl Into<String>) -> Self {
        Self::plain(text.into().into_bytes())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Turns a path into displayable text, plain or highlighted
pub struct Renderer {
    parser: ParserState,
    lexers: LexerChain,
    styles: StyleChain,
    formatters: FormatterChain,
    /// Last resolved style, keyed by requested name
    style_cache: Option<(String, Style)>,
}

impl Renderer {
    /// Default chains, with user styles from the config directory
    pub fn new() -> Self {
        Self::with_chains(
            default_lexers(),
            default_styles(crate::config_paths::styles_dir()),
            default_formatters(),
        )
    }

    pub fn with_chains(lexers: LexerChain, styles: StyleChain, formatters: FormatterChain) -> Self {
        Self {
            parser: ParserState::new(),
            lexers,
            styles,
            formatters,
            style_cache: None,
        }
    }

    /// Read `path` and render it according to `settings`
    pub fn render(&mut self, path: &str, settings: &RenderSettings) -> RenderedText {
        let resolved = match expand_home(path) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("{}", e);
                return RenderedText::message(e.to_string());
            }
        };

        let bytes = match read_source(&resolved) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", resolved.display(), e);
                return RenderedText::message(e.user_message(path));
            }
        };

        if !settings.highlight_enabled {
            return RenderedText::plain(bytes);
        }
        if is_likely_binary(&bytes) {
            tracing::debug!("{} looks binary, skipping highlighting", resolved.display());
            return RenderedText::plain(bytes);
        }

        let source = String::from_utf8_lossy(&bytes);
        RenderedText::markup(self.highlight(&resolved, &source, settings))
    }

    /// Highlight already-loaded text, returning host markup
    pub fn highlight(&mut self, path: &Path, source: &str, settings: &RenderSettings) -> String {
        let language = match self.lexers.select(path) {
            Some(selected) => {
                tracing::trace!(
                    "Lexer {} from '{}' provider",
                    selected.value.display_name(),
                    selected.provider
                );
                selected.value
            }
            None => Default::default(),
        };
        let highlights = self.parser.tokenize(source, language);
        tracing::trace!("{} highlight tokens", highlights.token_count());

        let formatter = match self.formatters.select(&settings.formatter_name) {
            Some(selected) => {
                if selected.rank > 0 {
                    tracing::debug!(
                        "Formatter '{}' unavailable, using '{}'",
                        settings.formatter_name,
                        selected.value.name()
                    );
                }
                selected.value
            }
            None => Box::new(NoopFormatter),
        };

        let style = self.resolve_style(&settings.style_name);

        let mut ansi = String::with_capacity(source.len() * 2);
        formatter.format(source, &highlights, style, &mut ansi);
        markup::translate_ansi(&ansi)
    }

    fn resolve_style(&mut self, name: &str) -> &Style {
        let cached = matches!(&self.style_cache, Some((cached_name, _)) if cached_name == name);
        if !cached {
            let style = match self.styles.select(name) {
                Some(selected) => {
                    if selected.rank > 0 && selected.provider == "fallback" {
                        tracing::warn!("Style '{}' not found, using '{}'", name, selected.value.name);
                    }
                    selected.value
                }
                None => Style::fallback(),
            };
            self.style_cache = Some((name.to_string(), style));
        }

        let (_, style) = self
            .style_cache
            .get_or_insert_with(|| (name.to_string(), Style::fallback()));
        style
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
