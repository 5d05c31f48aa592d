//! Rendering pipeline: lexer, style and formatter selection, then
//! translation of the formatter's ANSI output into host markup

pub mod formatter;
pub mod providers;
mod renderer;

pub use formatter::{detect_formatter, ColorSupport, Formatter};
pub use providers::{
    default_formatters, default_lexers, default_styles, FallbackChain, Provider, Selection,
};
pub use renderer::{BodyKind, RenderSettings, RenderedText, Renderer};
