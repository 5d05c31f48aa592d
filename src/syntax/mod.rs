//! Syntax highlighting module
//!
//! Provides tree-sitter based tokenization with:
//! - Language detection from file extensions
//! - Highlight extraction into per-line tokens
//!
//! Unknown extensions map to [`LanguageId::PlainText`], which tokenizes to
//! nothing and leaves the text untouched.

mod highlights;
mod languages;
mod parser;

pub use highlights::{
    highlight_id_for_name, HighlightId, HighlightToken, LineHighlights,
    SyntaxHighlights, HIGHLIGHT_NAMES,
};
pub use languages::LanguageId;
pub use parser::ParserState;
