//! Tree-sitter parser state and highlighting extraction
//!
//! Holds one parser and one compiled highlight query per language. Sources
//! are always parsed from scratch: a change on disk means a full re-read.

use std::collections::HashMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor, Tree};

use super::highlights::{highlight_id_for_name, HighlightToken, SyntaxHighlights};
use super::languages::LanguageId;

// Highlight queries shipped with the grammar crates
const RUST_HIGHLIGHTS: &str = tree_sitter_rust::HIGHLIGHTS_QUERY;
const GO_HIGHLIGHTS: &str = tree_sitter_go::HIGHLIGHTS_QUERY;
const PYTHON_HIGHLIGHTS: &str = tree_sitter_python::HIGHLIGHTS_QUERY;
// Some grammars use HIGHLIGHT_QUERY (singular)
const C_HIGHLIGHTS: &str = tree_sitter_c::HIGHLIGHT_QUERY;
const CPP_HIGHLIGHTS: &str = tree_sitter_cpp::HIGHLIGHT_QUERY;
const JAVA_HIGHLIGHTS: &str = tree_sitter_java::HIGHLIGHTS_QUERY;
const BASH_HIGHLIGHTS: &str = tree_sitter_bash::HIGHLIGHT_QUERY;

/// Parser state (tree-sitter parsers are !Sync, keep one per UI context)
pub struct ParserState {
    /// Parser instances per language
    parsers: HashMap<LanguageId, Parser>,
    /// Compiled queries per language
    queries: HashMap<LanguageId, Query>,
}

impl ParserState {
    /// Create a new parser state with every supported language initialized
    pub fn new() -> Self {
        let mut state = Self {
            parsers: HashMap::new(),
            queries: HashMap::new(),
        };

        for &lang in LanguageId::HIGHLIGHTED {
            state.init_language(lang);
        }

        state
    }

    /// Initialize a language's parser and query
    fn init_language(&mut self, lang: LanguageId) {
        let (ts_lang, highlights_scm): (tree_sitter::Language, &str) = match lang {
            LanguageId::Rust => (tree_sitter_rust::LANGUAGE.into(), RUST_HIGHLIGHTS),
            LanguageId::Go => (tree_sitter_go::LANGUAGE.into(), GO_HIGHLIGHTS),
            LanguageId::Python => (tree_sitter_python::LANGUAGE.into(), PYTHON_HIGHLIGHTS),
            LanguageId::C => (tree_sitter_c::LANGUAGE.into(), C_HIGHLIGHTS),
            LanguageId::Cpp => (tree_sitter_cpp::LANGUAGE.into(), CPP_HIGHLIGHTS),
            LanguageId::Java => (tree_sitter_java::LANGUAGE.into(), JAVA_HIGHLIGHTS),
            LanguageId::Bash => (tree_sitter_bash::LANGUAGE.into(), BASH_HIGHLIGHTS),
            // No highlighting for plain text
            LanguageId::PlainText => return,
        };

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&ts_lang) {
            tracing::error!("Failed to set language for {:?}: {}", lang, e);
            return;
        }
        self.parsers.insert(lang, parser);

        // Create query (may fail if query syntax is invalid)
        match Query::new(&ts_lang, highlights_scm) {
            Ok(query) => {
                self.queries.insert(lang, query);
            }
            Err(e) => {
                tracing::error!("Failed to compile query for {:?}: {:?}", lang, e);
            }
        }
    }

    /// Whether a language has both a parser and a compiled query
    pub fn supports(&self, language: LanguageId) -> bool {
        self.parsers.contains_key(&language) && self.queries.contains_key(&language)
    }

    /// Parse source and extract highlights.
    ///
    /// Plain text, or any language whose grammar failed to initialize, yields
    /// empty highlights so the text renders unstyled.
    pub fn tokenize(&mut self, source: &str, language: LanguageId) -> SyntaxHighlights {
        if language == LanguageId::PlainText {
            return SyntaxHighlights::new(language);
        }

        let Some(parser) = self.parsers.get_mut(&language) else {
            tracing::warn!("No parser for language {:?}", language);
            return SyntaxHighlights::new(language);
        };

        let Some(tree) = parser.parse(source, None) else {
            tracing::error!("Parse failed for {:?}", language);
            return SyntaxHighlights::new(language);
        };

        self.extract_highlights(source, &tree, language)
    }

    /// Extract highlight tokens from a parsed tree
    fn extract_highlights(
        &self,
        source: &str,
        tree: &Tree,
        language: LanguageId,
    ) -> SyntaxHighlights {
        let Some(query) = self.queries.get(&language) else {
            return SyntaxHighlights::new(language);
        };

        let mut highlights = SyntaxHighlights::new(language);
        let mut cursor = QueryCursor::new();
        let source_bytes = source.as_bytes();

        // Pre-split into lines for byte→char column conversion
        let lines: Vec<&str> = source.lines().collect();

        // Tree-sitter positions are in bytes, but tokens use char columns
        fn byte_to_char_col(line: &str, byte_col: usize) -> usize {
            let byte_col = byte_col.min(line.len());
            let mut valid_byte = byte_col;
            while valid_byte > 0 && !line.is_char_boundary(valid_byte) {
                valid_byte -= 1;
            }
            line[..valid_byte].chars().count()
        }

        let mut push = |row: usize, start_char: usize, end_char: usize, highlight| {
            if start_char < end_char {
                highlights
                    .lines
                    .entry(row)
                    .or_default()
                    .tokens
                    .push(HighlightToken {
                        start_col: start_char,
                        end_col: end_char,
                        highlight,
                    });
            }
        };

        let mut captures = cursor.captures(query, tree.root_node(), source_bytes);
        while let Some((query_match, capture_idx)) = captures.next() {
            let capture = &query_match.captures[*capture_idx];
            let capture_name = &query.capture_names()[capture.index as usize];

            let Some(highlight_id) = highlight_id_for_name(capture_name) else {
                continue; // Skip unknown captures
            };

            let start = capture.node.start_position();
            let end = capture.node.end_position();

            if start.row == end.row {
                let line = lines.get(start.row).copied().unwrap_or("");
                push(
                    start.row,
                    byte_to_char_col(line, start.column),
                    byte_to_char_col(line, end.column),
                    highlight_id,
                );
            } else {
                // Multi-line token: split across lines
                for row in start.row..=end.row {
                    let line = lines.get(row).copied().unwrap_or("");
                    let line_char_len = line.chars().count();

                    let (start_char, end_char) = if row == start.row {
                        (byte_to_char_col(line, start.column), line_char_len)
                    } else if row == end.row {
                        (0, byte_to_char_col(line, end.column))
                    } else {
                        (0, line_char_len)
                    };

                    push(row, start_char, end_char, highlight_id);
                }
            }
        }

        for line_highlights in highlights.lines.values_mut() {
            line_highlights
                .tokens
                .sort_by_key(|t| (t.start_col, t.end_col));
        }

        highlights
    }
}

impl Default for ParserState {
    fn default() -> Self {
        Self::new()
    }
}
