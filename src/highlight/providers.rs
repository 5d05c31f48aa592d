//! Ordered fallback chains for lexers, styles and formatters
//!
//! Each category is a list of candidate providers tried in order; the
//! first one that returns a value wins. The last provider of every default
//! chain always succeeds, so selection never comes back empty.

use std::path::{Path, PathBuf};

use super::formatter::{Formatter, NoopFormatter, Terminal16Formatter, Terminal256Formatter, TrueColorFormatter};
use crate::style::{load_user_style, Style};
use crate::syntax::LanguageId;

/// A candidate that may be able to supply a value for a key
pub trait Provider<K: ?Sized> {
    type Output;

    /// Short name used in logs
    fn name(&self) -> &str;

    fn provide(&self, key: &K) -> Option<Self::Output>;
}

/// The winning value of a chain and which provider supplied it
#[derive(Debug)]
pub struct Selection<'a, T> {
    pub value: T,
    pub provider: &'a str,
    /// Position of the provider in the chain
    pub rank: usize,
}

/// Ordered list of providers for one category
pub struct FallbackChain<K: ?Sized, T> {
    providers: Vec<Box<dyn Provider<K, Output = T>>>,
}

impl<K: ?Sized, T> FallbackChain<K, T> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Append a provider (builder style)
    pub fn with(mut self, provider: impl Provider<K, Output = T> + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Try each provider in order; first success wins
    pub fn select(&self, key: &K) -> Option<Selection<'_, T>> {
        self.providers
            .iter()
            .enumerate()
            .find_map(|(rank, provider)| {
                provider.provide(key).map(|value| Selection {
                    value,
                    provider: provider.name(),
                    rank,
                })
            })
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<K: ?Sized, T> Default for FallbackChain<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

pub type LexerChain = FallbackChain<Path, LanguageId>;
pub type StyleChain = FallbackChain<str, Style>;
pub type FormatterChain = FallbackChain<str, Box<dyn Formatter>>;

// ============================================================================
// Lexers
// ============================================================================

/// Matches the file's extension against the known-language catalog
pub struct ExtensionLexers;

impl Provider<Path> for ExtensionLexers {
    type Output = LanguageId;

    fn name(&self) -> &str {
        "extension"
    }

    fn provide(&self, path: &Path) -> Option<LanguageId> {
        Some(LanguageId::from_path(path)).filter(LanguageId::has_highlighting)
    }
}

/// Generic lexer with no semantic tokenization
pub struct FallbackLexer;

impl Provider<Path> for FallbackLexer {
    type Output = LanguageId;

    fn name(&self) -> &str {
        "fallback"
    }

    fn provide(&self, _path: &Path) -> Option<LanguageId> {
        Some(LanguageId::PlainText)
    }
}

/// `[extension, fallback]`
pub fn default_lexers() -> LexerChain {
    FallbackChain::new().with(ExtensionLexers).with(FallbackLexer)
}

// ============================================================================
// Styles
// ============================================================================

/// Styles from the user's styles directory
pub struct UserStyles {
    pub dir: Option<PathBuf>,
}

impl Provider<str> for UserStyles {
    type Output = Style;

    fn name(&self) -> &str {
        "user"
    }

    fn provide(&self, id: &str) -> Option<Style> {
        match load_user_style(self.dir.as_deref()?, id)? {
            Ok(style) => Some(style),
            Err(e) => {
                tracing::warn!("Ignoring user style '{}': {}", id, e);
                None
            }
        }
    }
}

/// Styles embedded in the binary
pub struct BuiltinStyles;

impl Provider<str> for BuiltinStyles {
    type Output = Style;

    fn name(&self) -> &str {
        "builtin"
    }

    fn provide(&self, id: &str) -> Option<Style> {
        Style::from_builtin(id).ok()
    }
}

/// The default style, whatever was asked for
pub struct FallbackStyle;

impl Provider<str> for FallbackStyle {
    type Output = Style;

    fn name(&self) -> &str {
        "fallback"
    }

    fn provide(&self, _id: &str) -> Option<Style> {
        Some(Style::fallback())
    }
}

/// `[user, builtin, fallback]`
pub fn default_styles(user_dir: Option<PathBuf>) -> StyleChain {
    FallbackChain::new()
        .with(UserStyles { dir: user_dir })
        .with(BuiltinStyles)
        .with(FallbackStyle)
}

// ============================================================================
// Formatters
// ============================================================================

/// Colour formatters selected by name
pub struct TerminalFormatters;

impl Provider<str> for TerminalFormatters {
    type Output = Box<dyn Formatter>;

    fn name(&self) -> &str {
        "terminal"
    }

    fn provide(&self, name: &str) -> Option<Box<dyn Formatter>> {
        match name {
            "terminal256" | "256" => Some(Box::new(Terminal256Formatter)),
            "terminal16m" | "truecolor" => Some(Box::new(TrueColorFormatter)),
            "terminal16" | "terminal" => Some(Box::new(Terminal16Formatter)),
            _ => None,
        }
    }
}

/// Uncoloured output
pub struct FallbackFormatter;

impl Provider<str> for FallbackFormatter {
    type Output = Box<dyn Formatter>;

    fn name(&self) -> &str {
        "fallback"
    }

    fn provide(&self, _name: &str) -> Option<Box<dyn Formatter>> {
        Some(Box::new(NoopFormatter))
    }
}

/// `[terminal, fallback]`
pub fn default_formatters() -> FormatterChain {
    FallbackChain::new()
        .with(TerminalFormatters)
        .with(FallbackFormatter)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Option<u32>);

    impl Provider<str> for Fixed {
        type Output = u32;

        fn name(&self) -> &str {
            self.0
        }

        fn provide(&self, _key: &str) -> Option<u32> {
            self.1
        }
    }

    #[test]
    fn test_first_success_wins() {
        let chain = FallbackChain::new()
            .with(Fixed("none", None))
            .with(Fixed("one", Some(1)))
            .with(Fixed("two", Some(2)));

        let selected = chain.select("anything").unwrap();
        assert_eq!(selected.value, 1);
        assert_eq!(selected.provider, "one");
        assert_eq!(selected.rank, 1);
    }

    #[test]
    fn test_empty_chain_selects_nothing() {
        let chain: FallbackChain<str, u32> = FallbackChain::new();
        assert!(chain.select("x").is_none());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_provider_names_in_order() {
        assert_eq!(default_lexers().provider_names(), vec!["extension", "fallback"]);
        assert_eq!(
            default_styles(None).provider_names(),
            vec!["user", "builtin", "fallback"]
        );
        assert_eq!(
            default_formatters().provider_names(),
            vec!["terminal", "fallback"]
        );
    }

    #[test]
    fn test_lexer_known_extension() {
        let chain = default_lexers();
        let selected = chain.select(Path::new("/tmp/a.go")).unwrap();
        assert_eq!(selected.value, LanguageId::Go);
        assert_eq!(selected.provider, "extension");
    }

    #[test]
    fn test_lexer_unknown_extension_falls_back() {
        let chain = default_lexers();
        let selected = chain.select(Path::new("/tmp/b.unknownext")).unwrap();
        assert_eq!(selected.value, LanguageId::PlainText);
        assert_eq!(selected.provider, "fallback");
    }

    #[test]
    fn test_style_known_name() {
        let chain = default_styles(None);
        let selected = chain.select("github-dark").unwrap();
        assert_eq!(selected.value.name, "GitHub Dark");
        assert_eq!(selected.provider, "builtin");
    }

    #[test]
    fn test_style_unknown_name_falls_back() {
        let chain = default_styles(None);
        let selected = chain.select("unknown-style").unwrap();
        assert_eq!(selected.value.name, "Monokai");
        assert_eq!(selected.provider, "fallback");
    }

    #[test]
    fn test_user_style_wins_over_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("github-dark.yaml"),
            "version: 1\nname: \"Mine\"\n",
        )
        .unwrap();

        let chain = default_styles(Some(dir.path().to_path_buf()));
        let selected = chain.select("github-dark").unwrap();
        assert_eq!(selected.value.name, "Mine");
        assert_eq!(selected.provider, "user");
    }

    #[test]
    fn test_broken_user_style_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("monokai.yaml"), "not: [valid").unwrap();

        let chain = default_styles(Some(dir.path().to_path_buf()));
        let selected = chain.select("monokai").unwrap();
        assert_eq!(selected.provider, "builtin");
    }

    #[test]
    fn test_formatter_selection() {
        let chain = default_formatters();
        assert_eq!(chain.select("terminal256").unwrap().value.name(), "terminal256");
        assert_eq!(chain.select("terminal16m").unwrap().value.name(), "terminal16m");

        let fallback = chain.select("html").unwrap();
        assert_eq!(fallback.value.name(), "noop");
        assert_eq!(fallback.provider, "fallback");
    }
}
