//! Language identification and detection
//!
//! Maps file extensions to language IDs and provides language metadata.

use std::path::Path;

/// Supported language identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LanguageId {
    #[default]
    PlainText,
    Rust,
    Go,
    Python,
    C,
    Cpp,
    Java,
    Bash,
}

impl LanguageId {
    /// Every language with a tree-sitter grammar
    pub const HIGHLIGHTED: &'static [LanguageId] = &[
        LanguageId::Rust,
        LanguageId::Go,
        LanguageId::Python,
        LanguageId::C,
        LanguageId::Cpp,
        LanguageId::Java,
        LanguageId::Bash,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => LanguageId::Rust,
            "go" => LanguageId::Go,
            "py" | "pyi" | "pyw" => LanguageId::Python,
            "c" | "h" => LanguageId::C,
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => LanguageId::Cpp,
            "java" => LanguageId::Java,
            "sh" | "bash" | "zsh" => LanguageId::Bash,
            _ => LanguageId::PlainText,
        }
    }

    /// Detect language from file path
    ///
    /// Falls back to well-known dotfile names when there is no extension.
    pub fn from_path(path: &Path) -> Self {
        if let Some(lang) = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
        {
            return lang;
        }

        match path.file_name().and_then(|name| name.to_str()) {
            Some(".bashrc" | ".bash_profile" | ".profile" | ".zshrc") => LanguageId::Bash,
            _ => LanguageId::PlainText,
        }
    }

    /// Get display name for the language
    pub fn display_name(&self) -> &'static str {
        match self {
            LanguageId::PlainText => "Plain Text",
            LanguageId::Rust => "Rust",
            LanguageId::Go => "Go",
            LanguageId::Python => "Python",
            LanguageId::C => "C",
            LanguageId::Cpp => "C++",
            LanguageId::Java => "Java",
            LanguageId::Bash => "Bash",
        }
    }

    /// Check if this language has syntax highlighting support
    pub fn has_highlighting(&self) -> bool {
        !matches!(self, LanguageId::PlainText)
    }
}
