//! ANSI formatters for tokenized text
//!
//! A formatter walks the source line by line, splits each line into runs
//! sharing one highlight, and wraps styled runs in SGR sequences. The
//! output is terminal text; the renderer translates it to host markup.

use crate::style::{Color, Style, TokenStyle};
use crate::syntax::SyntaxHighlights;

const SGR_RESET: &str = "\x1b[0m";

/// Emits `source` with the colours of `style` applied to `highlights`
pub trait Formatter {
    fn name(&self) -> &'static str;

    fn format(&self, source: &str, highlights: &SyntaxHighlights, style: &Style, out: &mut String);
}

/// Colour depth the terminal claims to support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    None,
    Basic,
    Indexed256,
    TrueColor,
}

impl ColorSupport {
    /// Read `COLORTERM` and `TERM` from the environment
    pub fn detect() -> Self {
        Self::from_env_values(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    pub fn from_env_values(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return ColorSupport::TrueColor;
        }
        match term {
            Some("dumb") => ColorSupport::None,
            Some(t) if t.contains("256color") => ColorSupport::Indexed256,
            Some(t) if t.contains("truecolor") || t.contains("direct") => ColorSupport::TrueColor,
            Some("linux") | Some("vt100") | Some("ansi") => ColorSupport::Basic,
            // Unknown terminals get 256 colours; nearly everything supports them
            _ => ColorSupport::Indexed256,
        }
    }

    /// Formatter name for this colour depth
    pub fn formatter_name(self) -> &'static str {
        match self {
            ColorSupport::None => "noop",
            ColorSupport::Basic => "terminal16",
            ColorSupport::Indexed256 => "terminal256",
            ColorSupport::TrueColor => "terminal16m",
        }
    }
}

/// Formatter name matching the current terminal
pub fn detect_formatter() -> &'static str {
    ColorSupport::detect().formatter_name()
}

/// Shared line/segment walk; `sgr` writes the parameter list for a style
fn format_styled(
    source: &str,
    highlights: &SyntaxHighlights,
    style: &Style,
    out: &mut String,
    sgr: impl Fn(&TokenStyle, &mut String),
) {
    let base = style.base();
    out.reserve(source.len());

    for (line_idx, raw_line) in source.split('\n').enumerate() {
        if line_idx > 0 {
            out.push('\n');
        }
        let (line, cr) = match raw_line.strip_suffix('\r') {
            Some(stripped) => (stripped, "\r"),
            None => (raw_line, ""),
        };
        if line.is_empty() {
            out.push_str(cr);
            continue;
        }

        let chars: Vec<char> = line.chars().collect();
        let segments = match highlights.get_line(line_idx) {
            Some(line_hl) => line_hl.segments(chars.len()),
            None => vec![(0..chars.len(), None)],
        };

        for (range, highlight) in segments {
            let token_style = match highlight {
                Some(id) => merge(base, style.token_style(id)),
                None => base,
            };
            let text: String = chars[range].iter().collect();
            if token_style.is_plain() {
                out.push_str(&text);
            } else {
                out.push_str("\x1b[");
                sgr(&token_style, out);
                out.push('m');
                out.push_str(&text);
                out.push_str(SGR_RESET);
            }
        }
        out.push_str(cr);
    }
}

/// Token colours over the base foreground
fn merge(base: TokenStyle, token: TokenStyle) -> TokenStyle {
    TokenStyle {
        fg: token.fg.or(base.fg),
        ..token
    }
}

/// Attribute codes followed by whatever `color` writes
fn write_params(style: &TokenStyle, out: &mut String, color: impl Fn(Color, bool, &mut String)) {
    let mut params: Vec<String> = Vec::new();
    if style.bold {
        params.push("1".to_string());
    }
    if style.italic {
        params.push("3".to_string());
    }
    if style.underline {
        params.push("4".to_string());
    }
    if let Some(fg) = style.fg {
        let mut s = String::new();
        color(fg, false, &mut s);
        params.push(s);
    }
    if let Some(bg) = style.bg {
        let mut s = String::new();
        color(bg, true, &mut s);
        params.push(s);
    }
    out.push_str(&params.join(";"));
}

/// `38;2;r;g;b`
pub struct TrueColorFormatter;

impl Formatter for TrueColorFormatter {
    fn name(&self) -> &'static str {
        "terminal16m"
    }

    fn format(&self, source: &str, highlights: &SyntaxHighlights, style: &Style, out: &mut String) {
        format_styled(source, highlights, style, out, |token, out| {
            write_params(token, out, |c, bg, s| {
                s.push_str(&format!("{};2;{};{};{}", if bg { 48 } else { 38 }, c.r, c.g, c.b));
            })
        });
    }
}

/// `38;5;n` with the nearest xterm palette entry
pub struct Terminal256Formatter;

impl Formatter for Terminal256Formatter {
    fn name(&self) -> &'static str {
        "terminal256"
    }

    fn format(&self, source: &str, highlights: &SyntaxHighlights, style: &Style, out: &mut String) {
        format_styled(source, highlights, style, out, |token, out| {
            write_params(token, out, |c, bg, s| {
                s.push_str(&format!("{};5;{}", if bg { 48 } else { 38 }, nearest_256(c)));
            })
        });
    }
}

/// `30-37`/`90-97` with the nearest basic colour
pub struct Terminal16Formatter;

impl Formatter for Terminal16Formatter {
    fn name(&self) -> &'static str {
        "terminal16"
    }

    fn format(&self, source: &str, highlights: &SyntaxHighlights, style: &Style, out: &mut String) {
        format_styled(source, highlights, style, out, |token, out| {
            write_params(token, out, |c, bg, s| {
                let n = nearest_16(c);
                let code = match (n < 8, bg) {
                    (true, false) => 30 + n,
                    (false, false) => 90 + n - 8,
                    (true, true) => 40 + n,
                    (false, true) => 100 + n - 8,
                };
                s.push_str(&code.to_string());
            })
        });
    }
}

/// Writes the source untouched
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn format(&self, source: &str, _highlights: &SyntaxHighlights, _style: &Style, out: &mut String) {
        out.push_str(source);
    }
}

// ============================================================================
// Palette matching
// ============================================================================

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

const BASIC_PALETTE: [Color; 16] = [
    Color::rgb(0, 0, 0),
    Color::rgb(205, 0, 0),
    Color::rgb(0, 205, 0),
    Color::rgb(205, 205, 0),
    Color::rgb(0, 0, 238),
    Color::rgb(205, 0, 205),
    Color::rgb(0, 205, 205),
    Color::rgb(229, 229, 229),
    Color::rgb(127, 127, 127),
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(92, 92, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(0, 255, 255),
    Color::rgb(255, 255, 255),
];

fn distance(a: Color, b: Color) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).unsigned_abs();
    let (dr, dg, db) = (d(a.r, b.r), d(a.g, b.g), d(a.b, b.b));
    dr * dr + dg * dg + db * db
}

fn nearest_level(v: u8) -> usize {
    CUBE_LEVELS
        .iter()
        .enumerate()
        .min_by_key(|(_, &level)| (level as i32 - v as i32).unsigned_abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Nearest entry of the xterm 256-colour palette (cube or grayscale ramp)
pub fn nearest_256(c: Color) -> u8 {
    let (ri, gi, bi) = (nearest_level(c.r), nearest_level(c.g), nearest_level(c.b));
    let cube = Color::rgb(CUBE_LEVELS[ri], CUBE_LEVELS[gi], CUBE_LEVELS[bi]);
    let cube_index = (16 + 36 * ri + 6 * gi + bi) as u8;

    let avg = (c.r as u32 + c.g as u32 + c.b as u32) / 3;
    let gray_step = (avg.saturating_sub(8) / 10).min(23) as u8;
    let gray_value = 8 + gray_step * 10;
    let gray = Color::rgb(gray_value, gray_value, gray_value);

    if distance(c, gray) < distance(c, cube) {
        232 + gray_step
    } else {
        cube_index
    }
}

/// Nearest of the 16 basic terminal colours
pub fn nearest_16(c: Color) -> u8 {
    BASIC_PALETTE
        .iter()
        .enumerate()
        .min_by_key(|(_, &p)| distance(c, p))
        .map(|(i, _)| i as u8)
        .unwrap_or(7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LanguageId, ParserState};

    fn highlighted(source: &str, language: LanguageId) -> SyntaxHighlights {
        ParserState::new().tokenize(source, language)
    }

    #[test]
    fn test_detect_from_env_values() {
        assert_eq!(
            ColorSupport::from_env_values(Some("truecolor"), Some("xterm")),
            ColorSupport::TrueColor
        );
        assert_eq!(
            ColorSupport::from_env_values(None, Some("xterm-256color")),
            ColorSupport::Indexed256
        );
        assert_eq!(
            ColorSupport::from_env_values(None, Some("dumb")),
            ColorSupport::None
        );
        assert_eq!(
            ColorSupport::from_env_values(None, Some("linux")),
            ColorSupport::Basic
        );
        assert_eq!(ColorSupport::from_env_values(None, None), ColorSupport::Indexed256);
    }

    #[test]
    fn test_formatter_names() {
        assert_eq!(ColorSupport::TrueColor.formatter_name(), "terminal16m");
        assert_eq!(ColorSupport::None.formatter_name(), "noop");
    }

    #[test]
    fn test_nearest_256_exact_cube_and_gray() {
        assert_eq!(nearest_256(Color::rgb(255, 0, 0)), 196);
        assert_eq!(nearest_256(Color::rgb(0, 0, 0)), 16);
        assert_eq!(nearest_256(Color::rgb(128, 128, 128)), 244);
    }

    #[test]
    fn test_nearest_16() {
        assert_eq!(nearest_16(Color::rgb(250, 10, 10)), 9);
        assert_eq!(nearest_16(Color::rgb(0, 0, 0)), 0);
    }

    #[test]
    fn test_noop_is_identity() {
        let source = "fn main() {}\r\n\tlet x = 1;\n";
        let mut out = String::new();
        NoopFormatter.format(
            source,
            &highlighted(source, LanguageId::Rust),
            &Style::fallback(),
            &mut out,
        );
        assert_eq!(out, source);
    }

    #[test]
    fn test_keyword_is_coloured() {
        let source = "package main\n";
        let mut out = String::new();
        TrueColorFormatter.format(
            source,
            &highlighted(source, LanguageId::Go),
            &Style::fallback(),
            &mut out,
        );
        assert!(out.contains("\x1b["));
        assert!(out.contains("package"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_text_survives_formatting() {
        let source = "def f(x):\r\n    return x  # done\n\n";
        let mut out = String::new();
        Terminal256Formatter.format(
            source,
            &highlighted(source, LanguageId::Python),
            &Style::fallback(),
            &mut out,
        );
        assert_eq!(crate::markup::strip(&crate::markup::translate_ansi(&out)), source);
    }

    #[test]
    fn test_plain_style_emits_no_escapes() {
        let style = Style::from_yaml("version: 1\nname: Bare\n").unwrap();
        let source = "int main(void) { return 0; }";
        let mut out = String::new();
        Terminal16Formatter.format(
            source,
            &highlighted(source, LanguageId::C),
            &style,
            &mut out,
        );
        assert_eq!(out, source);
    }
}
