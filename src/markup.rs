//! Host colour markup
//!
//! Highlighting produces ANSI SGR escape output; the host's text widget
//! understands inline tags instead. A tag has the form `[fg:bg:flags]`:
//!
//! - `fg` / `bg`: `-` (terminal default), a basic colour name such as
//!   `green` or `lightblue`, or `#rrggbb`
//! - `flags`: `-` or any of `b` (bold), `d` (dim), `i` (italic),
//!   `r` (reverse), `u` (underline)
//!
//! `[-:-:-]` resets everything. A literal `[` in text is written as `[[]`.

use std::fmt::Write as _;

use crate::style::Color;

/// Tag that resets all attributes
pub const RESET_TAG: &str = "[-:-:-]";

/// Basic colour names in ANSI order: 30-37 then 90-97
const BASIC_NAMES: [&str; 16] = [
    "black",
    "red",
    "green",
    "yellow",
    "blue",
    "magenta",
    "cyan",
    "white",
    "gray",
    "lightred",
    "lightgreen",
    "lightyellow",
    "lightblue",
    "lightmagenta",
    "lightcyan",
    "brightwhite",
];

/// A colour as expressed in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkupColor {
    #[default]
    Default,
    /// Index into the 16 basic colours
    Basic(u8),
    Rgb(Color),
}

impl MarkupColor {
    /// Map an xterm-256 palette index to a markup colour
    pub fn from_palette(n: u8) -> Self {
        const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
        match n {
            0..=15 => MarkupColor::Basic(n),
            16..=231 => {
                let i = n - 16;
                MarkupColor::Rgb(Color::rgb(
                    LEVELS[(i / 36) as usize],
                    LEVELS[((i / 6) % 6) as usize],
                    LEVELS[(i % 6) as usize],
                ))
            }
            _ => {
                let level = 8 + (n - 232) * 10;
                MarkupColor::Rgb(Color::rgb(level, level, level))
            }
        }
    }

    fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || s == "-" {
            return Some(MarkupColor::Default);
        }
        if s.starts_with('#') {
            return Color::from_hex(s).ok().map(MarkupColor::Rgb);
        }
        BASIC_NAMES
            .iter()
            .position(|&name| name == s)
            .map(|i| MarkupColor::Basic(i as u8))
    }

    fn write_tag_part(&self, out: &mut String) {
        match self {
            MarkupColor::Default => out.push('-'),
            MarkupColor::Basic(i) => out.push_str(BASIC_NAMES[*i as usize % 16]),
            MarkupColor::Rgb(c) => out.push_str(&c.to_hex()),
        }
    }

    /// SGR parameters selecting this colour (`base` is 30 for fg, 40 for bg)
    fn write_sgr(&self, base: u8, out: &mut String) {
        match self {
            MarkupColor::Default => {
                let _ = write!(out, ";{}", base + 9);
            }
            MarkupColor::Basic(i) if *i < 8 => {
                let _ = write!(out, ";{}", base + i);
            }
            MarkupColor::Basic(i) => {
                let _ = write!(out, ";{}", base + 60 + (i - 8));
            }
            MarkupColor::Rgb(c) => {
                let _ = write!(out, ";{};2;{};{};{}", base + 8, c.r, c.g, c.b);
            }
        }
    }
}

/// Current colour and attribute state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkupStyle {
    pub fg: MarkupColor,
    pub bg: MarkupColor,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub reverse: bool,
    pub underline: bool,
}

impl MarkupStyle {
    /// Render as a `[fg:bg:flags]` tag
    pub fn tag(&self) -> String {
        let mut out = String::from("[");
        self.fg.write_tag_part(&mut out);
        out.push(':');
        self.bg.write_tag_part(&mut out);
        out.push(':');
        let flags: String = [
            (self.bold, 'b'),
            (self.dim, 'd'),
            (self.italic, 'i'),
            (self.reverse, 'r'),
            (self.underline, 'u'),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, c)| *c)
        .collect();
        if flags.is_empty() {
            out.push('-');
        } else {
            out.push_str(&flags);
        }
        out.push(']');
        out
    }

    /// Parse the inside of a tag (`fg:bg:flags`)
    fn parse_tag(content: &str) -> Option<Self> {
        let mut parts = content.split(':');
        let fg = MarkupColor::parse(parts.next()?)?;
        let bg = MarkupColor::parse(parts.next()?)?;
        let flags = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        let mut style = MarkupStyle {
            fg,
            bg,
            ..MarkupStyle::default()
        };
        if flags != "-" {
            for flag in flags.chars() {
                match flag {
                    'b' => style.bold = true,
                    'd' => style.dim = true,
                    'i' => style.italic = true,
                    'r' => style.reverse = true,
                    'u' => style.underline = true,
                    _ => return None,
                }
            }
        }
        Some(style)
    }

    /// Apply a `;`-separated list of SGR parameters
    pub fn apply_sgr(mut self, codes: &str) -> Self {
        let parts: Vec<&str> = codes.split(';').collect();
        let mut i = 0;

        while i < parts.len() {
            // An empty parameter (as in "\x1b[m") means reset
            let code = if parts[i].is_empty() {
                Ok(0)
            } else {
                parts[i].parse::<u8>()
            };
            match code {
                Ok(0) => self = MarkupStyle::default(),
                Ok(1) => self.bold = true,
                Ok(2) => self.dim = true,
                Ok(3) => self.italic = true,
                Ok(4) => self.underline = true,
                Ok(7) => self.reverse = true,
                Ok(22) => {
                    self.bold = false;
                    self.dim = false;
                }
                Ok(23) => self.italic = false,
                Ok(24) => self.underline = false,
                Ok(27) => self.reverse = false,
                Ok(n @ 30..=37) => self.fg = MarkupColor::Basic(n - 30),
                Ok(39) => self.fg = MarkupColor::Default,
                Ok(n @ 40..=47) => self.bg = MarkupColor::Basic(n - 40),
                Ok(49) => self.bg = MarkupColor::Default,
                Ok(n @ 90..=97) => self.fg = MarkupColor::Basic(n - 90 + 8),
                Ok(n @ 100..=107) => self.bg = MarkupColor::Basic(n - 100 + 8),
                // 256-color mode (38;5;N or 48;5;N)
                Ok(n @ (38 | 48)) if i + 2 < parts.len() && parts[i + 1] == "5" => {
                    if let Ok(idx) = parts[i + 2].parse::<u8>() {
                        self.set_color(n, MarkupColor::from_palette(idx));
                    }
                    i += 2;
                }
                // True color mode (38;2;R;G;B or 48;2;R;G;B)
                Ok(n @ (38 | 48)) if i + 4 < parts.len() && parts[i + 1] == "2" => {
                    if let (Ok(r), Ok(g), Ok(b)) = (
                        parts[i + 2].parse::<u8>(),
                        parts[i + 3].parse::<u8>(),
                        parts[i + 4].parse::<u8>(),
                    ) {
                        self.set_color(n, MarkupColor::Rgb(Color::rgb(r, g, b)));
                    }
                    i += 4;
                }
                _ => {}
            }
            i += 1;
        }

        self
    }

    fn set_color(&mut self, selector: u8, color: MarkupColor) {
        if selector == 38 {
            self.fg = color;
        } else {
            self.bg = color;
        }
    }

    /// SGR escape sequence that establishes this style from any prior state
    pub fn to_sgr(&self) -> String {
        let mut out = String::from("\x1b[0");
        if *self == MarkupStyle::default() {
            out.push('m');
            return out;
        }
        for (on, code) in [
            (self.bold, 1),
            (self.dim, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.reverse, 7),
        ] {
            if on {
                let _ = write!(out, ";{}", code);
            }
        }
        if self.fg != MarkupColor::Default {
            self.fg.write_sgr(30, &mut out);
        }
        if self.bg != MarkupColor::Default {
            self.bg.write_sgr(40, &mut out);
        }
        out.push('m');
        out
    }
}

/// Escape text so the host shows it literally
pub fn escape(text: &str) -> String {
    text.replace('[', "[[]")
}

/// Translate ANSI SGR output into host markup
///
/// Non-SGR escape sequences are dropped. Tags are only emitted when the
/// style actually changes before more text is written.
pub fn translate_ansi(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut emitted = MarkupStyle::default();
    let mut pending = MarkupStyle::default();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            if chars.peek() != Some(&'[') {
                continue;
            }
            chars.next();

            let mut params = String::new();
            let mut terminator = None;
            for c in chars.by_ref() {
                if c.is_ascii_digit() || c == ';' {
                    params.push(c);
                } else {
                    terminator = Some(c);
                    break;
                }
            }

            if terminator == Some('m') {
                pending = pending.apply_sgr(&params);
            }
            continue;
        }

        if pending != emitted {
            out.push_str(&pending.tag());
            emitted = pending;
        }

        if ch == '[' {
            out.push_str("[[]");
        } else {
            out.push(ch);
        }
    }

    if emitted != MarkupStyle::default() {
        out.push_str(RESET_TAG);
    }

    out
}

/// A piece of parsed markup
enum Piece<'a> {
    Tag(MarkupStyle),
    Text(&'a str),
}

/// Walk markup, calling `visit` for each style tag and run of text
fn walk_markup<'a>(markup: &'a str, mut visit: impl FnMut(Piece<'a>)) {
    let mut rest = markup;

    while let Some(open) = rest.find('[') {
        visit(Piece::Text(&rest[..open]));
        let after = &rest[open + 1..];

        if let Some(stripped) = after.strip_prefix("[]") {
            visit(Piece::Text("["));
            rest = stripped;
            continue;
        }

        match after
            .find(']')
            .and_then(|close| MarkupStyle::parse_tag(&after[..close]).map(|s| (close, s)))
        {
            Some((close, style)) => {
                visit(Piece::Tag(style));
                rest = &after[close + 1..];
            }
            None => {
                visit(Piece::Text("["));
                rest = after;
            }
        }
    }

    visit(Piece::Text(rest));
}

/// Convert host markup back into ANSI escape output
pub fn to_ansi(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut current = MarkupStyle::default();
    let mut pending: Option<MarkupStyle> = None;

    walk_markup(markup, |piece| match piece {
        Piece::Tag(style) => pending = Some(style),
        Piece::Text("") => {}
        Piece::Text(text) => {
            if let Some(style) = pending.take() {
                if style != current {
                    out.push_str(&style.to_sgr());
                    current = style;
                }
            }
            out.push_str(text);
        }
    });

    if current != MarkupStyle::default() {
        out.push_str("\x1b[0m");
    }
    out
}

/// Remove all tags, leaving the plain text
pub fn strip(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    walk_markup(markup, |piece| {
        if let Piece::Text(text) = piece {
            out.push_str(text);
        }
    });
    out
}
