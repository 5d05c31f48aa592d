//! Renderer behaviour through the public API
//!
//! Covers the plain byte-exact path, the highlighted path with its
//! fallbacks, and the error text shown for unreadable sources.

mod common;

use common::{settings, test_renderer, Fixture};
use textpane::highlight::BodyKind;
use textpane::markup;

// ========================================================================
// Plain path
// ========================================================================

#[test]
fn test_plain_binary_round_trip() {
    let fx = Fixture::new();
    let bytes: Vec<u8> = (0..=255u8).chain([0x1b, b'[', b'0', b'm']).collect();
    let path = fx.write("blob.bin", &bytes);

    let out = test_renderer().render(&path, &settings(false, "monokai"));
    assert_eq!(out.as_bytes(), bytes.as_slice());
    assert_eq!(out.kind(), BodyKind::Plain);
}

#[test]
fn test_plain_invalid_utf8_untouched() {
    let fx = Fixture::new();
    let bytes = b"caf\xe9 \xff\xfe\r\n".to_vec();
    let path = fx.write("latin1.txt", &bytes);

    let out = test_renderer().render(&path, &settings(false, "monokai"));
    assert_eq!(out.into_bytes(), bytes);
}

#[test]
fn test_empty_file_renders_empty() {
    let fx = Fixture::new();
    let path = fx.write("empty.txt", "");
    assert!(test_renderer()
        .render(&path, &settings(false, "monokai"))
        .is_empty());
}

#[test]
fn test_empty_file_highlighted_stays_empty() {
    let fx = Fixture::new();
    let path = fx.write("empty.unknownext", "");
    let out = test_renderer().render(&path, &settings(true, "monokai"));
    assert_eq!(markup::strip(&out.to_string_lossy()), "");
}

// ========================================================================
// Errors become display text
// ========================================================================

#[test]
fn test_nonexistent_path_is_readable_text() {
    let fx = Fixture::new();
    let path = fx.source("missing.go");

    for highlight in [false, true] {
        let out = test_renderer().render(&path, &settings(highlight, "monokai"));
        let text = out.to_string_lossy();
        assert!(!text.is_empty());
        assert!(text.contains("File not found"), "got: {}", text);
        assert!(text.contains("missing.go"));
    }
}

#[test]
fn test_oversized_file_is_refused() {
    let fx = Fixture::new();
    let path = fx.path("huge.log");
    let file = std::fs::File::create(&path).unwrap();
    file.set_len(51 * 1024 * 1024).unwrap();

    let out = test_renderer().render(path.to_str().unwrap(), &settings(false, "monokai"));
    assert!(out.to_string_lossy().contains("is too large"));
}

#[test]
fn test_unsupported_home_form_is_text() {
    let out = test_renderer().render("~someone-else/notes.txt", &settings(false, "monokai"));
    assert!(!out.is_empty());
    assert_eq!(out.kind(), BodyKind::Plain);
}

// ========================================================================
// Highlighted path
// ========================================================================

#[test]
fn test_unrecognized_extension_is_not_empty() {
    let fx = Fixture::new();
    let path = fx.write("notes.unknownext", "just some words\n");

    let out = test_renderer().render(&path, &settings(true, "monokai"));
    assert!(!out.is_empty());
    assert_eq!(markup::strip(&out.to_string_lossy()), "just some words\n");
}

#[test]
fn test_unknown_style_scenario() {
    let fx = Fixture::new();
    let a = fx.write("a.go", "package main\n\nfunc main() {}\n");
    let _b = fx.write("b.txt", "plain\n");

    let out = test_renderer().render(&a, &settings(true, "unknown-style"));
    let text = out.to_string_lossy();

    assert_eq!(out.kind(), BodyKind::Markup);
    // Colourised: at least one colour tag besides the reset
    assert!(text.contains("[#"), "expected colour tags in {}", text);
    assert_eq!(markup::strip(&text), "package main\n\nfunc main() {}\n");
}

#[test]
fn test_each_formatter_keeps_text() {
    let fx = Fixture::new();
    let source = "def f(items):\n    return items[0]  # first\n";
    let path = fx.write("f.py", source);

    for formatter in ["terminal256", "terminal16m", "terminal16", "noop", "bogus"] {
        let mut s = settings(true, "github-dark");
        s.formatter_name = formatter.to_string();
        let out = test_renderer().render(&path, &s);
        assert_eq!(
            markup::strip(&out.to_string_lossy()),
            source,
            "formatter {}",
            formatter
        );
    }
}

#[test]
fn test_noop_formatter_has_no_colour() {
    let fx = Fixture::new();
    let path = fx.write("main.rs", "fn main() {}\n");
    let mut s = settings(true, "monokai");
    s.formatter_name = "noop".to_string();

    let out = test_renderer().render(&path, &s);
    assert_eq!(out.to_string_lossy(), "fn main() {}\n");
}

#[test]
fn test_basic_formatter_uses_named_colours() {
    let fx = Fixture::new();
    let path = fx.write("main.c", "int main(void) { return 0; }\n");
    let mut s = settings(true, "monokai");
    s.formatter_name = "terminal16".to_string();

    let text = test_renderer().render(&path, &s).to_string_lossy().to_string();
    assert!(!text.contains("[#"));
    assert!(text.contains(markup::RESET_TAG));
}
