//! Benchmarks for the render pipeline
//!
//! Run with: cargo bench --bench render

use std::path::Path;

use textpane::highlight::{default_formatters, default_lexers, default_styles};
use textpane::markup;
use textpane::{RenderSettings, Renderer};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

const RUST_CHUNK: &str = r#"
/// Ring buffer of recent samples
pub struct Window<T> {
    items: Vec<T>,
    head: usize,
}

impl<T: Copy + Default> Window<T> {
    pub fn push(&mut self, value: T) -> Option<T> {
        let old = std::mem::replace(&mut self.items[self.head], value);
        self.head = (self.head + 1) % self.items.len();
        if self.head == 0 { Some(old) } else { None }
    }
}
"#;

const GO_CHUNK: &str = r#"
// Poll reports whether the file changed since the last call.
func (w *Watcher) Poll(path string) (bool, error) {
	info, err := os.Stat(path)
	if err != nil {
		return false, err
	}
	changed := info.ModTime() != w.last[path]
	w.last[path] = info.ModTime()
	return changed, nil
}
"#;

const PYTHON_CHUNK: &str = r#"
def tail(path, lines=10):
    """Return the last lines of a file."""
    with open(path) as f:
        return f.readlines()[-lines:]  # naive
"#;

fn source(chunk: &str, repeats: usize) -> String {
    chunk.repeat(repeats)
}

fn renderer() -> Renderer {
    Renderer::with_chains(default_lexers(), default_styles(None), default_formatters())
}

fn settings(formatter: &str) -> RenderSettings {
    RenderSettings {
        highlight_enabled: true,
        style_name: "monokai".to_string(),
        formatter_name: formatter.to_string(),
    }
}

// ============================================================================
// Highlight (tokenize + format + translate)
// ============================================================================

#[divan::bench(args = [10, 100, 1000])]
fn highlight_rust(bencher: divan::Bencher, repeats: usize) {
    let text = source(RUST_CHUNK, repeats);
    let mut r = renderer();
    let s = settings("terminal256");
    bencher.bench_local(|| r.highlight(Path::new("bench.rs"), divan::black_box(&text), &s));
}

#[divan::bench(args = [10, 100, 1000])]
fn highlight_go(bencher: divan::Bencher, repeats: usize) {
    let text = source(GO_CHUNK, repeats);
    let mut r = renderer();
    let s = settings("terminal16m");
    bencher.bench_local(|| r.highlight(Path::new("bench.go"), divan::black_box(&text), &s));
}

#[divan::bench(args = [10, 100, 1000])]
fn highlight_python(bencher: divan::Bencher, repeats: usize) {
    let text = source(PYTHON_CHUNK, repeats);
    let mut r = renderer();
    let s = settings("terminal16");
    bencher.bench_local(|| r.highlight(Path::new("bench.py"), divan::black_box(&text), &s));
}

#[divan::bench(args = [100, 1000])]
fn highlight_plain_text(bencher: divan::Bencher, repeats: usize) {
    let text = source("just a line of [log] output\n", repeats);
    let mut r = renderer();
    let s = settings("terminal256");
    bencher.bench_local(|| r.highlight(Path::new("bench.log"), divan::black_box(&text), &s));
}

// ============================================================================
// Markup translation alone
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn translate_ansi(bencher: divan::Bencher, repeats: usize) {
    let ansi = "\x1b[38;5;197mfn\x1b[0m \x1b[1;38;2;166;226;46mmain\x1b[0m() {}\n".repeat(repeats);
    bencher.bench(|| markup::translate_ansi(divan::black_box(&ansi)));
}

#[divan::bench(args = [100, 1000])]
fn markup_to_ansi(bencher: divan::Bencher, repeats: usize) {
    let tagged = "[#f92672:-:-]fn[-:-:-] [#a6e22e:-:b]main[-:-:-]() [[]0]\n".repeat(repeats);
    bencher.bench(|| markup::to_ansi(divan::black_box(&tagged)));
}
