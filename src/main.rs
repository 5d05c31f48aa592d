//! textpane - live view of text files in the terminal
//!
//! Stands in for a dashboard host: paints the panel to stdout and reads
//! `n`, `p`, `r` and `q` lines from stdin.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::SyncSender;
use std::thread;

use textpane::cli::CliArgs;
use textpane::config::PanelConfig;
use textpane::config_paths;
use textpane::highlight::BodyKind;
use textpane::markup;
use textpane::messages::Msg;
use textpane::panel::{DisplayState, Host};
use textpane::runtime::PanelRuntime;
use textpane::style::list_available_styles;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Terminal standing in for the dashboard's text view
struct ConsoleHost {
    width: usize,
}

impl ConsoleHost {
    fn new() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.parse().ok())
            .unwrap_or(80);
        Self { width }
    }
}

fn write_frame(out: &mut impl Write, state: &DisplayState) -> io::Result<()> {
    out.write_all(CLEAR_SCREEN.as_bytes())?;
    writeln!(out, "{}", markup::to_ansi(&state.title))?;
    out.write_all(state.indicator.as_bytes())?;
    match state.body_kind() {
        BodyKind::Markup => out.write_all(markup::to_ansi(&state.body.to_string_lossy()).as_bytes())?,
        BodyKind::Plain => out.write_all(state.body.as_bytes())?,
    }
    out.flush()
}

impl Host for ConsoleHost {
    fn width(&self) -> usize {
        self.width
    }

    fn paint(&mut self, state: &DisplayState) {
        let stdout = io::stdout();
        if let Err(e) = write_frame(&mut stdout.lock(), state) {
            tracing::warn!("Failed to paint frame: {}", e);
        }
    }
}

/// Forward stdin commands into the panel's message queue
fn spawn_keyboard(tx: SyncSender<Msg>) -> Result<()> {
    thread::Builder::new()
        .name("textpane-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let msg = match line.trim() {
                    "n" => Msg::NextSource,
                    "p" => Msg::PreviousSource,
                    "r" => Msg::Refresh,
                    "q" => Msg::Quit,
                    _ => continue,
                };
                let quit = msg == Msg::Quit;
                if tx.send(msg).is_err() || quit {
                    return;
                }
            }
            let _ = tx.send(Msg::Quit);
        })
        .context("failed to spawn input thread")?;
    Ok(())
}

fn main() -> Result<()> {
    textpane::tracing::init();

    let args = CliArgs::parse();

    if args.list_styles {
        let styles_dir = config_paths::styles_dir();
        for style in list_available_styles(styles_dir.as_deref()) {
            println!("{:<20} {:<20} {:?}", style.id, style.name, style.source);
        }
        return Ok(());
    }

    let mut config = PanelConfig::load();
    args.apply_to(&mut config);

    if config.sources().is_empty() {
        anyhow::bail!(
            "no files to display: pass PATHS or set file_path in {}",
            config_paths::config_file()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "the config file".to_string())
        );
    }

    let mut runtime = PanelRuntime::from_config(&config, ConsoleHost::new());
    spawn_keyboard(runtime.sender())?;

    if let Err(e) = runtime.start() {
        tracing::warn!("Continuing without live updates: {}", e);
    }
    runtime.run();

    Ok(())
}
