//! A terminal table viewer with a click-away column-visibility panel.
//!
//! Run with a CSV path to view that file, or with no arguments for a small
//! built-in dataset.  Press `c` (or click "Columns") to choose which columns
//! are shown.

mod app;
mod config;
mod core;
mod error;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::AppState,
};
use crate::core::{
    columns::{VisibilitySetter, VisibilityUpdate},
    dataset::Dataset,
    placement::Placement,
};
use crate::ui::screen;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Table viewer with a column-visibility panel")]
struct Cli {
    /// CSV file to open (a demo table is shown when omitted).
    path: Option<PathBuf>,

    /// Where the column panel opens relative to its button (e.g. bottom-end).
    #[arg(long)]
    placement: Option<Placement>,

    /// Start with this column hidden (repeatable).
    #[arg(long = "hide", value_name = "COLUMN")]
    hide: Vec<String>,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = config::AppConfig::load();
    if let Some(placement) = cli.placement {
        config.placement = placement;
    }
    config.hidden_columns.extend(cli.hide.iter().cloned());

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }

    // ── load data ─────────────────────────────────────────────
    let (title, dataset) = match cli.path {
        Some(ref path) => {
            let dataset = Dataset::load_csv(path)
                .with_context(|| format!("could not open {}", path.display()))?;
            (path.display().to_string(), dataset)
        }
        None => ("demo: performers".to_string(), Dataset::demo()),
    };
    for name in &config.hidden_columns {
        if !dataset.columns.iter().any(|c| &c.name == name) {
            tracing::warn!(column = %name, "hidden column not in dataset");
        }
    }

    let (set_visibility, mut visibility_rx) = VisibilitySetter::channel();
    let mut state = AppState::new(title, dataset, config, set_visibility);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));

    let run_result = run(&mut terminal, &mut state, &mut events, &mut visibility_rx).await;

    // ── teardown ──────────────────────────────────────────────
    state.control.unmount();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}

/// Draw, wait for the next input or visibility update, repeat.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
    events: &mut UnboundedReceiver<AppEvent>,
    visibility_rx: &mut UnboundedReceiver<VisibilityUpdate>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            screen::render(state, area, frame.buffer_mut());
        })?;

        tokio::select! {
            biased;

            Some(update) = visibility_rx.recv() => {
                state.apply_visibility_update(update);
                state.apply_pending(visibility_rx);
            }

            Some(event) = events.recv() => handler::handle_event(state, visibility_rx, event),

            else => break,
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}
