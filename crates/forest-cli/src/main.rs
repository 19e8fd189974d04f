//! `forest` — terminal UI for the forest plot registry.
//!
//! # Usage
//!
//! ```text
//! forest --database ~/forest/plots.db
//! forest --config ~/.config/forest/forest.toml
//! ```

mod app;
mod form;
mod settings;
mod ui;
mod worker;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use forest_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use worker::Completion;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "forest", version, about = "Terminal UI for the forest plot registry")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "forest.toml")]
  config: PathBuf,

  /// SQLite database file (overrides `database_path`).
  #[arg(long, value_name = "FILE")]
  database: Option<PathBuf>,

  /// Log file (overrides `log_file`).
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let settings =
    Settings::load(&args.config)?.with_overrides(args.database, args.log_file);

  init_tracing(&settings.log_file)?;
  tracing::info!(?settings, "starting");

  // A store that cannot be opened is fatal; nothing else can work.
  let store = match SqliteStore::open(&settings.database_path).await {
    Ok(store) => store.with_orphan_policy(settings.on_plot_delete),
    Err(e) => {
      tracing::error!(error = %e, "cannot open plot store");
      return Err(e).context("connecting to the plot store");
    }
  };

  let (requests, mut completions, worker_handle) = worker::spawn(store);
  let mut app = App::new(requests);
  app.reload();

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &mut completions).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  // Dropping the app closes the request channel, which stops the worker.
  drop(app);
  let store = worker_handle.await.context("storage worker panicked")?;
  store.close().await.context("closing the plot store")?;
  tracing::info!("stopped");

  run_result
}

/// Send log lines to `path`; stdout belongs to the TUI.
fn init_tracing(path: &Path) -> Result<()> {
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  completions: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
  loop {
    // Fold in everything the worker finished since the last frame.
    while let Ok(completion) = completions.try_recv() {
      app.apply(completion);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      // Ignore key releases on platforms that report them.
      Some(Event::Key(key)) if key.kind != KeyEventKind::Release => {
        if !app.handle_key(key) {
          break;
        }
      }
      Some(Event::Resize(_, _)) => {
        // Terminal will redraw on next iteration.
      }
      _ => {}
    }
  }

  Ok(())
}
