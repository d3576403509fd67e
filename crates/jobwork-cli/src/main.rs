//! `jobwork`: ledger of goods sent out to job workers and what comes back.
//!
//! # Usage
//!
//! ```text
//! jobwork supply add --invoice INV1 --goods Widget --qty 100
//! jobwork receipt add --receipt R1 --supply INV1 --finished 60 --damaged 10
//! jobwork open
//! jobwork export dynamic:INV1 --out INV1.pdf
//! jobwork browse
//! ```

mod app;
mod commands;
mod settings;
mod ui;
mod view;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use commands::Command;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use jobwork_store_sqlite::SqliteStore;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "jobwork", version, about = "Job-work inventory ledger")]
struct Cli {
  /// TOML config file; a missing file is fine.
  #[arg(short, long, value_name = "FILE", default_value = settings::DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// SQLite database, overriding the config file.
  #[arg(long, value_name = "PATH", env = "JOBWORK_DATABASE")]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  // Stderr keeps stdout clean for tables and JSON.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = Settings::load(&cli.config, cli.db.as_deref())?;
  settings.ensure_database_dir()?;
  let store = SqliteStore::open(&settings.database)
    .await
    .with_context(|| format!("failed to open store at {}", settings.database.display()))?;

  match cli.command {
    Command::Browse => browse(store, settings).await,
    command => {
      let mut stdout = io::stdout().lock();
      commands::run(command, &store, &settings, &mut stdout).await
    }
  }
}

// ─── Terminal browser ────────────────────────────────────────────────────────

async fn browse(store: SqliteStore, settings: Settings) -> Result<()> {
  let mut app = App::new(store, settings.export_dir);
  app.reload().await.context("loading ledger")?;

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let result = run_event_loop(&mut terminal, &mut app).await;

  // Restore the terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<SqliteStore>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await
    {
      break;
    }
  }

  Ok(())
}
