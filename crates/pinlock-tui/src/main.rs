//! Pinlock - PIN-gated terminal banking demo
//!
//! Asks for a 6-digit PIN before showing the dashboard. The unlocked state
//! lasts for the terminal session.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pinlock_core::{FileSessionStore, SessionGate};
use pinlock_tui::app::TuiConfig;
use pinlock_tui::App;
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name under the cache directory
const LOG_FILE_NAME: &str = "pinlock.log";

#[derive(Parser, Debug)]
#[command(name = "pinlock")]
#[command(author, version, about = "PIN-gated terminal banking demo", long_about = None)]
struct Args {
    /// Configuration file (defaults to <config dir>/pinlock/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Forget any authenticated session before starting
    #[arg(long)]
    reset_session: bool,

    /// Session identifier (defaults to $PINLOCK_SESSION_ID or the parent process)
    #[arg(long)]
    session_id: Option<String>,
}

/// Application entry point with panic handling for terminal restoration
fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    init_logging()?;

    tracing::info!("SecureBank Banking App Initialized");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Features: PIN Authentication, Dashboard, Transactions");

    let result = run_app(args);

    if let Err(e) = &result {
        tracing::error!("Application error: {:#}", e);
    }

    result
}

/// Write logs to a file so they do not draw over the alternate screen
fn init_logging() -> Result<()> {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pinlock");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {:?}", log_dir))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let log_file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .with(
            EnvFilter::from_default_env()
                .add_directive("pinlock=info".parse()?)
                .add_directive("pinlock_core=info".parse()?)
                .add_directive("pinlock_tui=info".parse()?),
        )
        .init();

    Ok(())
}

/// Main application runner
fn run_app(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => TuiConfig::load_from(path),
        None => TuiConfig::load(),
    };

    let session_id = args
        .session_id
        .clone()
        .unwrap_or_else(FileSessionStore::current_session_id);
    let store = FileSessionStore::for_session(config.session_dir.clone(), &session_id)
        .context("Failed to open session store")?;
    tracing::debug!("Session store at {:?}", store.path());

    if args.reset_session {
        let mut session = SessionGate::restore(Box::new(store.clone()));
        session.logout();
    }

    // Resolve the secret before touching the terminal so errors stay readable
    let mut app = App::new(&config, Box::new(store))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
