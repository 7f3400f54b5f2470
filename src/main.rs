//! user-dashboard binary entry point.
//!
//! Parses flags, sets up file logging and the tokio runtime, initializes the
//! terminal in raw mode, runs the TUI event loop and restores the terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

use user_dashboard::app::keymap::Keymap;
use user_dashboard::app::settings::Settings;
use user_dashboard::app::{self, AppState, Theme, config_file_write_path};
use user_dashboard::{HttpUserService, ListController};

/// Browse, search, create and delete users from a REST user service.
#[derive(Parser, Debug)]
#[command(name = "user-dashboard", version, about, long_about = None)]
struct Cli {
    /// Base URL of the user service (overrides dashboard.conf)
    #[arg(long, env = "USER_DASHBOARD_API_URL")]
    api_url: Option<String>,

    /// Cards per page (overrides dashboard.conf)
    #[arg(long, allow_negative_numbers = true)]
    page_size: Option<i64>,

    /// Request timeout in seconds (overrides dashboard.conf)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log file; the terminal is owned by the UI
    #[arg(long, env = "USER_DASHBOARD_LOG")]
    log_file: Option<PathBuf>,
}

/// Send `tracing` output to a file, filtered by `RUST_LOG`.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("user_dashboard=info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("user-dashboard.log"));
    init_logging(&log_path)?;

    let mut settings = Settings::load_or_init(&config_file_write_path("dashboard.conf"));
    settings.apply_overrides(cli.api_url, cli.page_size, cli.timeout_secs);
    let page_size = settings.page_size().context("page size")?;
    let service = HttpUserService::new(&settings.api_url, settings.timeout())
        .context("user service")?;
    tracing::info!(api_url = %service.base_url(), page_size = page_size.get(), "Starting");

    let theme = Theme::load_or_init(&config_file_write_path("theme.conf"));
    let keymap = Keymap::load_or_init(&config_file_write_path("keybinds.conf"));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("start async runtime")?;

    let controller = ListController::new(Arc::new(service));
    let state = AppState::new(controller, page_size, theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, state, runtime.handle().clone());

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
    runtime.shutdown_background();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
