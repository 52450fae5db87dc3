use std::fs::OpenOptions;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use connect_four_sync::config::{AppConfig, LoggingConfig};
use connect_four_sync::controller::GameController;
use connect_four_sync::error::StoreError;
use connect_four_sync::persistence::{DirLocal, DirRemote, PersistenceSynchronizer, RemoteStore};
use connect_four_sync::ui::App;

/// Play Connect Four in the terminal, saving to a remote store with a local
/// fallback.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four in the terminal")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect-four.toml")]
    config: PathBuf,

    /// Override number of board rows
    #[arg(long)]
    rows: Option<usize>,

    /// Override number of board columns
    #[arg(long)]
    cols: Option<usize>,

    /// Override the local save directory
    #[arg(long)]
    local_dir: Option<PathBuf>,

    /// Shared directory to use as the remote store
    #[arg(long)]
    remote_dir: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Remote tier chosen at startup.
enum Remote {
    Dir(DirRemote),
    /// No remote configured: every call fails and saves stay local.
    Offline,
}

impl RemoteStore for Remote {
    fn put(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        async move {
            match self {
                Remote::Dir(dir) => dir.put(key, value).await,
                Remote::Offline => Err(StoreError::Unavailable("no remote store configured".into())),
            }
        }
    }

    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        async move {
            match self {
                Remote::Dir(dir) => dir.get(key).await,
                Remote::Offline => Err(StoreError::Unavailable("no remote store configured".into())),
            }
        }
    }
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("opening log file {}", config.file.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .with_context(|| format!("parsing log filter {:?}", config.filter))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(rows) = cli.rows {
        config.board.rows = rows;
    }
    if let Some(cols) = cli.cols {
        config.board.cols = cols;
    }
    if let Some(dir) = cli.local_dir {
        config.persistence.local_dir = dir;
    }
    if cli.remote_dir.is_some() {
        config.persistence.remote_dir = cli.remote_dir;
    }
    config.validate().context("invalid configuration")?;

    init_logging(&config.logging)?;
    tracing::info!(rows = config.board.rows, cols = config.board.cols, "starting");

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;

    let remote = match &config.persistence.remote_dir {
        Some(dir) => Remote::Dir(DirRemote::new(dir)),
        None => Remote::Offline,
    };
    let local = DirLocal::new(&config.persistence.local_dir);
    let sync = PersistenceSynchronizer::from_config(remote, local, &config.persistence);
    let controller = Arc::new(
        GameController::with_board(config.board.rows, config.board.cols, sync)
            .context("creating board")?,
    );

    run_tui(App::new(controller, runtime.handle().clone())).context("running terminal UI")
}

fn run_tui<R, L>(mut app: App<R, L>) -> io::Result<()>
where
    R: RemoteStore + 'static,
    L: connect_four_sync::persistence::LocalStore + 'static,
{
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even on error
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
