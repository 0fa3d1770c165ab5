use std::fs::File;
use std::io::{stdout, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, error};

use heatree::config::Config;
use heatree::input::map_key;
use heatree::nav::{NavEvent, NavState};
use heatree::render;
use heatree::scan::scan_tree;

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

/// Heat map of a source tree: lines of code and recent change frequency
#[derive(Parser, Debug, Clone)]
#[command(name = "heatree", version)]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// History window in days for change frequency
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    days: Option<u32>,

    /// Extra entry name to skip (repeatable)
    #[arg(long, short = 'x')]
    exclude: Vec<String>,

    #[arg(long, short, default_value = "warn", value_enum)]
    log_level: LogLevel,

    /// Write logs here; nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(&cli)?;
    debug!("Parsed CLI arguments: {cli:?}");

    let config = load_config(&cli)?;

    enable_raw_mode().context("failed to enable raw mode")?;
    crossterm::execute!(stdout(), EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear()?;

    let app_result = run_app(&mut terminal, &cli.path, &config);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app_result
}

fn setup_tracing(cli: &Cli) -> anyhow::Result<()> {
    let (Some(level), Some(path)) = (cli.log_level.to_tracing_level(), cli.log_file.as_ref())
    else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.as_ref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(days) = cli.days {
        config.scan.window_days = days;
    }
    config.scan.exclude.extend(cli.exclude.iter().cloned());
    config.validate()?;

    debug!(?config, "effective configuration");
    Ok(config)
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    root: &Path,
    config: &Config,
) -> anyhow::Result<()> {
    let mut state = NavState::new();
    terminal.draw(|frame| render::draw(frame, &state, config))?;

    let result = scan_tree(root, config);
    if let Err(err) = &result {
        error!("scan failed: {err}");
    }
    state.update(NavEvent::ScanCompleted(result));

    loop {
        terminal.draw(|frame| render::draw(frame, &state, config))?;

        if state.should_quit() {
            break;
        }

        if let Event::Key(key) = event::read()? {
            if let Some(nav_event) = map_key(key) {
                state.update(nav_event);
            }
        }
    }

    Ok(())
}
