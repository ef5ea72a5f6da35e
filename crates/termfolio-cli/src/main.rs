use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use termfolio_core::{AppConfig, Page};

mod commands;

#[derive(Parser)]
#[command(name = "termfolio")]
#[command(author, version, about = "A terminal portfolio that types itself out")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file to use instead of ~/.config/termfolio/config.toml
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI (default)
    Run {
        /// HTML page to show instead of the configured one
        #[arg(short = 'p', long)]
        page: Option<PathBuf>,
    },
    /// List the commands found on the page
    Sections {
        #[arg(short = 'p', long)]
        page: Option<PathBuf>,
    },
    /// Show how a markup fragment is split into typing tokens
    Tokens {
        /// Markup fragment, or `-` to read it from stdin
        fragment: String,
        /// Print JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
    /// Write a config file with every default filled in
    InitConfig {
        /// Overwrite an existing file
        #[arg(short = 'f', long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let (config, load_error) = load_config(&config_path, cli.command.as_ref())?;
    let config = Arc::new(config);

    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;
    if let Some(e) = load_error {
        warn!("Ignoring unreadable config {}: {}", config_path.display(), e);
    }

    match cli.command {
        Some(Commands::Run { page }) => {
            let page = load_page(&config, page.as_deref())?;
            commands::run::run(config, page).await
        }
        None => {
            let page = load_page(&config, None)?;
            commands::run::run(config, page).await
        }
        Some(Commands::Sections { page }) => {
            let page = load_page(&config, page.as_deref())?;
            commands::sections::run(&page)
        }
        Some(Commands::Tokens { fragment, json }) => commands::tokens::run(&fragment, json),
        Some(Commands::InitConfig { force }) => commands::init_config::run(&config_path, force),
    }
}

/// Load the config at `path`.
///
/// `init-config` must be able to replace a broken file, so for that command a
/// load failure falls back to defaults and the error is handed back.
fn load_config(
    path: &Path,
    command: Option<&Commands>,
) -> Result<(AppConfig, Option<termfolio_core::Error>)> {
    match AppConfig::load_from(path) {
        Ok(config) => Ok((config, None)),
        Err(e) if matches!(command, Some(Commands::InitConfig { .. })) => {
            Ok((AppConfig::default(), Some(e)))
        }
        Err(e) => Err(e.into()),
    }
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so its log goes to `<data_dir>/termfolio.log`.
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    if to_file {
        let log_path = config.log_path();
        if let Some(dir) = log_path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create {}", dir.display()))?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("cannot open log file {}", log_path.display()))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

/// Page from `override_path`, else the configured page, else the built-in sample
fn load_page(config: &AppConfig, override_path: Option<&Path>) -> Result<Page> {
    match override_path.map(Path::to_path_buf).or_else(|| config.page_path()) {
        Some(path) => Ok(Page::load(&path)?),
        None => Ok(Page::sample()),
    }
}
