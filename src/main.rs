//! Roomwatch CLI
//!
//! Run with: cargo run -- serve
//!
//! # Configuration
//!
//! Read from `--config`, or the first of `~/.config/roomwatch/config.toml`,
//! `/etc/roomwatch/config.toml` and `./config.toml`. Environment variables
//! override the file:
//! - `ROOMWATCH_API_URL`: Tracking server base URL (default: http://localhost:5000)
//! - `ROOMWATCH_MODE`: `standard` or `security`
//! - `ROOMWATCH_OVERLAP`: `supersede` or `allow`
//! - `ROOMWATCH_HOST`, `ROOMWATCH_PORT`: Dashboard bind address (default: 127.0.0.1:8090)
//! - `ROOMWATCH_LOG_LEVEL`, `ROOMWATCH_LOG_FORMAT`: Logging (default: info, pretty)
//! - `RUST_LOG`: Full filter, takes precedence over the log level

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roomwatch::client::ApiClient;
use roomwatch::config::{generate_default_config, Config, LoadReport, LoggingConfig};
use roomwatch::poller::Poller;
use roomwatch::render::{Page, PageMode};
use roomwatch::server::{serve, ServerState};
use roomwatch::updater::{Dashboard, Routine, UpdateOutcome};

#[derive(Parser)]
#[command(name = "roomwatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live dashboard for a room-occupancy tracking server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Tracking server URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Render in security mode
    #[arg(long, global = true)]
    pub security: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the tracking server and serve the dashboard
    Serve,

    /// Run update routines once and print the resulting slots
    Once {
        /// Routine to run (statistics, rooms, visits, movements, groups); all if omitted
        routine: Option<Routine>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_ref());
    }

    let report = load_config(&cli)?;
    init_logging(&report.config.logging);

    match &report.path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    let config = report.config;

    match cli.command {
        Commands::Serve => run_serve(config).await,
        Commands::Once { routine } => run_once(config, routine).await,
        Commands::Config { .. } => Ok(()),
    }
}

/// Load the config without logging; warnings are returned for `main` to
/// emit once the subscriber is installed
fn load_config(cli: &Cli) -> anyhow::Result<LoadReport> {
    let mut report = match &cli.config {
        Some(path) => {
            let mut config = Config::load(path)?;
            let warnings = config.apply_env_overrides();
            LoadReport {
                config,
                path: Some(path.clone()),
                warnings,
            }
        }
        None => Config::load_default(),
    };

    if let Some(url) = &cli.api_url {
        report.config.source.base_url = url.clone();
    }
    if cli.security {
        report.config.display.mode = PageMode::Security;
    }

    Ok(report)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("roomwatch={},tower_http=info", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();

    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write config to {:?}", path))?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", content),
    }

    Ok(())
}

fn build_dashboard(config: &Config) -> anyhow::Result<(Arc<Dashboard>, Arc<Page>)> {
    let client = ApiClient::new(&config.source).context("Failed to create HTTP client")?;
    tracing::info!("Tracking server: {}", client.base_url());

    let page = Arc::new(Page::new());
    let dashboard = Arc::new(Dashboard::new(Arc::new(client), page.clone()));
    Ok((dashboard, page))
}

async fn run_serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting roomwatch v{}", env!("CARGO_PKG_VERSION"));

    let mode = config.display.mode;
    let (dashboard, page) = build_dashboard(&config)?;

    let poller = Arc::new(Poller::new(
        Arc::clone(&dashboard),
        config.poll.clone(),
        mode,
    ));
    let poll_handle = Arc::clone(&poller).start();

    let state = ServerState::new(page, dashboard, mode, config.server.refresh_secs);
    let served = serve(state, &config.server).await;

    tracing::info!("Stopping poller...");
    poller.stop();
    if tokio::time::timeout(Duration::from_secs(5), poll_handle)
        .await
        .is_err()
    {
        tracing::warn!("Poller did not stop in time");
    }

    served?;
    tracing::info!("Roomwatch stopped");
    Ok(())
}

async fn run_once(config: Config, routine: Option<Routine>) -> anyhow::Result<()> {
    let mode = config.display.mode;
    let (dashboard, page) = build_dashboard(&config)?;

    let routines = match routine {
        Some(routine) => vec![routine],
        None => Routine::ALL.to_vec(),
    };

    let mut failed = 0;
    for routine in routines {
        if dashboard.run(routine, mode).await == UpdateOutcome::Failed {
            failed += 1;
        }
    }

    for (slot, content) in page.snapshot() {
        println!("{:<22} {}", slot.id(), content.as_str());
    }

    if failed > 0 {
        tracing::warn!("{} update(s) failed, their slots show initial content", failed);
    }

    Ok(())
}
