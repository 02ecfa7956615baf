//! Blazebot - Entry Point
//!
//! Loads configuration (file, then flags, then env for the token), builds
//! the strategy and HTTP client, and runs the scheduler until Ctrl-C.

use blazebot::core::config::BotConfig;
use blazebot::core::error::{BotError, Result};
use blazebot::engine::{Engine, StrategyRegistry};
use blazebot::net::ApiClient;
use blazebot::runner::Scheduler;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Autonomous controller bot for the blaze arena
#[derive(Parser, Debug)]
#[command(name = "blazebot")]
#[command(about = "Polls the arena and drives every unit with a priority rule engine")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Auth token (falls back to the BLAZE_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    /// Decision tick in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Strategy name: priority, idle, or scout
    #[arg(long)]
    strategy: Option<String>,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn load_config(args: &Args) -> Result<BotConfig> {
    let mut cfg = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    if let Some(url) = &args.base_url {
        cfg.base_url = url.clone();
    }
    if let Some(token) = &args.token {
        cfg.token = token.clone();
    } else if cfg.token.is_empty() {
        if let Ok(token) = std::env::var("BLAZE_TOKEN") {
            cfg.token = token;
        }
    }
    if let Some(tick) = args.tick_ms {
        cfg.tick_ms = tick;
    }
    if let Some(strategy) = &args.strategy {
        cfg.strategy = strategy.clone();
    }
    if cfg.token.is_empty() {
        return Err(BotError::Config(
            "no auth token: pass --token or set BLAZE_TOKEN".into(),
        ));
    }
    cfg.validate()?;
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.quiet { "blazebot=warn" } else { "blazebot=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let cfg = Arc::new(load_config(&args)?);
    tracing::info!(
        base_url = %cfg.base_url,
        strategy = %cfg.strategy,
        tick_ms = cfg.tick_ms,
        "blazebot starting"
    );

    let registry = StrategyRegistry::builtin();
    let strategy = registry
        .create(&cfg.strategy)
        .ok_or_else(|| BotError::Config(format!("unknown strategy '{}'", cfg.strategy)))?;

    let client = ApiClient::new(&cfg)?;
    let engine = Engine::new(cfg.clone(), strategy);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    Scheduler::new(cfg, client, engine, shutdown_rx).run().await;
    Ok(())
}
