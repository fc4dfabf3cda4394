use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use common::error::BoxError;
use common::metrics::dispatcher_metrics;
use common::{shutdown, telemetry};
use coordinator::settings::METRICS_PATH;
use coordinator::{CoordinatorConfig, CoordinatorSettings, Dispatcher};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(author, version, about = "Competitive coordination core tick driver")]
struct CoordinatorCli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,

    #[arg(long, value_name = "ADDR")]
    metrics_addr: Option<SocketAddr>,

    #[arg(long, value_name = "MS")]
    tick_interval_ms: Option<u64>,
}

impl CoordinatorCli {
    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        std::env::var("COORDINATOR_CONFIG_PATH").ok().map(PathBuf::from)
    }

    fn apply_overrides(&self, settings: &mut CoordinatorSettings) {
        if let Some(addr) = self.metrics_addr {
            settings.metrics_addr = addr.to_string();
        }
        if let Some(ms) = self.tick_interval_ms {
            settings.tick_interval_ms = ms;
        }
    }
}

fn build_config(cli: &CoordinatorCli) -> Result<CoordinatorConfig, BoxError> {
    let mut settings = if let Some(path) = cli.resolve_config_path() {
        CoordinatorSettings::from_file(&path)?
    } else {
        CoordinatorSettings::from_env()?
    };

    cli.apply_overrides(&mut settings);

    settings.into_config()
}

#[tokio::main]
async fn main() {
    telemetry::init("coordinator");

    let cli = CoordinatorCli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "coordinator: invalid configuration");
            return;
        }
    };

    if let Err(err) = run_with_ctrl_c(config).await {
        error!(%err, "coordinator ended with error");
    }
}

async fn run_with_ctrl_c(config: CoordinatorConfig) -> Result<(), BoxError> {
    let (shutdown_tx, shutdown_rx) = shutdown::channel();

    let ctrl_c = tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(%err, "coordinator: failed to listen for ctrl_c");
        }
        shutdown::trigger(&shutdown_tx);
    });

    let result = run(config, shutdown_rx).await;
    ctrl_c.abort();
    result
}

async fn run(config: CoordinatorConfig, mut shutdown_rx: shutdown::ShutdownReceiver) -> Result<(), BoxError> {
    let _metrics_task = common::metrics::spawn_metrics_exporter(config.metrics_addr, METRICS_PATH, "coordinator");

    let mut dispatcher = Dispatcher::with_default_modes();
    let metrics = dispatcher_metrics();

    info!(tick_interval = ?config.tick_interval, "coordinator: starting tick loop");
    let mut ticker = tokio::time::interval(config.tick_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let started = Instant::now();
                dispatcher.tick(started, Utc::now());
                metrics.ticks_total.inc();
                metrics.tick_duration_seconds.observe(started.elapsed().as_secs_f64());

                let pending = dispatcher.pending_reward_count();
                if pending > 0 {
                    // Flushing needs a real `RewardGrants` collaborator (a world/persistence
                    // service client), which this crate pack does not provide standalone.
                    // Deployments should call `Dispatcher::flush_rewards` with their own.
                    info!(pending, "rewards queued, awaiting a wired RewardGrants collaborator");
                }

                let pending_teleports = dispatcher.pending_teleport_count();
                if pending_teleports > 0 {
                    // Same story as rewards: needs a wired `WorldInterface` collaborator.
                    info!(pending = pending_teleports, "guild war teleports queued, awaiting a wired WorldInterface collaborator");
                }
            }
            changed = shutdown_rx.changed() => {
                match changed {
                    Ok(()) if *shutdown_rx.borrow() => {
                        info!("coordinator: shutdown signal received");
                        break;
                    }
                    Ok(()) => {}
                    Err(_) => {
                        info!("coordinator: shutdown channel closed");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}
