// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use dd_cadvisor_source::CadvisorSource;
use dd_cadvisor_source::agent::HttpConnector;
use dd_cadvisor_source::config::{Config, config_path};
use dd_cadvisor_source::sink::{ConsoleSink, Sink};
use log::{error, info, warn};
use simple_logger::SimpleLogger;
use tokio::signal::unix::{SignalKind, signal};
use tokio::time::MissedTickBehavior;

/// Poll cAdvisor agents and print container and node stats as JSON lines
#[derive(Parser, Debug)]
#[command(name = "dd-cadvisor-source")]
struct Args {
    /// YAML config file (defaults to $DD_CADVISOR_CONFIG, then /etc/datadog-agent/cadvisor.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a single poll cycle and exit, non-zero if it failed
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let path = config_path(args.config);
    let config = Config::load(&path)?;

    SimpleLogger::new().with_level(config.log_level).init()?;
    info!(
        "dd-cadvisor-source starting (version {}, config {})",
        env!("CARGO_PKG_VERSION"),
        path.display()
    );

    let connector =
        HttpConnector::new(config.fetch_timeout()).context("failed to create HTTP client")?;
    let source = CadvisorSource::new(config.poll_interval(), Arc::new(connector))
        .with_fetch_timeout(config.fetch_timeout())
        .with_last_query_policy(config.last_query_policy);
    let sink = ConsoleSink::stdout();

    if args.once {
        return poll(&config, &source, &sink).await;
    }

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A poll cycle can take hosts x fetch_timeout; signals interrupt it.
                tokio::select! {
                    result = poll(&config, &source, &sink) => {
                        if let Err(e) = result {
                            error!("skipping poll cycle: {e:#}");
                        }
                    }
                    _ = sigterm.recv() => {
                        info!("received SIGTERM during poll cycle");
                        break;
                    }
                    _ = sigint.recv() => {
                        info!("received SIGINT during poll cycle");
                        break;
                    }
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT");
                break;
            }
        }
    }

    info!("dd-cadvisor-source shutting down");
    Ok(())
}

/// One poll cycle: resolve the registry, poll it, hand the records downstream.
async fn poll(config: &Config, source: &CadvisorSource, sink: &dyn Sink) -> Result<()> {
    let hosts = config.host_registry()?;
    if hosts.is_empty() {
        warn!("no cAdvisor hosts configured");
    }
    let fleet = source.fetch_data(&hosts).await?;
    sink.submit(&fleet).context("failed to submit records")
}
