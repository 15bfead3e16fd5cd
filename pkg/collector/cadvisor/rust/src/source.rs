// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{error, info};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::agent::{AgentConnector, ROOT_CONTAINER, agent_address};
use crate::errors::{Error, Result};
use crate::estimator;
use crate::fetcher::{HostSnapshot, fetch_host};
use crate::hosts::HostRegistry;
use crate::record::HostTaggedRecord;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// When the last-query timestamp moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastQueryPolicy {
    /// Set at construction and never touched again. Once the first poll
    /// interval has passed, every cycle asks for the whole time since
    /// construction, so the sample count grows with uptime.
    #[default]
    Construction,
    /// Moved to the start of every successful cycle, so a failed tick makes
    /// the next one ask for the whole gap.
    PerCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    Idle,
    /// A fleet poll is running.
    Fetching,
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Idle => write!(f, "idle"),
            SourceStatus::Fetching => write!(f, "fetching"),
        }
    }
}

/// Result of one successful fleet poll. Hosts appear in registry order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetSnapshot {
    pub containers: Vec<HostTaggedRecord>,
    /// Exactly one per host.
    pub nodes: Vec<HostTaggedRecord>,
}

impl FleetSnapshot {
    fn push(&mut self, host: HostSnapshot) {
        self.containers.extend(host.containers);
        self.nodes.push(host.node);
    }
}

/// Long-lived handle polling a fleet of cAdvisor agents.
///
/// The last-query instant is the only state that changes between polls. It
/// is locked for the whole of [`CadvisorSource::fetch_data`], so overlapping
/// polls on one handle run one after the other.
pub struct CadvisorSource {
    poll_duration: Duration,
    fetch_timeout: Duration,
    last_query_policy: LastQueryPolicy,
    connector: Arc<dyn AgentConnector>,
    last_query: Mutex<Instant>,
    fetching: AtomicBool,
}

/// Marks a handle as fetching until dropped, including on error or cancellation.
struct FetchingGuard<'a>(&'a AtomicBool);

impl<'a> FetchingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for FetchingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CadvisorSource {
    pub fn new(poll_duration: Duration, connector: Arc<dyn AgentConnector>) -> Self {
        Self {
            poll_duration,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            last_query_policy: LastQueryPolicy::default(),
            connector,
            last_query: Mutex::new(Instant::now()),
            fetching: AtomicBool::new(false),
        }
    }

    /// Deadline for each host's fetch; expiry counts as a fetch error.
    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_last_query_policy(mut self, policy: LastQueryPolicy) -> Self {
        self.last_query_policy = policy;
        self
    }

    /// Start from a known last query instead of construction time.
    pub fn with_last_query(self, last_query: Instant) -> Self {
        Self {
            last_query: Mutex::new(last_query),
            ..self
        }
    }

    pub fn poll_duration(&self) -> Duration {
        self.poll_duration
    }

    pub fn status(&self) -> SourceStatus {
        if self.fetching.load(Ordering::Acquire) {
            SourceStatus::Fetching
        } else {
            SourceStatus::Idle
        }
    }

    /// Sample count the next poll would request right now.
    pub async fn num_stats_to_fetch(&self) -> u64 {
        let last_query = self.last_query.lock().await;
        estimator::num_stats_to_fetch(self.poll_duration, last_query.elapsed())
    }

    /// Poll every host of `hosts`, in order.
    ///
    /// The first host failure aborts the cycle with [`Error::CycleAbort`]
    /// naming that host; records already collected from other hosts are
    /// dropped and later hosts are not contacted.
    pub async fn fetch_data(&self, hosts: &HostRegistry) -> Result<FleetSnapshot> {
        let mut last_query = self.last_query.lock().await;
        let _fetching = FetchingGuard::enter(&self.fetching);
        let started = Instant::now();
        let num_stats = estimator::num_stats_to_fetch(self.poll_duration, last_query.elapsed());

        let mut fleet = FleetSnapshot::default();
        for (hostname, ip) in hosts.iter() {
            let host = self
                .fetch_host_with_deadline(hostname, ip, hosts.port, num_stats)
                .await
                .map_err(|e| Error::CycleAbort {
                    hostname: hostname.to_string(),
                    source: Box::new(e),
                })?;
            fleet.push(host);
        }

        if self.last_query_policy == LastQueryPolicy::PerCycle {
            *last_query = started;
        }

        info!(
            "collected {} containers and {} nodes from {} hosts ({num_stats} samples requested) in {:?}",
            fleet.containers.len(),
            fleet.nodes.len(),
            hosts.len(),
            started.elapsed()
        );
        Ok(fleet)
    }

    async fn fetch_host_with_deadline(
        &self,
        hostname: &str,
        ip: &str,
        port: u16,
        num_stats: u64,
    ) -> Result<HostSnapshot> {
        let fetch = fetch_host(
            self.connector.as_ref(),
            hostname,
            ip,
            port,
            ROOT_CONTAINER,
            num_stats,
        );
        match timeout(self.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(elapsed) => {
                error!(
                    "failed to get stats from cAdvisor on host {hostname} with ip {ip}: no answer after {:?}",
                    self.fetch_timeout
                );
                Err(Error::Fetch {
                    address: agent_address(ip, port),
                    source: Box::new(elapsed),
                })
            }
        }
    }
}
