// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::{Path, PathBuf};
use std::time::Duration;

use indexmap::IndexMap;
use log::LevelFilter;
use serde::Deserialize;

use crate::errors::{BoxError, Error, Result};
use crate::hosts::HostRegistry;
use crate::source::LastQueryPolicy;

const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/cadvisor.yaml";
pub const CONFIG_PATH_ENV: &str = "DD_CADVISOR_CONFIG";

pub mod defaults {
    use super::*;

    pub const POLL_INTERVAL: u64 = 10;
    pub const FETCH_TIMEOUT: u64 = 5;
    pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;
    pub const PORT: u16 = 4194;

    pub(super) fn poll_interval() -> u64 {
        POLL_INTERVAL
    }

    pub(super) fn fetch_timeout() -> u64 {
        FETCH_TIMEOUT
    }

    pub(super) fn log_level() -> LevelFilter {
        LOG_LEVEL
    }

    pub(super) fn port() -> u16 {
        PORT
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Seconds between polls.
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval: u64,
    /// Per-host deadline, in seconds.
    #[serde(default = "defaults::fetch_timeout")]
    pub fetch_timeout: u64,
    #[serde(default = "defaults::log_level")]
    pub log_level: LevelFilter,
    #[serde(default)]
    pub last_query_policy: LastQueryPolicy,
    /// Port of the inline `hosts`.
    #[serde(default = "defaults::port")]
    pub port: u16,
    #[serde(default)]
    pub hosts: IndexMap<String, String>,
    /// Registry file re-read before every poll; takes precedence over `hosts`.
    pub hosts_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval: defaults::POLL_INTERVAL,
            fetch_timeout: defaults::FETCH_TIMEOUT,
            log_level: defaults::LOG_LEVEL,
            last_query_policy: LastQueryPolicy::default(),
            port: defaults::PORT,
            hosts: IndexMap::new(),
            hosts_file: None,
        }
    }
}

/// Explicit path, else `DD_CADVISOR_CONFIG`, else the packaged location.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_error = |source: BoxError| Error::Config {
            path: path.to_path_buf(),
            source,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| config_error(e.into()))?;
        let config: Config = serde_yaml::from_str(&contents).map_err(|e| config_error(e.into()))?;
        if config.poll_interval == 0 {
            return Err(config_error("poll_interval must be at least 1 second".into()));
        }
        if config.fetch_timeout == 0 {
            return Err(config_error("fetch_timeout must be at least 1 second".into()));
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    /// The registry for the next poll.
    pub fn host_registry(&self) -> Result<HostRegistry> {
        match &self.hosts_file {
            Some(path) => HostRegistry::load(path),
            None => Ok(HostRegistry {
                port: self.port,
                hosts: self.hosts.clone(),
            }),
        }
    }
}
