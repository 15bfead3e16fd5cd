// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::errors::{BoxError, Error, Result};

/// The agents to poll: hostname to IP, all listening on the same port.
/// Iteration follows insertion (file) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostRegistry {
    pub port: u16,
    #[serde(default)]
    pub hosts: IndexMap<String, String>,
}

impl HostRegistry {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            hosts: IndexMap::new(),
        }
    }

    /// Builder-style insert, mostly for tests and inline configs.
    pub fn with_host(mut self, hostname: &str, ip: &str) -> Self {
        self.hosts.insert(hostname.to_string(), ip.to_string());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hosts.iter().map(|(h, ip)| (h.as_str(), ip.as_str()))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Read a registry file: `{"port": 4194, "hosts": {"node-a": "10.0.0.1"}}`.
    /// JSON or YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let hosts_file_error = |source: BoxError| Error::HostsFile {
            path: path.to_path_buf(),
            source,
        };
        let contents = std::fs::read_to_string(path).map_err(|e| hosts_file_error(e.into()))?;
        serde_yaml::from_str(&contents).map_err(|e| hosts_file_error(e.into()))
    }
}
