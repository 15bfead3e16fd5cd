// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use serde::Serialize;
use serde_json::Value;

use crate::agent::{ContainerInfo, ROOT_CONTAINER};

/// A monitored entity in the shape handed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerRecord {
    /// First alias when the agent reports any, else the canonical name.
    pub name: String,
    pub spec: Value,
    /// Oldest first.
    pub stats: Vec<Value>,
}

impl ContainerRecord {
    /// Placeholder node entry for a host whose agent returned no root.
    pub fn empty_root() -> Self {
        Self {
            name: ROOT_CONTAINER.to_string(),
            spec: Value::Null,
            stats: Vec::new(),
        }
    }
}

impl From<ContainerInfo> for ContainerRecord {
    fn from(info: ContainerInfo) -> Self {
        let name = info.aliases.into_iter().next().unwrap_or(info.name);
        Self {
            name,
            spec: info.spec,
            stats: info.stats,
        }
    }
}

/// A record and the host it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostTaggedRecord {
    pub hostname: String,
    #[serde(flatten)]
    pub container: ContainerRecord,
}

impl HostTaggedRecord {
    pub fn new(hostname: &str, container: ContainerRecord) -> Self {
        Self {
            hostname: hostname.to_string(),
            container,
        }
    }

    pub fn name(&self) -> &str {
        &self.container.name
    }
}
