// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Access to the per-host cAdvisor agents.
//!
//! The source only depends on [`AgentConnector`] and [`AgentClient`]; the
//! HTTP implementation lives in [`http`]. Spec and stats payloads are kept as
//! raw JSON since nothing here looks inside them.

mod http;

pub use http::{HttpAgentClient, HttpConnector};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Result;

/// Name the agent gives to the whole-machine entry.
pub const ROOT_CONTAINER: &str = "/";

/// Query parameters of a container info request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfoRequest {
    /// Max number of stats samples to return, newest last.
    pub num_stats: u64,
}

/// Reference to a child container, as listed in `subcontainers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerReference {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub namespace: String,
}

/// One entry of a subcontainers response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Canonical (cgroup) name; `/` for the machine itself.
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub subcontainers: Vec<ContainerReference>,
    #[serde(default)]
    pub spec: Value,
    /// Ordered oldest to newest.
    #[serde(default)]
    pub stats: Vec<Value>,
}

impl ContainerInfo {
    pub fn is_root(&self) -> bool {
        self.name == ROOT_CONTAINER
    }
}

/// Client bound to a single agent.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Info for `container` and every container below it.
    async fn subcontainers_info(
        &self,
        container: &str,
        request: &ContainerInfoRequest,
    ) -> Result<Vec<ContainerInfo>>;
}

/// Builds an [`AgentClient`] for an agent address (`ip:port`).
pub trait AgentConnector: Send + Sync {
    fn connect(&self, ip: &str, port: u16) -> Result<Box<dyn AgentClient>>;
}

/// `ip:port`, bracketing IPv6 literals.
pub fn agent_address(ip: &str, port: u16) -> String {
    if ip.contains(':') && !ip.starts_with('[') {
        format!("[{ip}]:{port}")
    } else {
        format!("{ip}:{port}")
    }
}
