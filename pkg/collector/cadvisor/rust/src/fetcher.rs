// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::{debug, error, warn};

use crate::agent::{AgentConnector, ContainerInfo, ContainerInfoRequest};
use crate::errors::Result;
use crate::record::{ContainerRecord, HostTaggedRecord};

/// Everything collected from one host in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSnapshot {
    /// Every entry but the root, in agent order.
    pub containers: Vec<HostTaggedRecord>,
    /// The root entry.
    pub node: HostTaggedRecord,
}

/// Fetch `container` and its subcontainers from the agent at `ip:port`.
///
/// Failures are logged here and returned to the caller unchanged.
pub async fn fetch_host(
    connector: &dyn AgentConnector,
    hostname: &str,
    ip: &str,
    port: u16,
    container: &str,
    num_stats: u64,
) -> Result<HostSnapshot> {
    let client = connector.connect(ip, port).inspect_err(|e| {
        error!("failed to create cAdvisor client for host {hostname} with ip {ip}: {e}");
    })?;

    let infos = client
        .subcontainers_info(container, &ContainerInfoRequest { num_stats })
        .await
        .inspect_err(|e| {
            error!("failed to get stats from cAdvisor on host {hostname} with ip {ip}: {e}");
        })?;

    debug!(
        "host {hostname}: {} entries, {num_stats} samples requested",
        infos.len()
    );
    Ok(split_root(hostname, infos))
}

/// Root detection uses the canonical name, so an aliased root is still the node.
fn split_root(hostname: &str, infos: Vec<ContainerInfo>) -> HostSnapshot {
    let mut containers = Vec::with_capacity(infos.len().saturating_sub(1));
    let mut node = None;

    for info in infos {
        let is_root = info.is_root();
        let record = HostTaggedRecord::new(hostname, ContainerRecord::from(info));
        if !is_root {
            containers.push(record);
        } else if node.replace(record).is_some() {
            warn!("host {hostname}: agent returned several root entries, keeping the last");
        }
    }

    let node = node.unwrap_or_else(|| {
        warn!("host {hostname}: agent returned no root entry");
        HostTaggedRecord::new(hostname, ContainerRecord::empty_root())
    });

    HostSnapshot { containers, node }
}
