// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::agent::{
    AgentClient, AgentConnector, ContainerInfo, ContainerInfoRequest, agent_address,
};
use crate::errors::{Error, Result};

/// Scripted behavior of one fake agent.
#[derive(Clone)]
pub enum FakeAgent {
    Respond(Vec<ContainerInfo>),
    RefuseConnect,
    FailFetch,
    Hang(Duration),
}

/// A request seen by a fake agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub address: String,
    pub container: String,
    pub num_stats: u64,
}

/// In-memory connector keyed by agent address. Unknown addresses fail to fetch.
#[derive(Clone, Default)]
pub struct FakeConnector {
    agents: HashMap<String, FakeAgent>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, ip: &str, port: u16, agent: FakeAgent) -> Self {
        self.agents.insert(agent_address(ip, port), agent);
        self
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn seen_addresses(&self) -> Vec<String> {
        self.seen().into_iter().map(|r| r.address).collect()
    }
}

impl AgentConnector for FakeConnector {
    fn connect(&self, ip: &str, port: u16) -> Result<Box<dyn AgentClient>> {
        let address = agent_address(ip, port);
        let agent = self
            .agents
            .get(&address)
            .cloned()
            .unwrap_or(FakeAgent::FailFetch);
        if matches!(agent, FakeAgent::RefuseConnect) {
            return Err(Error::Connection {
                address,
                source: "malformed address".into(),
            });
        }
        Ok(Box::new(FakeClient {
            address,
            agent,
            seen: Arc::clone(&self.seen),
        }))
    }
}

struct FakeClient {
    address: String,
    agent: FakeAgent,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

#[async_trait]
impl AgentClient for FakeClient {
    async fn subcontainers_info(
        &self,
        container: &str,
        request: &ContainerInfoRequest,
    ) -> Result<Vec<ContainerInfo>> {
        self.seen.lock().unwrap().push(SeenRequest {
            address: self.address.clone(),
            container: container.to_string(),
            num_stats: request.num_stats,
        });
        match &self.agent {
            FakeAgent::Respond(infos) => Ok(infos.clone()),
            FakeAgent::Hang(d) => {
                tokio::time::sleep(*d).await;
                Ok(Vec::new())
            }
            FakeAgent::RefuseConnect | FakeAgent::FailFetch => Err(Error::Fetch {
                address: self.address.clone(),
                source: "connection refused".into(),
            }),
        }
    }
}

pub fn stat(seq: u64) -> Value {
    json!({"timestamp": format!("2026-01-01T00:00:{seq:02}Z"), "cpu": {"usage": {"total": seq * 1000}}})
}

pub fn info(name: &str, stats: Vec<Value>) -> ContainerInfo {
    ContainerInfo {
        name: name.to_string(),
        spec: json!({"has_cpu": true}),
        stats,
        ..Default::default()
    }
}

pub fn aliased(name: &str, alias: &str, stats: Vec<Value>) -> ContainerInfo {
    ContainerInfo {
        aliases: vec![alias.to_string()],
        ..info(name, stats)
    }
}

/// A root entry plus one container, the usual single-container host.
pub fn host_with_one_container(container: &str) -> FakeAgent {
    FakeAgent::Respond(vec![
        info("/", vec![stat(1)]),
        info(container, vec![stat(1), stat(2)]),
    ])
}
