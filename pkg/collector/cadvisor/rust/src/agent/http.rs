// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Url;

use super::{AgentClient, AgentConnector, ContainerInfo, ContainerInfoRequest, agent_address};
use crate::errors::{Error, Result};

const API_PREFIX: &str = "api/v1.3/";

/// Connects to cAdvisor agents over plain HTTP. All clients share one
/// connection pool.
#[derive(Clone)]
pub struct HttpConnector {
    client: reqwest::Client,
}

impl HttpConnector {
    /// `timeout` bounds each request, from connect to the end of the body.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl AgentConnector for HttpConnector {
    fn connect(&self, ip: &str, port: u16) -> Result<Box<dyn AgentClient>> {
        let address = agent_address(ip, port);
        let base = Url::parse(&format!("http://{address}/{API_PREFIX}")).map_err(|e| {
            Error::Connection {
                address: address.clone(),
                source: Box::new(e),
            }
        })?;
        Ok(Box::new(HttpAgentClient {
            address,
            base,
            client: self.client.clone(),
        }))
    }
}

/// Client for one agent's v1.3 API.
pub struct HttpAgentClient {
    address: String,
    base: Url,
    client: reqwest::Client,
}

impl HttpAgentClient {
    fn subcontainers_url(&self, container: &str) -> Result<Url> {
        let path = format!("subcontainers{}", container.trim_end_matches('/'));
        self.base.join(&path).map_err(|e| self.fetch_error(e))
    }

    fn fetch_error(&self, e: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::Fetch {
            address: self.address.clone(),
            source: Box::new(e),
        }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn subcontainers_info(
        &self,
        container: &str,
        request: &ContainerInfoRequest,
    ) -> Result<Vec<ContainerInfo>> {
        let url = self.subcontainers_url(container)?;
        debug!("POST {url} num_stats={}", request.num_stats);

        self.client
            .post(url)
            .json(request)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| self.fetch_error(e))?
            .json::<Vec<ContainerInfo>>()
            .await
            .map_err(|e| self.fetch_error(e))
    }
}
