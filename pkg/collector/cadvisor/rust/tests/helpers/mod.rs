// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request received by a [`FakeCadvisor`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
}

/// What a [`FakeCadvisor`] answers to every request.
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(StatusCode),
    Body(&'static str),
    /// Answer `[]` only after the delay.
    Hang(Duration),
}

/// Minimal stand-in for a cAdvisor agent, serving HTTP/1 on loopback.
pub struct FakeCadvisor {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl FakeCadvisor {
    /// Wait until at least `n` requests arrived, or timeout.
    pub async fn wait_for_requests(&self, n: usize, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if self.requests.lock().unwrap().len() >= n {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        false
    }

    pub async fn start(reply: Reply) -> Self {
        Self::start_on("127.0.0.1:0", reply).await
    }

    /// Bind a specific address, e.g. another loopback IP on the port of a first agent.
    pub async fn start_on(addr: &str, reply: Reply) -> Self {
        let listener = TcpListener::bind(addr)
            .await
            .expect("failed to bind fake cAdvisor");
        let addr = listener.local_addr().expect("no local address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let reply = reply.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        handle(req, reply.clone(), Arc::clone(&recorded))
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn ip(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeCadvisor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(
    req: Request<Incoming>,
    reply: Reply,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let body = match req.into_body().collect().await {
        Ok(body) => serde_json::from_slice(&body.to_bytes()).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    };
    recorded
        .lock()
        .unwrap()
        .push(RecordedRequest { method, path, body });

    let response = match reply {
        Reply::Json(value) => Response::builder()
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(value.to_string()))),
        Reply::Status(status) => Response::builder()
            .status(status)
            .body(Full::new(Bytes::from_static(b"internal error"))),
        Reply::Body(body) => Response::builder()
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from_static(body.as_bytes()))),
        Reply::Hang(delay) => {
            tokio::time::sleep(delay).await;
            Response::builder()
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from_static(b"[]")))
        }
    };
    Ok(response.expect("failed to build response"))
}

/// A port nothing listens on.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

/// Subcontainers answer of a host running one aliased container.
pub fn machine_with_container(alias: &str) -> Value {
    json!([
        {
            "name": "/",
            "subcontainers": [{"name": "/docker"}],
            "spec": {"has_cpu": true, "has_memory": true, "memory": {"limit": 8_589_934_592u64}},
            "stats": [
                {"timestamp": "2026-01-01T00:00:00Z", "cpu": {"usage": {"total": 100}}}
            ]
        },
        {
            "name": "/docker/4f1c2a",
            "aliases": [alias, "4f1c2a"],
            "namespace": "docker",
            "spec": {"image": "nginx:1.27"},
            "stats": [
                {"timestamp": "2026-01-01T00:00:00Z", "cpu": {"usage": {"total": 10}}},
                {"timestamp": "2026-01-01T00:00:01Z", "cpu": {"usage": {"total": 20}}}
            ]
        }
    ])
}
