// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// The agent client for a host could not be built (malformed address, TLS setup...).
    #[error("could not create cAdvisor client for {address}: {source}")]
    Connection {
        address: String,
        #[source]
        source: BoxError,
    },

    /// The subcontainers request failed: transport error, bad status, bad body or deadline.
    #[error("failed to get subcontainers info from {address}: {source}")]
    Fetch {
        address: String,
        #[source]
        source: BoxError,
    },

    /// First host-level failure of a fleet poll. Nothing collected in that cycle is returned.
    #[error("failed to get cAdvisor data from host {hostname:?}: {source}")]
    CycleAbort {
        hostname: String,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("could not load hosts file {}: {source}", .path.display())]
    HostsFile {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Hostname of the failing host for a cycle abort.
    pub fn failed_host(&self) -> Option<&str> {
        match self {
            Error::CycleAbort { hostname, .. } => Some(hostname),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
