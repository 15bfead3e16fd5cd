// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Polls cAdvisor agents across a fleet of hosts and turns their answers
//! into per-container and per-node records.

// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod agent;
pub mod config;
mod errors;
mod estimator;
mod fetcher;
mod hosts;
mod record;
pub mod sink;
mod source;

#[cfg(test)]
pub(crate) mod test_utils;

pub use errors::{Error, Result};
pub use estimator::num_stats_to_fetch;
pub use fetcher::{HostSnapshot, fetch_host};
pub use hosts::HostRegistry;
pub use record::{ContainerRecord, HostTaggedRecord};
pub use source::{
    CadvisorSource, DEFAULT_FETCH_TIMEOUT, FleetSnapshot, LastQueryPolicy, SourceStatus,
};
