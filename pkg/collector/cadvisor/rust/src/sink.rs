// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use crate::record::HostTaggedRecord;
use crate::source::FleetSnapshot;

/// Downstream consumer of successful poll cycles.
pub trait Sink: Send + Sync {
    fn submit(&self, fleet: &FleetSnapshot) -> Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum Kind {
    Container,
    Node,
}

#[derive(Serialize)]
struct Line<'a> {
    kind: Kind,
    #[serde(flatten)]
    record: &'a HostTaggedRecord,
}

/// Writes one JSON object per record, containers first, then nodes.
pub struct ConsoleSink<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn submit(&self, fleet: &FleetSnapshot) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| anyhow!("console sink lock poisoned"))?;

        let lines = fleet
            .containers
            .iter()
            .map(|record| Line {
                kind: Kind::Container,
                record,
            })
            .chain(fleet.nodes.iter().map(|record| Line {
                kind: Kind::Node,
                record,
            }));
        for line in lines {
            serde_json::to_writer(&mut *out, &line).context("serializing record")?;
            out.write_all(b"\n").context("writing record")?;
        }
        out.flush().context("flushing records")
    }
}
