// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::time::Duration;

/// Number of historical samples to ask an agent for.
///
/// The agent samples at 1Hz or faster, so one sample per whole second of the
/// window is enough. The window is the poll interval, or the time since the
/// last query when that is longer (a missed or late tick).
pub fn num_stats_to_fetch(poll_duration: Duration, since_last_query: Duration) -> u64 {
    let window = if since_last_query > poll_duration {
        since_last_query
    } else {
        poll_duration
    };
    window.as_secs()
}
