//! Structured event log shared by the grid, sync and session layers
//!
//! Every event is a tracing record on [`EVENT_TARGET`] with the fields
//! `event`, `status` and, when present, `duration_secs` and `data`. Whatever
//! subscriber the host installs is the sink; nothing reads events back.

use std::fmt::Display;
use std::time::Instant;

pub const EVENT_TARGET: &str = "paint_grid::events";

/// Emit one structured event
pub fn log_event(event: &str, status: &str, duration_secs: Option<f64>, data: Option<&dyn Display>) {
    match (duration_secs, data) {
        (Some(duration), Some(data)) => tracing::info!(
            target: EVENT_TARGET,
            event,
            status,
            duration_secs = duration,
            data = %data,
        ),
        (Some(duration), None) => tracing::info!(
            target: EVENT_TARGET,
            event,
            status,
            duration_secs = duration,
        ),
        (None, Some(data)) => tracing::info!(target: EVENT_TARGET, event, status, data = %data),
        (None, None) => tracing::info!(target: EVENT_TARGET, event, status),
    }
}

/// Wall-clock timer for event durations
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}
