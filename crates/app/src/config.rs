//! Live-query tuning knobs.

use serde::Deserialize;

/// Buffer sizes for the change feed and per-observer channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LiveQueryConfig {
    /// Committed changes buffered for slow observers before they lag.
    pub feed_capacity: usize,
    /// Snapshots buffered per subscription before the worker waits.
    pub observer_buffer: usize,
}

impl Default for LiveQueryConfig {
    fn default() -> Self {
        Self {
            feed_capacity: 256,
            observer_buffer: 16,
        }
    }
}
