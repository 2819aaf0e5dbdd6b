//! Structured tracing output for walk events

use tracing::{info, warn};

use super::{WalkEvent, WalkObserver};

/// Writes one `tracing` line per walk event; `warn` when the event carries an error
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl WalkObserver for LogObserver {
    fn on_event(&self, event: &WalkEvent) {
        let node = event.node.as_deref().unwrap_or("");
        let walker = event.walker.as_deref().unwrap_or("");
        let edge = event.edge.as_deref().unwrap_or("");

        match &event.error {
            Some(error) => warn!(
                event = %event.event_type,
                node,
                walker,
                edge,
                elapsed = ?event.elapsed,
                error = %error,
                "walk"
            ),
            None => info!(
                event = %event.event_type,
                node,
                walker,
                edge,
                elapsed = ?event.elapsed,
                "walk"
            ),
        }
    }
}
