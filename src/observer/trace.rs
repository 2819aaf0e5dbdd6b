//! In-memory event collection for post-walk analysis

use std::sync::Mutex;

use super::{WalkEvent, WalkEventType, WalkObserver};

/// Accumulates walk events. Safe for concurrent use.
#[derive(Debug, Default)]
pub struct TraceCollector {
    events: Mutex<Vec<WalkEvent>>,
}

impl TraceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all collected events
    pub fn events(&self) -> Vec<WalkEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Only events of the given type, in arrival order
    pub fn events_of_type(&self, event_type: WalkEventType) -> Vec<WalkEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear collected events
    pub fn reset(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl WalkObserver for TraceCollector {
    fn on_event(&self, event: &WalkEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
