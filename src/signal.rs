//! Signal bus for walker coordination
//!
//! An append-only, timestamped log that walkers (or the engine, through the
//! observer adapter) write to and readers poll by index.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::id::now_rfc3339;
use crate::observer::{WalkEvent, WalkObserver};

/// A single coordination record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// RFC3339, UTC
    pub ts: String,
    pub event: String,
    pub agent: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub case_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub step: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

/// Thread-safe, append-only signal log
#[derive(Debug, Default)]
pub struct SignalBus {
    signals: Mutex<Vec<Signal>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Signal>> {
        match self.signals.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Append a signal stamped with the current time
    pub fn emit(
        &self,
        event: impl Into<String>,
        agent: impl Into<String>,
        case_id: impl Into<String>,
        step: impl Into<String>,
        meta: BTreeMap<String, String>,
    ) {
        let signal = Signal {
            ts: now_rfc3339(),
            event: event.into(),
            agent: agent.into(),
            case_id: case_id.into(),
            step: step.into(),
            meta,
        };
        tracing::trace!(event = %signal.event, agent = %signal.agent, "signal");
        self.lock().push(signal);
    }

    /// Copy of every signal from `index` onward; empty past the end
    pub fn since(&self, index: usize) -> Vec<Signal> {
        let signals = self.lock();
        signals.get(index..).map(|s| s.to_vec()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records walk events as signals: event type, walker, `case_id` metadata, node
impl WalkObserver for SignalBus {
    fn on_event(&self, event: &WalkEvent) {
        let mut meta = BTreeMap::new();
        if let Some(edge) = &event.edge {
            meta.insert("edge".to_string(), edge.clone());
        }
        if let Some(error) = &event.error {
            meta.insert("error".to_string(), error.clone());
        }
        let case_id = event
            .metadata
            .get("case_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        self.emit(
            event.event_type.as_str(),
            event.walker.clone().unwrap_or_default(),
            case_id,
            event.node.clone().unwrap_or_default(),
            meta,
        );
    }
}
