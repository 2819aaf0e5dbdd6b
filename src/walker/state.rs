//! Walker progress tracking
//!
//! `WalkerState` is the mutable record a walker carries through a graph: where
//! it is, which edges it has taken, loop counters, and accumulated context.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a walker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalkerStatus {
    #[default]
    Running,
    Paused,
    Done,
    Error,
}

impl WalkerStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WalkerStatus::Done | WalkerStatus::Error)
    }
}

impl fmt::Display for WalkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WalkerStatus::Running => "running",
            WalkerStatus::Paused => "paused",
            WalkerStatus::Done => "done",
            WalkerStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A completed node visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub node: String,
    pub outcome: String,
    pub edge_id: String,
    /// RFC3339 UTC
    pub timestamp: String,
}

/// A walker's progress through a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkerState {
    pub id: String,
    #[serde(default)]
    pub current_node: String,
    /// Per-edge loop counters
    #[serde(default)]
    pub loop_counts: HashMap<String, u32>,
    #[serde(default)]
    pub status: WalkerStatus,
    #[serde(default)]
    pub history: Vec<StepRecord>,
    #[serde(default)]
    pub context: HashMap<String, Value>,
}

impl WalkerState {
    /// Create a running state with empty history and context
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_node: String::new(),
            loop_counts: HashMap::new(),
            status: WalkerStatus::Running,
            history: Vec::new(),
            context: HashMap::new(),
        }
    }

    /// Append a step to the history and move `current_node` to `node`
    pub fn record_step(
        &mut self,
        node: impl Into<String>,
        outcome: impl Into<String>,
        edge_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) {
        let node = node.into();
        self.current_node = node.clone();
        self.history.push(StepRecord {
            node,
            outcome: outcome.into(),
            edge_id: edge_id.into(),
            timestamp: timestamp.into(),
        });
    }

    /// Increment the loop counter for an edge and return the new count
    pub fn increment_loop(&mut self, edge_id: &str) -> u32 {
        let count = self.loop_counts.entry(edge_id.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Merge additions into the accumulated context; later keys win
    pub fn merge_context(&mut self, additions: &HashMap<String, Value>) {
        for (k, v) in additions {
            self.context.insert(k.clone(), v.clone());
        }
    }

    /// Names of the nodes visited so far, in order
    pub fn path(&self) -> Vec<&str> {
        self.history.iter().map(|s| s.node.as_str()).collect()
    }
}
