//! Edge and Transition contracts
//!
//! Edges are evaluated in definition order after a node produces its artifact;
//! the first edge returning a transition wins.

use std::collections::HashMap;

use serde_json::Value;

use crate::graph::Artifact;
use crate::walker::WalkerState;

/// Outcome of a matched edge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub next_node: String,
    /// Merged into the walker's context after the step is recorded
    pub context_additions: HashMap<String, Value>,
    pub explanation: String,
}

impl Transition {
    /// Transition to `next_node` with no context additions
    pub fn to(next_node: impl Into<String>) -> Self {
        Self {
            next_node: next_node.into(),
            ..Default::default()
        }
    }

    /// Add a context entry
    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context_additions.insert(key.into(), value);
        self
    }

    /// Set the explanation
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// A conditional, directed connection between two nodes
pub trait Edge: Send + Sync {
    fn id(&self) -> &str;

    fn from(&self) -> &str;

    fn to(&self) -> &str;

    fn is_shortcut(&self) -> bool {
        false
    }

    fn is_loop(&self) -> bool {
        false
    }

    /// `Some` when the edge fires for this artifact. May update loop counters.
    fn evaluate(&self, artifact: &dyn Artifact, state: &mut WalkerState) -> Option<Transition>;
}
