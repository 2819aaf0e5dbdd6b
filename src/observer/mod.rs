//! Walk observability
//!
//! Every traversal step is published as a [`WalkEvent`] to a single-method
//! [`WalkObserver`]. New event kinds or metadata keys never break existing
//! observers. Observers run synchronously on the walking task.

mod logger;
mod narrate;
mod trace;
mod vocabulary;

pub use logger::LogObserver;
pub use narrate::{NarrationObserver, Progress, format_duration};
pub use trace::TraceCollector;
pub use vocabulary::{ChainVocabulary, MapVocabulary, Vocabulary, VocabularyFn, name_with_code};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::ArtifactRef;

/// Classifies walk events for filtering and routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkEventType {
    NodeEnter,
    NodeExit,
    EdgeEvaluate,
    Transition,
    WalkerSwitch,
    WalkComplete,
    WalkError,
}

impl WalkEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkEventType::NodeEnter => "node_enter",
            WalkEventType::NodeExit => "node_exit",
            WalkEventType::EdgeEvaluate => "edge_evaluate",
            WalkEventType::Transition => "transition",
            WalkEventType::WalkerSwitch => "walker_switch",
            WalkEventType::WalkComplete => "walk_complete",
            WalkEventType::WalkError => "walk_error",
        }
    }
}

impl fmt::Display for WalkEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single observation from a graph walk
#[derive(Debug, Clone)]
pub struct WalkEvent {
    pub event_type: WalkEventType,
    pub node: Option<String>,
    pub walker: Option<String>,
    pub edge: Option<String>,
    pub artifact: Option<ArtifactRef>,
    pub elapsed: Duration,
    pub error: Option<String>,
    /// Forward-compatible extension point
    pub metadata: HashMap<String, Value>,
}

impl WalkEvent {
    pub fn new(event_type: WalkEventType) -> Self {
        Self {
            event_type,
            node: None,
            walker: None,
            edge: None,
            artifact: None,
            elapsed: Duration::ZERO,
            error: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    pub fn with_walker(mut self, walker: impl Into<String>) -> Self {
        self.walker = Some(walker.into());
        self
    }

    pub fn with_edge(mut self, edge: impl Into<String>) -> Self {
        self.edge = Some(edge.into());
        self
    }

    pub fn with_artifact(mut self, artifact: ArtifactRef) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Receives events during a graph walk
pub trait WalkObserver: Send + Sync {
    fn on_event(&self, event: &WalkEvent);
}

/// Adapts a closure to [`WalkObserver`]
pub struct ObserverFn<F>(pub F);

impl<F> WalkObserver for ObserverFn<F>
where
    F: Fn(&WalkEvent) + Send + Sync,
{
    fn on_event(&self, event: &WalkEvent) {
        (self.0)(event)
    }
}

/// Fans events out to several observers in registration order
#[derive(Clone, Default)]
pub struct MultiObserver {
    observers: Vec<Arc<dyn WalkObserver>>,
}

impl MultiObserver {
    pub fn new(observers: Vec<Arc<dyn WalkObserver>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn WalkObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl WalkObserver for MultiObserver {
    fn on_event(&self, event: &WalkEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// Combine two optional observers, fanning out only when both are present
pub fn compose_observers(
    a: Option<Arc<dyn WalkObserver>>,
    b: Option<Arc<dyn WalkObserver>>,
) -> Option<Arc<dyn WalkObserver>> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(Arc::new(MultiObserver::new(vec![a, b]))),
    }
}

/// Deliver an event to a possibly-absent observer
pub fn emit(observer: Option<&Arc<dyn WalkObserver>>, event: WalkEvent) {
    if let Some(obs) = observer {
        obs.on_event(&event);
    }
}
