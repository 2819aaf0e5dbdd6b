//! Node and Artifact contracts
//!
//! A node is a processing stage in the graph. Each visit produces an artifact
//! that outgoing edges inspect to decide where the walker goes next.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::element::Element;
use crate::error::BoxError;
use crate::mask::MaskedNode;
use crate::walker::WalkerState;

/// Output of a node visit
pub trait Artifact: fmt::Debug + Send + Sync {
    /// Kind tag that edges match on
    fn artifact_type(&self) -> &str;

    /// 0.0-1.0
    fn confidence(&self) -> f64;

    /// Underlying payload
    fn raw(&self) -> Value;
}

/// Shared handle to an artifact; the walk carries it forward as the next node's prior
pub type ArtifactRef = Arc<dyn Artifact>;

/// Plain artifact with a type tag, confidence, and JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct StaticArtifact {
    artifact_type: String,
    confidence: f64,
    raw: Value,
}

impl StaticArtifact {
    pub fn new(artifact_type: impl Into<String>, confidence: f64) -> Self {
        Self {
            artifact_type: artifact_type.into(),
            confidence,
            raw: Value::Null,
        }
    }

    /// Attach a payload
    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = raw;
        self
    }
}

impl Artifact for StaticArtifact {
    fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    fn confidence(&self) -> f64 {
        self.confidence
    }

    fn raw(&self) -> Value {
        self.raw.clone()
    }
}

/// Per-visit inputs handed to a node
#[derive(Debug)]
pub struct NodeContext<'a> {
    /// The visiting walker's state, read-only during processing
    pub walker_state: &'a WalkerState,
    /// Artifact produced by the previous node, if any
    pub prior_artifact: Option<ArtifactRef>,
    /// Scratch space shared by masks and the node for this visit only
    pub meta: HashMap<String, Value>,
}

impl<'a> NodeContext<'a> {
    pub fn new(walker_state: &'a WalkerState, prior_artifact: Option<ArtifactRef>) -> Self {
        Self {
            walker_state,
            prior_artifact,
            meta: HashMap::new(),
        }
    }

    /// Mutable access to the scratch map
    pub fn meta_mut(&mut self) -> &mut HashMap<String, Value> {
        &mut self.meta
    }

    /// True when `key` is present and set to JSON `true`
    pub fn meta_flag(&self, key: &str) -> bool {
        matches!(self.meta.get(key), Some(Value::Bool(true)))
    }
}

/// A processing stage in the graph
#[async_trait]
pub trait Node: Send + Sync {
    /// Unique name within a graph
    fn name(&self) -> &str;

    fn element_affinity(&self) -> Option<Element>;

    /// Produce this node's artifact for one visit
    async fn process(
        &self,
        cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> Result<ArtifactRef, BoxError>;

    /// Downcast hook used when equipping further masks
    fn as_masked(&self) -> Option<&MaskedNode> {
        None
    }
}
