//! Walkers: identity-bearing agents that traverse a graph.
//!
//! A walker combines who the agent is ([`AgentIdentity`]) with how it handles
//! nodes ([`Walker::handle`]). The graph owns traversal; the walker owns its
//! [`WalkerState`].

mod state;

pub use state::{StepRecord, WalkerState, WalkerStatus};

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::element::Element;
use crate::error::BoxError;
use crate::graph::{ArtifactRef, Node, NodeContext};
use crate::id::generate_walker_id;

/// Which side of an adversarial pipeline a persona serves
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Light,
    Shadow,
}

/// Who an agent is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentIdentity {
    pub persona_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Element>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_zone: Option<String>,
    /// 0-3; how strongly the walker prefers staying in its home zone
    #[serde(default)]
    pub stickiness: u8,
    /// Node name to preference score
    #[serde(default)]
    pub step_affinity: HashMap<String, f64>,
    #[serde(default)]
    pub personality_tags: Vec<String>,
    #[serde(default)]
    pub prompt_preamble: String,
}

impl AgentIdentity {
    /// Create a bare identity with just a persona name
    pub fn new(persona_name: impl Into<String>) -> Self {
        Self {
            persona_name: persona_name.into(),
            ..Default::default()
        }
    }

    /// Set the element
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    /// Set the affinity score for a node
    pub fn with_affinity(mut self, node: impl Into<String>, score: f64) -> Self {
        self.step_affinity.insert(node.into(), score);
        self
    }

    /// Affinity score for a node, 0.0 when absent
    pub fn affinity_for(&self, node: &str) -> f64 {
        self.step_affinity.get(node).copied().unwrap_or(0.0)
    }
}

/// An agent traversing a graph
#[async_trait]
pub trait Walker: Send + Sync {
    fn identity(&self) -> &AgentIdentity;

    fn state(&self) -> &WalkerState;

    fn state_mut(&mut self) -> &mut WalkerState;

    /// Process a node and produce its artifact
    async fn handle(
        &self,
        cancel: &CancellationToken,
        node: &dyn Node,
        nc: &mut NodeContext<'_>,
    ) -> Result<ArtifactRef, BoxError>;
}

/// Walker that delegates straight to `Node::process`
#[derive(Debug, Clone)]
pub struct ProcessWalker {
    identity: AgentIdentity,
    state: WalkerState,
}

impl ProcessWalker {
    /// Create a walker with a generated id
    pub fn new(identity: AgentIdentity) -> Self {
        let id = generate_walker_id(&identity.persona_name);
        Self {
            identity,
            state: WalkerState::new(id),
        }
    }

    /// Create a walker with an explicit state id
    pub fn with_id(identity: AgentIdentity, id: impl Into<String>) -> Self {
        Self {
            identity,
            state: WalkerState::new(id),
        }
    }
}

#[async_trait]
impl Walker for ProcessWalker {
    fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    fn state(&self) -> &WalkerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WalkerState {
        &mut self.state
    }

    async fn handle(
        &self,
        cancel: &CancellationToken,
        node: &dyn Node,
        nc: &mut NodeContext<'_>,
    ) -> Result<ArtifactRef, BoxError> {
        node.process(cancel, nc).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Artifact, StaticArtifact};
    use std::sync::Arc;

    struct EchoNode;

    #[async_trait]
    impl Node for EchoNode {
        fn name(&self) -> &str {
            "echo"
        }

        fn element_affinity(&self) -> Option<Element> {
            None
        }

        async fn process(
            &self,
            _cancel: &CancellationToken,
            nc: &mut NodeContext<'_>,
        ) -> Result<ArtifactRef, BoxError> {
            let kind = format!("echo:{}", nc.walker_state.id);
            Ok(Arc::new(StaticArtifact::new(kind, 1.0)))
        }
    }

    #[test]
    fn test_identity_builder() {
        let identity = AgentIdentity::new("Herald")
            .with_element(Element::Fire)
            .with_affinity("recall", 0.9);
        assert_eq!(identity.persona_name, "Herald");
        assert_eq!(identity.element, Some(Element::Fire));
        assert_eq!(identity.affinity_for("recall"), 0.9);
        assert_eq!(identity.affinity_for("report"), 0.0);
        assert_eq!(identity.alignment, Alignment::Light);
    }

    #[test]
    fn test_process_walker_generated_id() {
        let walker = ProcessWalker::new(AgentIdentity::new("Seeker"));
        assert!(walker.state().id.starts_with("seeker-"));
        assert_eq!(walker.state().status, WalkerStatus::Running);
    }

    #[tokio::test]
    async fn test_process_walker_delegates_to_node() {
        let walker = ProcessWalker::with_id(AgentIdentity::new("Herald"), "w1");
        let cancel = CancellationToken::new();
        let mut nc = NodeContext::new(walker.state(), None);
        let artifact = walker.handle(&cancel, &EchoNode, &mut nc).await.unwrap();
        assert_eq!(artifact.artifact_type(), "echo:w1");
    }
}
