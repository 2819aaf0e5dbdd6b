//! Error types for Origami
//!
//! Centralized error handling using thiserror. Definition errors surface at
//! parse/validate/build time; traversal and orchestration errors surface from
//! `Graph::walk` and `Graph::walk_team`.

use thiserror::Error;

/// Boxed error returned by domain code (nodes, masks, hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All error types that can occur in Origami
#[derive(Debug, Error)]
pub enum OrigamiError {
    /// Pipeline document could not be parsed
    #[error("parse pipeline YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Pipeline could not be written back out as YAML
    #[error("serialize pipeline YAML: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Pipeline has no name
    #[error("pipeline name is required")]
    MissingPipelineName,

    /// A node definition has no name
    #[error("node name is required")]
    MissingNodeName,

    /// Two node definitions share a name
    #[error("duplicate node name {0:?}")]
    DuplicateNode(String),

    /// An edge definition has no id
    #[error("edge id is required")]
    MissingEdgeId,

    /// Two edge definitions share an id
    #[error("duplicate edge id {0:?}")]
    DuplicateEdge(String),

    /// An edge source is not a declared node
    #[error("edge {edge} references unknown source node {node:?}")]
    UnknownEdgeSource { edge: String, node: String },

    /// An edge target is neither a declared node nor the terminal marker
    #[error("edge {edge} references unknown target node {node:?}")]
    UnknownEdgeTarget { edge: String, node: String },

    /// A zone lists a node that is not declared
    #[error("zone {zone:?} references unknown node {node:?}")]
    UnknownZoneNode { zone: String, node: String },

    /// Pipeline has no start node
    #[error("start node is required")]
    MissingStart,

    /// Start node is not declared
    #[error("start node {0:?} not found in node list")]
    UnknownStartNode(String),

    /// Element name does not match any known element
    #[error("unknown element {0:?}")]
    UnknownElement(String),

    /// No registered factory can build a node definition
    #[error("no node factory for family {family:?} (node {node:?})")]
    MissingNodeFactory { family: String, node: String },

    /// A node declares an after-hook that is not registered
    #[error("node {node:?} declares unknown hook {hook:?}")]
    UnknownHook { node: String, hook: String },

    /// An edge handed to graph construction names a node the graph lacks
    #[error("edge {edge} references unknown node {node:?}")]
    UnknownGraphNode { edge: String, node: String },

    /// Referenced node does not exist in the graph
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A node's processing failed
    #[error("node {node}: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: BoxError,
    },

    /// An after-hook failed
    #[error("hook {hook}: {source}")]
    HookFailed {
        hook: String,
        #[source]
        source: BoxError,
    },

    /// No outgoing edge matched the node's artifact
    #[error("no matching edge from node {node:?}, artifact type {artifact_type:?}")]
    NoMatchingEdge { node: String, artifact_type: String },

    /// A matched edge points at a node the graph does not contain
    #[error("transition target {target:?} from edge {edge} not found")]
    DanglingTarget { edge: String, target: String },

    /// Team walk started without walkers
    #[error("team has no walkers")]
    EmptyTeam,

    /// The scheduler did not pick a walker
    #[error("scheduler selected no walker at node {0:?}")]
    NoWalkerSelected(String),

    /// Team walk hit its step limit before reaching the terminal node
    #[error("max steps ({max}) exceeded at node {node:?}")]
    MaxStepsExceeded { max: usize, node: String },

    /// Walk was cancelled through its cancellation token
    #[error("walk cancelled")]
    Cancelled,

    /// Mask is not valid for the node it was equipped on
    #[error("mask {mask:?} cannot be equipped at node {node:?} (valid: {valid:?})")]
    MaskNotValid {
        mask: String,
        node: String,
        valid: Vec<String>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrigamiError {
    /// True for errors raised while loading, validating, or building a pipeline.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            OrigamiError::Parse(_)
                | OrigamiError::MissingPipelineName
                | OrigamiError::MissingNodeName
                | OrigamiError::DuplicateNode(_)
                | OrigamiError::MissingEdgeId
                | OrigamiError::DuplicateEdge(_)
                | OrigamiError::UnknownEdgeSource { .. }
                | OrigamiError::UnknownEdgeTarget { .. }
                | OrigamiError::UnknownZoneNode { .. }
                | OrigamiError::MissingStart
                | OrigamiError::UnknownStartNode(_)
                | OrigamiError::UnknownElement(_)
                | OrigamiError::MissingNodeFactory { .. }
                | OrigamiError::UnknownHook { .. }
                | OrigamiError::UnknownGraphNode { .. }
                | OrigamiError::MaskNotValid { .. }
        )
    }
}

/// Result type alias for Origami operations
pub type Result<T> = std::result::Result<T, OrigamiError>;
