//! Origami - a graph-execution engine for agent pipelines
//!
//! Pipelines are declared in YAML, validated, and built into a [`Graph`] of
//! nodes and edges. Identity-bearing walkers traverse the graph one at a time
//! or as a scheduled [`Team`](scheduler::Team), with masks as capability
//! middleware and a uniform event stream for observers.

pub mod element;
pub mod error;
pub mod graph;
pub mod id;
pub mod mask;
pub mod observer;
pub mod pipeline;
pub mod scheduler;
pub mod signal;
pub mod walker;

pub use error::{BoxError, OrigamiError, Result};
pub use graph::{Artifact, ArtifactRef, Edge, Graph, GraphOptions, Node, NodeContext, Transition, Zone};
pub use pipeline::{PipelineDef, load_pipeline};
pub use walker::{AgentIdentity, Walker, WalkerState};
