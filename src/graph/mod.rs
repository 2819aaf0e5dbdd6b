//! Executable graph
//!
//! A [`Graph`] is a validated directed graph of nodes connected by edges and
//! partitioned into zones. It is read-only after construction and can be
//! shared across tasks; traversal lives in [`walk`].

mod edge;
mod node;
pub mod walk;

pub use edge::{Edge, Transition};
pub use node::{Artifact, ArtifactRef, Node, NodeContext, StaticArtifact};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::element::Element;
use crate::error::{OrigamiError, Result};
use crate::observer::WalkObserver;

/// Terminal pseudo-node name used when none is configured
pub const DEFAULT_DONE_NODE: &str = "_done";

/// A meta-phase grouping of nodes with shared characteristics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Zone {
    pub name: String,
    pub nodes: Vec<String>,
    pub element: Option<Element>,
    /// 0-3
    pub stickiness: u8,
}

impl Zone {
    pub fn new(name: impl Into<String>, nodes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            nodes,
            element: None,
            stickiness: 0,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_stickiness(mut self, stickiness: u8) -> Self {
        self.stickiness = stickiness;
        self
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.iter().any(|n| n == node)
    }
}

/// Construction options for [`Graph::with_options`]
#[derive(Clone, Default)]
pub struct GraphOptions {
    done_node: Option<String>,
    observer: Option<Arc<dyn WalkObserver>>,
}

impl GraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminal pseudo-node name; a transition targeting it completes the walk
    pub fn with_done_node(mut self, name: impl Into<String>) -> Self {
        self.done_node = Some(name.into());
        self
    }

    /// Graph-level observer, composed with any team observer during team walks
    pub fn with_observer(mut self, observer: Arc<dyn WalkObserver>) -> Self {
        self.observer = Some(observer);
        self
    }
}

/// Directed graph of nodes and edges partitioned into zones
pub struct Graph {
    name: String,
    nodes: Vec<Arc<dyn Node>>,
    edges: Vec<Arc<dyn Edge>>,
    zones: Vec<Zone>,
    node_index: HashMap<String, Arc<dyn Node>>,
    /// from-node -> edges in definition order
    edge_index: HashMap<String, Vec<Arc<dyn Edge>>>,
    done_node: String,
    observer: Option<Arc<dyn WalkObserver>>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("name", &self.name)
            .field("nodes", &self.nodes.iter().map(|n| n.name()).collect::<Vec<_>>())
            .field("edges", &self.edges.iter().map(|e| e.id()).collect::<Vec<_>>())
            .field("zones", &self.zones)
            .field("done_node", &self.done_node)
            .finish()
    }
}

impl Graph {
    /// Build a graph with default options
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<Arc<dyn Node>>,
        edges: Vec<Arc<dyn Edge>>,
        zones: Vec<Zone>,
    ) -> Result<Self> {
        Self::with_options(name, nodes, edges, zones, GraphOptions::default())
    }

    /// Build a graph, checking that every edge endpoint resolves.
    ///
    /// The edge target may also be the terminal pseudo-node. Fails with
    /// `UnknownGraphNode` naming the first unresolved endpoint.
    pub fn with_options(
        name: impl Into<String>,
        nodes: Vec<Arc<dyn Node>>,
        edges: Vec<Arc<dyn Edge>>,
        zones: Vec<Zone>,
        options: GraphOptions,
    ) -> Result<Self> {
        let done_node = options.done_node.unwrap_or_else(|| DEFAULT_DONE_NODE.to_string());

        let node_index: HashMap<String, Arc<dyn Node>> =
            nodes.iter().map(|n| (n.name().to_string(), n.clone())).collect();

        let mut edge_index: HashMap<String, Vec<Arc<dyn Edge>>> = HashMap::new();
        for edge in &edges {
            if !node_index.contains_key(edge.from()) {
                return Err(OrigamiError::UnknownGraphNode {
                    edge: edge.id().to_string(),
                    node: edge.from().to_string(),
                });
            }
            let to = edge.to();
            if to != done_node && !node_index.contains_key(to) {
                return Err(OrigamiError::UnknownGraphNode {
                    edge: edge.id().to_string(),
                    node: to.to_string(),
                });
            }
            edge_index.entry(edge.from().to_string()).or_default().push(edge.clone());
        }

        Ok(Self {
            name: name.into(),
            nodes,
            edges,
            zones,
            node_index,
            edge_index,
            done_node,
            observer: options.observer,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &[Arc<dyn Node>] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Arc<dyn Edge>] {
        &self.edges
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Arc<dyn Node>> {
        self.node_index.get(name)
    }

    /// Outgoing edges of `node` in definition order
    pub fn edges_from(&self, node: &str) -> &[Arc<dyn Edge>] {
        self.edge_index.get(node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn done_node(&self) -> &str {
        &self.done_node
    }

    pub fn observer(&self) -> Option<&Arc<dyn WalkObserver>> {
        self.observer.as_ref()
    }
}
