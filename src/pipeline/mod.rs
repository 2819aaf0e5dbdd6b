//! Pipeline DSL
//!
//! A pipeline is declared in YAML: nodes, edges, zones, a start node and a
//! terminal marker. This module parses and validates the declaration,
//! re-serializes it without losing shape, renders it as a diagram, and builds
//! an executable [`Graph`](crate::graph::Graph) from it.
//!
//! ```yaml
//! pipeline: triage
//! nodes:
//!   - name: recall
//!     element: fire
//!     family: recall
//! edges:
//!   - id: E1
//!     name: done
//!     from: recall
//!     to: _done
//! start: recall
//! ```

mod build;
mod hooks;
mod render;

pub use build::{DslEdge, EdgeFactory, EdgeFactoryFn, GraphRegistries, NodeFactoryFn, NodeRegistry};
pub use hooks::{Hook, HookFn, HookRegistry, HookedNode};
pub use render::render;

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OrigamiError, Result};
use crate::graph::DEFAULT_DONE_NODE;

fn default_done() -> String {
    DEFAULT_DONE_NODE.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// A parsed pipeline declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDef {
    #[serde(rename = "pipeline", default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Zones by name; sorted so rendering and serialization are stable
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zones: BTreeMap<String, ZoneDef>,

    #[serde(default)]
    pub nodes: Vec<NodeDef>,

    /// Declaration order is first-match order at runtime
    #[serde(default)]
    pub edges: Vec<EdgeDef>,

    /// Free-form values for node factories
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, Value>,

    #[serde(default)]
    pub start: String,

    /// Terminal pseudo-node name
    #[serde(default = "default_done")]
    pub done: String,
}

impl Default for PipelineDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            zones: BTreeMap::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            vars: BTreeMap::new(),
            start: String::new(),
            done: default_done(),
        }
    }
}

/// A node declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub element: String,

    /// Factory key; falls back to `name` when unregistered
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub family: String,

    /// Hooks to run, in order, after a successful visit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub after: Vec<String>,
}

impl NodeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_after(mut self, hook: impl Into<String>) -> Self {
        self.after.push(hook.into());
        self
    }
}

/// An edge declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeDef {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub shortcut: bool,

    #[serde(rename = "loop", default, skip_serializing_if = "is_false")]
    pub is_loop: bool,

    /// Human-readable guard; carried as the transition explanation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub condition: String,
}

impl EdgeDef {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn shortcut(mut self) -> Self {
        self.shortcut = true;
        self
    }

    pub fn looping(mut self) -> Self {
        self.is_loop = true;
        self
    }
}

/// A zone declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneDef {
    #[serde(default)]
    pub nodes: Vec<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub element: String,

    /// 0-3
    #[serde(default, skip_serializing_if = "is_zero")]
    pub stickiness: u8,
}

/// Parse a pipeline document. Unknown keys are ignored.
pub fn load_pipeline(data: &[u8]) -> Result<PipelineDef> {
    let def: PipelineDef = serde_yaml::from_slice(data)?;
    tracing::debug!(pipeline = %def.name, nodes = def.nodes.len(), edges = def.edges.len(), "loaded pipeline");
    Ok(def)
}

/// Read and parse a pipeline file
pub fn load_pipeline_file(path: &Path) -> Result<PipelineDef> {
    let data = fs::read(path)?;
    load_pipeline(&data)
}

impl PipelineDef {
    /// Check referential integrity, failing on the first problem found.
    ///
    /// Checks run in a fixed order: pipeline name, node names, edge ids, edge
    /// endpoints, zone members (alphabetical by zone), start node.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(OrigamiError::MissingPipelineName);
        }

        let mut node_names = HashSet::new();
        for node in &self.nodes {
            if node.name.is_empty() {
                return Err(OrigamiError::MissingNodeName);
            }
            if !node_names.insert(node.name.as_str()) {
                return Err(OrigamiError::DuplicateNode(node.name.clone()));
            }
        }

        let mut edge_ids = HashSet::new();
        for edge in &self.edges {
            if edge.id.is_empty() {
                return Err(OrigamiError::MissingEdgeId);
            }
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(OrigamiError::DuplicateEdge(edge.id.clone()));
            }
        }

        for edge in &self.edges {
            if !node_names.contains(edge.from.as_str()) {
                return Err(OrigamiError::UnknownEdgeSource {
                    edge: edge.id.clone(),
                    node: edge.from.clone(),
                });
            }
            if edge.to != self.done && !node_names.contains(edge.to.as_str()) {
                return Err(OrigamiError::UnknownEdgeTarget {
                    edge: edge.id.clone(),
                    node: edge.to.clone(),
                });
            }
        }

        for (zone, def) in &self.zones {
            if let Some(node) = def.nodes.iter().find(|n| !node_names.contains(n.as_str())) {
                return Err(OrigamiError::UnknownZoneNode {
                    zone: zone.clone(),
                    node: node.clone(),
                });
            }
        }

        if self.start.is_empty() {
            return Err(OrigamiError::MissingStart);
        }
        if !node_names.contains(self.start.as_str()) {
            return Err(OrigamiError::UnknownStartNode(self.start.clone()));
        }

        Ok(())
    }

    /// Serialize back to YAML; `load_pipeline` of the output equals `self`
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(OrigamiError::Serialize)
    }

    pub fn node(&self, name: &str) -> Option<&NodeDef> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Name of the zone containing `node`, if any
    pub fn zone_of(&self, node: &str) -> Option<&str> {
        self.zones
            .iter()
            .find(|(_, z)| z.nodes.iter().any(|n| n == node))
            .map(|(name, _)| name.as_str())
    }
}
