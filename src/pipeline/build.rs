//! Graph construction from a pipeline declaration

use std::collections::HashMap;
use std::sync::Arc;

use super::{EdgeDef, HookRegistry, HookedNode, NodeDef, PipelineDef};
use crate::element::Element;
use crate::error::{OrigamiError, Result};
use crate::graph::{Artifact, Edge, Graph, GraphOptions, Node, Transition, Zone};
use crate::walker::WalkerState;

/// Builds a runtime node from its declaration
pub type NodeFactoryFn = Arc<dyn Fn(&NodeDef) -> Arc<dyn Node> + Send + Sync>;

/// Builds a runtime edge from its declaration
pub type EdgeFactoryFn = Arc<dyn Fn(&EdgeDef) -> Arc<dyn Edge> + Send + Sync>;

/// Node factories keyed by family or node name
#[derive(Default, Clone)]
pub struct NodeRegistry {
    factories: HashMap<String, NodeFactoryFn>,
    fallback: Option<NodeFactoryFn>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a family (or a node name)
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&NodeDef) -> Arc<dyn Node> + Send + Sync + 'static,
    {
        self.factories.insert(key.into(), Arc::new(factory));
        self
    }

    /// Factory used when neither family nor name is registered
    pub fn with_fallback<F>(mut self, factory: F) -> Self
    where
        F: Fn(&NodeDef) -> Arc<dyn Node> + Send + Sync + 'static,
    {
        self.fallback = Some(Arc::new(factory));
        self
    }

    /// Family first, then node name, then the fallback
    pub fn resolve(&self, def: &NodeDef) -> Option<&NodeFactoryFn> {
        let by_family = (!def.family.is_empty())
            .then(|| self.factories.get(&def.family))
            .flatten();
        by_family
            .or_else(|| self.factories.get(&def.name))
            .or(self.fallback.as_ref())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Edge factories keyed by edge id
#[derive(Default, Clone)]
pub struct EdgeFactory {
    factories: HashMap<String, EdgeFactoryFn>,
}

impl EdgeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, edge_id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&EdgeDef) -> Arc<dyn Edge> + Send + Sync + 'static,
    {
        self.factories.insert(edge_id.into(), Arc::new(factory));
        self
    }

    /// Registered factory output, or a [`DslEdge`] for unregistered ids
    pub fn build(&self, def: &EdgeDef) -> Arc<dyn Edge> {
        match self.factories.get(&def.id) {
            Some(factory) => factory(def),
            None => Arc::new(DslEdge::new(def.clone())),
        }
    }
}

/// Passthrough edge built from declaration metadata alone.
///
/// Always matches; the transition targets `to` and carries the declared
/// condition as its explanation.
#[derive(Debug, Clone)]
pub struct DslEdge {
    def: EdgeDef,
}

impl DslEdge {
    pub fn new(def: EdgeDef) -> Self {
        Self { def }
    }
}

impl Edge for DslEdge {
    fn id(&self) -> &str {
        &self.def.id
    }

    fn from(&self) -> &str {
        &self.def.from
    }

    fn to(&self) -> &str {
        &self.def.to
    }

    fn is_shortcut(&self) -> bool {
        self.def.shortcut
    }

    fn is_loop(&self) -> bool {
        self.def.is_loop
    }

    fn evaluate(&self, _artifact: &dyn Artifact, _state: &mut WalkerState) -> Option<Transition> {
        Some(Transition::to(&self.def.to).with_explanation(&self.def.condition))
    }
}

/// Everything `build_graph` needs to turn declarations into runtime objects
#[derive(Default, Clone)]
pub struct GraphRegistries {
    pub nodes: NodeRegistry,
    pub edges: EdgeFactory,
    pub hooks: HookRegistry,
}

impl GraphRegistries {
    pub fn new(nodes: NodeRegistry) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub fn with_edges(mut self, edges: EdgeFactory) -> Self {
        self.edges = edges;
        self
    }

    pub fn with_hooks(mut self, hooks: HookRegistry) -> Self {
        self.hooks = hooks;
        self
    }
}

fn parse_element(s: &str) -> Result<Option<Element>> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse().map(Some)
}

impl PipelineDef {
    /// Validate, then build an executable graph using `registries`.
    ///
    /// Nodes declaring `after` hooks are wrapped in a [`HookedNode`]. The
    /// pipeline's `done` marker becomes the graph's terminal node.
    pub fn build_graph(&self, registries: &GraphRegistries) -> Result<Graph> {
        self.validate()?;

        let mut nodes: Vec<Arc<dyn Node>> = Vec::with_capacity(self.nodes.len());
        for def in &self.nodes {
            let factory = registries
                .nodes
                .resolve(def)
                .ok_or_else(|| OrigamiError::MissingNodeFactory {
                    family: def.family.clone(),
                    node: def.name.clone(),
                })?;
            parse_element(&def.element)?;
            let node = factory(def);

            if def.after.is_empty() {
                nodes.push(node);
                continue;
            }

            let hooks = def
                .after
                .iter()
                .map(|name| {
                    registries.hooks.get(name).ok_or_else(|| OrigamiError::UnknownHook {
                        node: def.name.clone(),
                        hook: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            nodes.push(Arc::new(HookedNode::new(node, hooks)));
        }

        let edges: Vec<Arc<dyn Edge>> = self.edges.iter().map(|def| registries.edges.build(def)).collect();

        let zones = self
            .zones
            .iter()
            .map(|(name, def)| -> Result<Zone> {
                let mut zone = Zone::new(name.clone(), def.nodes.clone()).with_stickiness(def.stickiness);
                zone.element = parse_element(&def.element)?;
                Ok(zone)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(pipeline = %self.name, nodes = nodes.len(), edges = edges.len(), zones = zones.len(), "building graph");
        Graph::with_options(
            self.name.clone(),
            nodes,
            edges,
            zones,
            GraphOptions::new().with_done_node(self.done.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::graph::{ArtifactRef, NodeContext, StaticArtifact};
    use crate::pipeline::{HookFn, load_pipeline};
    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    struct DefNode {
        name: String,
        element: Option<Element>,
        tag: &'static str,
    }

    #[async_trait]
    impl Node for DefNode {
        fn name(&self) -> &str {
            &self.name
        }

        fn element_affinity(&self) -> Option<Element> {
            self.element
        }

        async fn process(&self, _cancel: &CancellationToken, _nc: &mut NodeContext<'_>) -> std::result::Result<ArtifactRef, BoxError> {
            Ok(Arc::new(StaticArtifact::new(self.tag, 1.0)))
        }
    }

    fn factory(tag: &'static str) -> impl Fn(&NodeDef) -> Arc<dyn Node> + Send + Sync + 'static {
        move |def: &NodeDef| {
            Arc::new(DefNode {
                name: def.name.clone(),
                element: def.element.parse().ok(),
                tag,
            }) as Arc<dyn Node>
        }
    }

    const YAML: &str = r#"
pipeline: test-pipe
zones:
  front:
    nodes: [a]
    element: fire
    stickiness: 1
nodes:
  - name: a
    element: fire
    family: start
  - name: b
    element: water
    family: finish
edges:
  - id: E1
    name: a-to-b
    from: a
    to: b
    condition: always
  - id: E2
    name: b-to-done
    from: b
    to: _done
    loop: true
start: a
"#;

    fn registries() -> GraphRegistries {
        let mut nodes = NodeRegistry::new();
        nodes.register("start", factory("start")).register("finish", factory("finish"));
        GraphRegistries::new(nodes)
    }

    #[test]
    fn test_build_graph() {
        let def = load_pipeline(YAML.as_bytes()).unwrap();
        let graph = def.build_graph(&registries()).unwrap();

        assert_eq!(graph.name(), "test-pipe");
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.done_node(), "_done");
        assert_eq!(graph.node_by_name("b").unwrap().element_affinity(), Some(Element::Water));
        assert_eq!(graph.zones()[0].element, Some(Element::Fire));
        assert_eq!(graph.zones()[0].stickiness, 1);

        let e2 = &graph.edges_from("b")[0];
        assert!(e2.is_loop());
        assert!(!e2.is_shortcut());
    }

    #[test]
    fn test_dsl_edge_always_matches() {
        let edge = DslEdge::new(EdgeDef::new("E1", "a", "b").with_condition("confidence >= 0.8"));
        let mut state = WalkerState::new("w");
        let t = edge.evaluate(&StaticArtifact::new("anything", 0.0), &mut state).unwrap();
        assert_eq!(t.next_node, "b");
        assert_eq!(t.explanation, "confidence >= 0.8");
    }

    async fn resolved_tag(nodes: &NodeRegistry, def: &NodeDef) -> String {
        let node = nodes.resolve(def).map(|f| f(def)).unwrap();
        let state = WalkerState::new("w");
        let mut nc = NodeContext::new(&state, None);
        let artifact = node.process(&CancellationToken::new(), &mut nc).await.unwrap();
        artifact.artifact_type().to_string()
    }

    #[tokio::test]
    async fn test_factory_lookup_order() {
        let mut nodes = NodeRegistry::new();
        nodes.register("fam", factory("family")).register("a", factory("name"));
        let nodes = nodes.with_fallback(factory("fallback"));

        assert_eq!(resolved_tag(&nodes, &NodeDef::new("a").with_family("fam")).await, "family");
        assert_eq!(resolved_tag(&nodes, &NodeDef::new("a").with_family("other")).await, "name");
        assert_eq!(resolved_tag(&nodes, &NodeDef::new("zzz")).await, "fallback");
        assert!(NodeRegistry::new().resolve(&NodeDef::new("zzz")).is_none());
    }

    #[test]
    fn test_missing_factory() {
        let def = load_pipeline(YAML.as_bytes()).unwrap();
        let mut nodes = NodeRegistry::new();
        nodes.register("start", factory("start"));
        let err = def.build_graph(&GraphRegistries::new(nodes)).unwrap_err();
        assert!(matches!(err, OrigamiError::MissingNodeFactory { ref family, ref node } if family == "finish" && node == "b"));
    }

    #[test]
    fn test_unknown_element() {
        let mut def = load_pipeline(YAML.as_bytes()).unwrap();
        def.nodes[0].element = "plasma".into();
        let err = def.build_graph(&registries()).unwrap_err();
        assert!(matches!(err, OrigamiError::UnknownElement(ref e) if e == "plasma"));
    }

    #[test]
    fn test_build_validates_first() {
        let mut def = load_pipeline(YAML.as_bytes()).unwrap();
        def.start = "ghost".into();
        assert!(matches!(def.build_graph(&registries()), Err(OrigamiError::UnknownStartNode(_))));
    }

    #[test]
    fn test_after_hooks() {
        let mut def = load_pipeline(YAML.as_bytes()).unwrap();
        def.nodes[1].after.push("audit".into());

        let err = def.build_graph(&registries()).unwrap_err();
        assert!(matches!(err, OrigamiError::UnknownHook { ref node, ref hook } if node == "b" && hook == "audit"));

        let mut hooks = HookRegistry::new();
        hooks.register(Arc::new(HookFn::new("audit", |_: &str, _: &dyn Artifact| Ok(()))));
        let graph = def.build_graph(&registries().with_hooks(hooks)).unwrap();
        assert_eq!(graph.node_by_name("b").unwrap().name(), "b");
    }

    #[test]
    fn test_custom_edge_factory() {
        struct Never;
        impl Edge for Never {
            fn id(&self) -> &str {
                "E1"
            }
            fn from(&self) -> &str {
                "a"
            }
            fn to(&self) -> &str {
                "b"
            }
            fn evaluate(&self, _: &dyn Artifact, _: &mut WalkerState) -> Option<Transition> {
                None
            }
        }

        let def = load_pipeline(YAML.as_bytes()).unwrap();
        let mut edges = EdgeFactory::new();
        edges.register("E1", |_: &EdgeDef| Arc::new(Never) as Arc<dyn Edge>);
        let graph = def.build_graph(&registries().with_edges(edges)).unwrap();

        let mut state = WalkerState::new("w");
        let e1 = &graph.edges_from("a")[0];
        assert!(e1.evaluate(&StaticArtifact::new("x", 1.0), &mut state).is_none());
    }
}
