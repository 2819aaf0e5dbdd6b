//! Walk integration tests
//!
//! End-to-end traversals over small graphs: event accounting, first-match
//! edge selection, team scheduling, step limits, and DSL-built graphs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use origami::element::Element;
use origami::error::{BoxError, OrigamiError};
use origami::graph::{Artifact, ArtifactRef, Edge, Graph, GraphOptions, Node, NodeContext, StaticArtifact, Transition};
use origami::observer::{TraceCollector, WalkEventType};
use origami::pipeline::{GraphRegistries, NodeDef, NodeRegistry, load_pipeline};
use origami::scheduler::{AffinityScheduler, Team};
use origami::walker::{AgentIdentity, ProcessWalker, Walker, WalkerState, WalkerStatus};
use tokio_util::sync::CancellationToken;

struct TypedNode {
    name: String,
    element: Option<Element>,
    artifact_type: &'static str,
}

impl TypedNode {
    fn new(name: &str, artifact_type: &'static str) -> Arc<dyn Node> {
        Arc::new(Self {
            name: name.to_string(),
            element: None,
            artifact_type,
        })
    }

    fn with_element(name: &str, element: Element) -> Arc<dyn Node> {
        Arc::new(Self {
            name: name.to_string(),
            element: Some(element),
            artifact_type: "ok",
        })
    }
}

#[async_trait]
impl Node for TypedNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn element_affinity(&self) -> Option<Element> {
        self.element
    }

    async fn process(&self, _cancel: &CancellationToken, _nc: &mut NodeContext<'_>) -> Result<ArtifactRef, BoxError> {
        Ok(Arc::new(StaticArtifact::new(self.artifact_type, 0.9)))
    }
}

/// Fires when the artifact type matches, or always when `when` is `None`
struct MatchEdge {
    id: String,
    from: String,
    to: String,
    when: Option<&'static str>,
}

impl MatchEdge {
    fn always(id: &str, from: &str, to: &str) -> Arc<dyn Edge> {
        Arc::new(Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            when: None,
        })
    }

    fn on(id: &str, from: &str, to: &str, when: &'static str) -> Arc<dyn Edge> {
        Arc::new(Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            when: Some(when),
        })
    }
}

impl Edge for MatchEdge {
    fn id(&self) -> &str {
        &self.id
    }

    fn from(&self) -> &str {
        &self.from
    }

    fn to(&self) -> &str {
        &self.to
    }

    fn evaluate(&self, artifact: &dyn Artifact, _state: &mut WalkerState) -> Option<Transition> {
        match self.when {
            Some(t) if t != artifact.artifact_type() => None,
            _ => Some(Transition::to(&self.to).with_context(format!("via_{}", self.id), serde_json::json!(true))),
        }
    }
}

fn walker(id: &str) -> ProcessWalker {
    ProcessWalker::with_id(AgentIdentity::new("Solo"), id)
}

#[tokio::test]
async fn test_two_node_walk_event_counts() {
    let trace = Arc::new(TraceCollector::new());
    let graph = Graph::with_options(
        "ab",
        vec![TypedNode::new("A", "ok"), TypedNode::new("B", "ok")],
        vec![MatchEdge::always("E1", "A", "B"), MatchEdge::always("E2", "B", "_done")],
        vec![],
        GraphOptions::new().with_observer(trace.clone()),
    )
    .unwrap();

    let mut w = walker("w1");
    graph.walk(&CancellationToken::new(), &mut w, "A").await.unwrap();

    let count = |t| trace.events_of_type(t).len();
    assert_eq!(count(WalkEventType::NodeEnter), 2);
    assert_eq!(count(WalkEventType::NodeExit), 2);
    assert_eq!(count(WalkEventType::EdgeEvaluate), 2);
    assert_eq!(count(WalkEventType::Transition), 2);
    assert_eq!(count(WalkEventType::WalkComplete), 1);
    assert_eq!(count(WalkEventType::WalkError), 0);

    let state = w.state();
    assert_eq!(state.status, WalkerStatus::Done);
    assert_eq!(state.history.len(), 2);
    assert_eq!(state.path(), vec!["A", "B"]);
    assert_eq!(state.context.get("via_E1"), Some(&serde_json::json!(true)));
    assert_eq!(state.context.get("via_E2"), Some(&serde_json::json!(true)));
}

#[tokio::test]
async fn test_first_matching_edge_wins() {
    let graph = Graph::new(
        "fork",
        vec![
            TypedNode::new("triage", "bug"),
            TypedNode::new("fix", "ok"),
            TypedNode::new("skip", "ok"),
        ],
        vec![
            MatchEdge::on("E1", "triage", "skip", "flake"),
            MatchEdge::on("E2", "triage", "fix", "bug"),
            MatchEdge::always("E3", "triage", "skip"),
            MatchEdge::always("E4", "fix", "_done"),
            MatchEdge::always("E5", "skip", "_done"),
        ],
        vec![],
    )
    .unwrap();

    let mut w = walker("w1");
    graph.walk(&CancellationToken::new(), &mut w, "triage").await.unwrap();

    let edges: Vec<_> = w.state().history.iter().map(|s| s.edge_id.as_str()).collect();
    assert_eq!(edges, vec!["E2", "E4"]);
    assert_eq!(w.state().path(), vec!["triage", "fix"]);
}

#[tokio::test]
async fn test_no_matching_edge_fails_with_history() {
    let graph = Graph::new(
        "stuck",
        vec![TypedNode::new("a", "ok"), TypedNode::new("b", "weird")],
        vec![MatchEdge::always("E1", "a", "b"), MatchEdge::on("E2", "b", "_done", "ok")],
        vec![],
    )
    .unwrap();

    let mut w = walker("w1");
    let err = graph.walk(&CancellationToken::new(), &mut w, "a").await.unwrap_err();
    assert!(matches!(err, OrigamiError::NoMatchingEdge { ref node, ref artifact_type } if node == "b" && artifact_type == "weird"));
    assert_eq!(w.state().status, WalkerStatus::Error);
    assert_eq!(w.state().history.len(), 1);
}

#[tokio::test]
async fn test_team_routes_by_affinity() {
    let graph = Graph::new(
        "team",
        vec![
            TypedNode::with_element("recall", Element::Fire),
            TypedNode::with_element("investigate", Element::Water),
        ],
        vec![
            MatchEdge::always("E1", "recall", "investigate"),
            MatchEdge::always("E2", "investigate", "_done"),
        ],
        vec![],
    )
    .unwrap();

    let herald = AgentIdentity::new("Herald")
        .with_element(Element::Fire)
        .with_affinity("recall", 0.9)
        .with_affinity("investigate", 0.1);
    let seeker = AgentIdentity::new("Seeker")
        .with_element(Element::Water)
        .with_affinity("recall", 0.1)
        .with_affinity("investigate", 0.9);

    let trace = Arc::new(TraceCollector::new());
    let mut team = Team::new(AffinityScheduler)
        .with_walker(ProcessWalker::with_id(herald, "h"))
        .with_walker(ProcessWalker::with_id(seeker, "s"))
        .with_observer(trace.clone());

    graph.walk_team(&CancellationToken::new(), &mut team, "recall").await.unwrap();

    assert_eq!(team.walker_by_persona("Herald").unwrap().state().path(), vec!["recall"]);
    assert_eq!(team.walker_by_persona("Seeker").unwrap().state().path(), vec!["investigate"]);

    let switches: Vec<_> = trace
        .events_of_type(WalkEventType::WalkerSwitch)
        .into_iter()
        .filter_map(|e| e.walker)
        .collect();
    assert_eq!(switches, vec!["Herald", "Seeker"]);
    assert_eq!(trace.events_of_type(WalkEventType::WalkComplete).len(), 1);
}

#[tokio::test]
async fn test_team_step_limit_on_self_loop() {
    let graph = Graph::new(
        "spin",
        vec![TypedNode::new("spin", "ok")],
        vec![MatchEdge::always("L1", "spin", "spin")],
        vec![],
    )
    .unwrap();

    let mut team = Team::single(walker("w1")).with_max_steps(3);
    let err = graph
        .walk_team(&CancellationToken::new(), &mut team, "spin")
        .await
        .unwrap_err();

    assert!(matches!(err, OrigamiError::MaxStepsExceeded { max: 3, .. }));
    let state = team.walker(0).unwrap().state();
    assert_eq!(state.history.len(), 3);
    assert_eq!(state.status, WalkerStatus::Error);
}

#[tokio::test]
async fn test_empty_team_and_unknown_start() {
    let graph = Graph::new("g", vec![TypedNode::new("a", "ok")], vec![], vec![]).unwrap();

    let mut empty = Team::new(AffinityScheduler);
    let err = graph.walk_team(&CancellationToken::new(), &mut empty, "a").await.unwrap_err();
    assert!(matches!(err, OrigamiError::EmptyTeam));

    let mut w = walker("w1");
    let err = graph.walk(&CancellationToken::new(), &mut w, "nowhere").await.unwrap_err();
    assert!(matches!(err, OrigamiError::NodeNotFound(_)));
}

#[tokio::test]
async fn test_cancelled_walk() {
    let graph = Graph::new(
        "g",
        vec![TypedNode::new("a", "ok")],
        vec![MatchEdge::always("E1", "a", "_done")],
        vec![],
    )
    .unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut w = walker("w1");
    let err = graph.walk(&cancel, &mut w, "a").await.unwrap_err();
    assert!(matches!(err, OrigamiError::Cancelled));
    assert!(w.state().history.is_empty());
    assert_eq!(w.state().status, WalkerStatus::Error);
}

#[tokio::test]
async fn test_dsl_built_graph_walk() {
    let yaml = r#"
pipeline: test-pipe
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
  - id: E2
    name: b-to-done
    from: b
    to: _done
start: a
done: _done
"#;
    let def = load_pipeline(yaml.as_bytes()).unwrap();

    let mut families: HashMap<&str, &'static str> = HashMap::new();
    families.insert("start", "started");
    families.insert("finish", "finished");
    let mut nodes = NodeRegistry::new();
    for (family, artifact_type) in families {
        nodes.register(family, move |def: &NodeDef| TypedNode::new(&def.name, artifact_type));
    }
    let graph = def.build_graph(&GraphRegistries::new(nodes)).unwrap();

    let mut w = walker("w1");
    graph.walk(&CancellationToken::new(), &mut w, &def.start).await.unwrap();

    let steps: Vec<_> = w
        .state()
        .history
        .iter()
        .map(|s| (s.node.as_str(), s.edge_id.as_str()))
        .collect();
    assert_eq!(steps, vec![("a", "E1"), ("b", "E2")]);
    assert_eq!(w.state().status, WalkerStatus::Done);
}
