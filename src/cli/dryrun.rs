//! Dry-run walks: every node passes its input straight through, so a walk
//! exercises only the pipeline's structure, scheduling, and narration.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::{Result, eyre};
use origami::element::{Element, persona_by_name};
use origami::error::BoxError;
use origami::graph::{ArtifactRef, Node, NodeContext, StaticArtifact};
use origami::observer::NarrationObserver;
use origami::pipeline::{GraphRegistries, NodeDef, NodeRegistry, PipelineDef};
use origami::scheduler::{AffinityScheduler, Team};
use origami::walker::{ProcessWalker, Walker};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Node that produces a fixed artifact naming itself
pub struct PassthroughNode {
    name: String,
    element: Option<Element>,
}

impl PassthroughNode {
    pub fn from_def(def: &NodeDef) -> Self {
        Self {
            name: def.name.clone(),
            element: def.element.parse().ok(),
        }
    }
}

#[async_trait]
impl Node for PassthroughNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn element_affinity(&self) -> Option<Element> {
        self.element
    }

    async fn process(
        &self,
        _cancel: &CancellationToken,
        nc: &mut NodeContext<'_>,
    ) -> std::result::Result<ArtifactRef, BoxError> {
        let prior = nc.prior_artifact.as_ref().map(|a| a.artifact_type().to_string());
        Ok(Arc::new(
            StaticArtifact::new("passthrough", 1.0).with_raw(json!({ "node": self.name, "prior": prior })),
        ))
    }
}

/// One walker's share of a dry run
#[derive(Debug)]
pub struct WalkerReport {
    pub persona: String,
    pub path: Vec<String>,
}

/// Summary of a dry run
#[derive(Debug)]
pub struct DryRunReport {
    pub steps: usize,
    pub walkers: Vec<WalkerReport>,
}

/// Registries that satisfy every node with a [`PassthroughNode`]
pub fn passthrough_registries() -> GraphRegistries {
    GraphRegistries::new(
        NodeRegistry::new().with_fallback(|def: &NodeDef| Arc::new(PassthroughNode::from_def(def)) as Arc<dyn Node>),
    )
}

/// Build a team from persona names; unknown names are an error
pub fn build_team(personas: &[String], max_steps: usize) -> Result<Team> {
    let mut team = Team::new(AffinityScheduler).with_max_steps(max_steps);
    for name in personas {
        let persona = persona_by_name(name).ok_or_else(|| eyre!("Unknown persona: {}", name))?;
        team = team.with_walker(ProcessWalker::new(persona.identity));
    }
    Ok(team)
}

/// Walk `def` with passthrough nodes and a persona team, narrating to stdout
pub async fn dry_run(
    def: &PipelineDef,
    config: &Config,
    start: Option<&str>,
    max_steps: Option<usize>,
    personas: &[String],
) -> Result<DryRunReport> {
    let graph = def.build_graph(&passthrough_registries())?;

    let personas = if personas.is_empty() {
        config.walk.personas.as_slice()
    } else {
        personas
    };
    let narration = NarrationObserver::new()
        .with_sink(|line: &str| println!("  {}", line))
        .with_milestone_interval(config.narration.milestone_interval)
        .with_eta(config.narration.show_eta);
    let mut team = build_team(personas, max_steps.unwrap_or(config.walk.max_steps))?.with_observer(Arc::new(narration));

    let start = start.unwrap_or(&def.start);
    log::info!("Dry-running {} from {} with {} walkers", def.name, start, team.len());
    graph.walk_team(&CancellationToken::new(), &mut team, start).await?;

    let walkers: Vec<WalkerReport> = team
        .walkers()
        .iter()
        .map(|w| WalkerReport {
            persona: w.identity().persona_name.clone(),
            path: w.state().path().into_iter().map(String::from).collect(),
        })
        .collect();
    let steps = walkers.iter().map(|w| w.path.len()).sum();

    Ok(DryRunReport { steps, walkers })
}
