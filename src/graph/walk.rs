//! Graph traversal
//!
//! `walk` drives a single walker; `walk_team` picks a walker per node through
//! the team's scheduler. Both share the same per-visit step: process the node,
//! evaluate outgoing edges in definition order (first match wins), record the
//! step, and either complete, fail, or hand back the next node.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{ArtifactRef, Graph, Node, NodeContext};
use crate::error::{OrigamiError, Result};
use crate::id::now_rfc3339;
use crate::observer::{WalkEvent, WalkEventType, WalkObserver, compose_observers, emit};
use crate::scheduler::{SchedulerContext, Team, zone_for_node};
use crate::walker::{Walker, WalkerStatus};

/// Outcome of a single node visit
enum Visit {
    /// Terminal node reached or a node without outgoing edges
    Complete,
    /// Move on to `next`, carrying the artifact forward
    Continue { next: Arc<dyn Node>, artifact: ArtifactRef },
}

impl Graph {
    /// Traverse the graph from `start` with a single walker.
    ///
    /// Completes when a transition targets the terminal node or a node has no
    /// outgoing edges. Any failure sets the walker's status to `error` and
    /// keeps the history recorded so far.
    pub async fn walk(&self, cancel: &CancellationToken, walker: &mut dyn Walker, start: &str) -> Result<()> {
        let obs = self.observer.clone();

        let Some(mut node) = self.node_index.get(start).cloned() else {
            walker.state_mut().status = WalkerStatus::Error;
            let err = OrigamiError::NodeNotFound(format!("start node {:?}", start));
            emit(obs.as_ref(), WalkEvent::new(WalkEventType::WalkError).with_node(start).with_error(&err));
            return Err(err);
        };

        walker.state_mut().current_node = start.to_string();
        let mut prior: Option<ArtifactRef> = None;

        loop {
            if cancel.is_cancelled() {
                walker.state_mut().status = WalkerStatus::Error;
                let err = OrigamiError::Cancelled;
                emit(obs.as_ref(), WalkEvent::new(WalkEventType::WalkError).with_error(&err));
                return Err(err);
            }

            match self.visit(cancel, walker, &node, prior.take(), obs.as_ref()).await? {
                Visit::Complete => return Ok(()),
                Visit::Continue { next, artifact } => {
                    prior = Some(artifact);
                    walker.state_mut().current_node = next.name().to_string();
                    node = next;
                }
            }
        }
    }

    /// Traverse the graph from `start` with a team of walkers.
    ///
    /// Before each node the scheduler picks the walker. Events go to both the
    /// graph-level and team observers. `max_steps > 0` bounds the number of
    /// transitions into real nodes.
    pub async fn walk_team(&self, cancel: &CancellationToken, team: &mut Team, start: &str) -> Result<()> {
        let obs = compose_observers(self.observer.clone(), team.observer().cloned());

        let Some(mut node) = self.node_index.get(start).cloned() else {
            let err = OrigamiError::NodeNotFound(format!("start node {:?}", start));
            emit(obs.as_ref(), WalkEvent::new(WalkEventType::WalkError).with_node(start).with_error(&err));
            return Err(err);
        };

        if team.is_empty() {
            let err = OrigamiError::EmptyTeam;
            emit(obs.as_ref(), WalkEvent::new(WalkEventType::WalkError).with_error(&err));
            return Err(err);
        }

        let max_steps = team.max_steps();
        let mut prior_walker: Option<usize> = None;
        let mut prior_artifact: Option<ArtifactRef> = None;
        let mut steps = 0usize;

        loop {
            if cancel.is_cancelled() {
                let err = OrigamiError::Cancelled;
                fail_last_active(team, prior_walker);
                emit(obs.as_ref(), WalkEvent::new(WalkEventType::WalkError).with_error(&err));
                return Err(err);
            }

            if max_steps > 0 && steps >= max_steps {
                let err = OrigamiError::MaxStepsExceeded {
                    max: max_steps,
                    node: node.name().to_string(),
                };
                fail_last_active(team, prior_walker);
                emit(
                    obs.as_ref(),
                    WalkEvent::new(WalkEventType::WalkError).with_node(node.name()).with_error(&err),
                );
                return Err(err);
            }

            let zone = zone_for_node(node.name(), &self.zones);
            let selected = team.scheduler().select(&SchedulerContext {
                node: node.as_ref(),
                zone,
                walkers: team.walkers(),
                prior_walker,
            });

            let Some(index) = selected.filter(|&i| i < team.len()) else {
                let err = OrigamiError::NoWalkerSelected(node.name().to_string());
                fail_last_active(team, prior_walker);
                emit(
                    obs.as_ref(),
                    WalkEvent::new(WalkEventType::WalkError).with_node(node.name()).with_error(&err),
                );
                return Err(err);
            };

            let persona = team.walkers()[index].identity().persona_name.clone();
            let switched = prior_walker
                .map(|p| team.walkers()[p].identity().persona_name != persona)
                .unwrap_or(true);
            if switched {
                debug!(node = node.name(), walker = %persona, "walker switch");
                emit(
                    obs.as_ref(),
                    WalkEvent::new(WalkEventType::WalkerSwitch)
                        .with_node(node.name())
                        .with_walker(&persona),
                );
            }

            if team.walker(index).is_none() {
                let err = OrigamiError::NoWalkerSelected(node.name().to_string());
                fail_last_active(team, prior_walker);
                emit(
                    obs.as_ref(),
                    WalkEvent::new(WalkEventType::WalkError).with_node(node.name()).with_error(&err),
                );
                return Err(err);
            }
            let Some(walker) = team.walker_mut(index) else {
                return Err(OrigamiError::NoWalkerSelected(node.name().to_string()));
            };

            match self.visit(cancel, walker, &node, prior_artifact.take(), obs.as_ref()).await? {
                Visit::Complete => return Ok(()),
                Visit::Continue { next, artifact } => {
                    prior_artifact = Some(artifact);
                    prior_walker = Some(index);
                    node = next;
                    steps += 1;
                }
            }
        }
    }

    /// Process one node and resolve the transition out of it
    async fn visit(
        &self,
        cancel: &CancellationToken,
        walker: &mut dyn Walker,
        node: &Arc<dyn Node>,
        prior: Option<ArtifactRef>,
        obs: Option<&Arc<dyn WalkObserver>>,
    ) -> Result<Visit> {
        let node_name = node.name().to_string();
        let walker_name = walker.identity().persona_name.clone();
        walker.state_mut().current_node = node_name.clone();

        debug!(node = %node_name, walker = %walker_name, "entering node");
        emit(
            obs,
            WalkEvent::new(WalkEventType::NodeEnter)
                .with_node(&node_name)
                .with_walker(&walker_name),
        );

        let started = Instant::now();
        let result = {
            let mut nc = NodeContext::new(walker.state(), prior);
            walker.handle(cancel, node.as_ref(), &mut nc).await
        };
        let elapsed = started.elapsed();

        let artifact = match result {
            Ok(artifact) => artifact,
            Err(source) => {
                walker.state_mut().status = WalkerStatus::Error;
                emit(
                    obs,
                    WalkEvent::new(WalkEventType::NodeExit)
                        .with_node(&node_name)
                        .with_walker(&walker_name)
                        .with_elapsed(elapsed)
                        .with_error(&source),
                );
                emit(
                    obs,
                    WalkEvent::new(WalkEventType::WalkError)
                        .with_node(&node_name)
                        .with_error(&source),
                );
                return Err(OrigamiError::NodeFailed { node: node_name, source });
            }
        };

        emit(
            obs,
            WalkEvent::new(WalkEventType::NodeExit)
                .with_node(&node_name)
                .with_walker(&walker_name)
                .with_artifact(artifact.clone())
                .with_elapsed(elapsed),
        );

        let edges = self.edges_from(&node_name);
        if edges.is_empty() {
            walker.state_mut().status = WalkerStatus::Done;
            emit(
                obs,
                WalkEvent::new(WalkEventType::WalkComplete)
                    .with_node(&node_name)
                    .with_walker(&walker_name),
            );
            return Ok(Visit::Complete);
        }

        let mut matched = None;
        for edge in edges {
            emit(
                obs,
                WalkEvent::new(WalkEventType::EdgeEvaluate)
                    .with_node(&node_name)
                    .with_edge(edge.id()),
            );
            if let Some(transition) = edge.evaluate(artifact.as_ref(), walker.state_mut()) {
                matched = Some((edge.clone(), transition));
                break;
            }
        }

        let Some((edge, transition)) = matched else {
            walker.state_mut().status = WalkerStatus::Error;
            let err = OrigamiError::NoMatchingEdge {
                node: node_name.clone(),
                artifact_type: artifact.artifact_type().to_string(),
            };
            emit(
                obs,
                WalkEvent::new(WalkEventType::WalkError).with_node(&node_name).with_error(&err),
            );
            return Err(err);
        };

        debug!(node = %node_name, edge = edge.id(), next = %transition.next_node, "transition");
        emit(
            obs,
            WalkEvent::new(WalkEventType::Transition)
                .with_node(&node_name)
                .with_edge(edge.id())
                .with_walker(&walker_name),
        );

        let state = walker.state_mut();
        state.record_step(&node_name, edge.id(), edge.id(), now_rfc3339());
        state.merge_context(&transition.context_additions);

        if transition.next_node == self.done_node {
            state.status = WalkerStatus::Done;
            emit(obs, WalkEvent::new(WalkEventType::WalkComplete).with_walker(&walker_name));
            return Ok(Visit::Complete);
        }

        let Some(next) = self.node_index.get(&transition.next_node).cloned() else {
            state.status = WalkerStatus::Error;
            let err = OrigamiError::DanglingTarget {
                edge: edge.id().to_string(),
                target: transition.next_node.clone(),
            };
            emit(
                obs,
                WalkEvent::new(WalkEventType::WalkError).with_node(&node_name).with_error(&err),
            );
            return Err(err);
        };

        Ok(Visit::Continue { next, artifact })
    }
}

/// Mark the walker that handled the previous node as failed, or the first
/// walker when the failure comes before any visit.
fn fail_last_active(team: &mut Team, prior_walker: Option<usize>) {
    if let Some(walker) = team.walker_mut(prior_walker.unwrap_or(0)) {
        walker.state_mut().status = WalkerStatus::Error;
    }
}
