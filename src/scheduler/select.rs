//! Built-in schedulers

use super::{Scheduler, SchedulerContext};

/// Always selects the walker at a fixed index
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleScheduler {
    pub index: usize,
}

impl SingleScheduler {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Scheduler for SingleScheduler {
    fn select(&self, ctx: &SchedulerContext<'_>) -> Option<usize> {
        (self.index < ctx.walkers.len()).then_some(self.index)
    }
}

/// Picks the walker with the highest step affinity for the node.
///
/// Strictly higher scores win. On an exact tie, a walker whose element equals
/// the node's element affinity beats one that does not. Falls back to the
/// first walker.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffinityScheduler;

impl Scheduler for AffinityScheduler {
    fn select(&self, ctx: &SchedulerContext<'_>) -> Option<usize> {
        match ctx.walkers.len() {
            0 => return None,
            1 => return Some(0),
            _ => {}
        }

        let node_name = ctx.node.name();
        let node_element = ctx.node.element_affinity();

        let mut best: Option<usize> = None;
        let mut best_score = -1.0_f64;
        let mut best_element_match = false;

        for (i, walker) in ctx.walkers.iter().enumerate() {
            let identity = walker.identity();
            let score = identity.affinity_for(node_name);
            let element_match = node_element.is_some() && identity.element == node_element;

            let better = score > best_score || (score == best_score && element_match && !best_element_match);
            if better {
                best = Some(i);
                best_score = score;
                best_element_match = element_match;
            }
        }

        tracing::debug!(node = node_name, selected = ?best, score = best_score, "affinity selection");
        best.or(Some(0))
    }
}
