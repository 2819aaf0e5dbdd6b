//! Walker scheduling for team traversal.
//!
//! This module provides:
//! - **Scheduler**: picks which team walker handles the next node.
//! - **SingleScheduler**: always the same walker; wraps single-walker
//!   behavior in the team API.
//! - **AffinityScheduler**: highest step affinity wins, element match breaks ties.
//! - **Team**: walkers + scheduler + observer + step limit.
//!
//! # Example
//!
//! ```ignore
//! use origami::scheduler::{AffinityScheduler, Team};
//!
//! let mut team = Team::new(AffinityScheduler)
//!     .with_walker(herald)
//!     .with_walker(seeker)
//!     .with_max_steps(50);
//! graph.walk_team(&cancel, &mut team, "recall").await?;
//! ```

mod select;
mod team;

pub use select::{AffinityScheduler, SingleScheduler};
pub use team::Team;

use crate::graph::{Node, Zone};
use crate::walker::Walker;

/// Everything a scheduler needs to pick a walker
pub struct SchedulerContext<'a> {
    pub node: &'a dyn Node,
    /// Zone containing the node, if any
    pub zone: Option<&'a Zone>,
    pub walkers: &'a [Box<dyn Walker>],
    /// Index of the walker that handled the previous node
    pub prior_walker: Option<usize>,
}

/// Selects which walker handles a node
pub trait Scheduler: Send + Sync {
    /// Index into `ctx.walkers`, or `None` when no walker fits
    fn select(&self, ctx: &SchedulerContext<'_>) -> Option<usize>;
}

/// First zone whose member list contains `node`
pub fn zone_for_node<'a>(node: &str, zones: &'a [Zone]) -> Option<&'a Zone> {
    zones.iter().find(|z| z.nodes.iter().any(|n| n == node))
}
