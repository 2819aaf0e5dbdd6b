//! Team: walkers bundled with scheduling and observability

use std::fmt;
use std::sync::Arc;

use super::{Scheduler, SingleScheduler};
use crate::observer::WalkObserver;
use crate::walker::Walker;

/// Multiple walkers coordinated by a scheduler.
///
/// A single-walker team with no observer behaves like `Graph::walk`.
pub struct Team {
    walkers: Vec<Box<dyn Walker>>,
    scheduler: Box<dyn Scheduler>,
    observer: Option<Arc<dyn WalkObserver>>,
    /// 0 = unlimited
    max_steps: usize,
}

impl fmt::Debug for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Team")
            .field(
                "walkers",
                &self.walkers.iter().map(|w| w.identity().persona_name.as_str()).collect::<Vec<_>>(),
            )
            .field("observer", &self.observer.is_some())
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

impl Team {
    /// Create an empty team driven by `scheduler`
    pub fn new(scheduler: impl Scheduler + 'static) -> Self {
        Self {
            walkers: Vec::new(),
            scheduler: Box::new(scheduler),
            observer: None,
            max_steps: 0,
        }
    }

    /// Wrap one walker in a team with a `SingleScheduler`
    pub fn single(walker: impl Walker + 'static) -> Self {
        Self::new(SingleScheduler::new(0)).with_walker(walker)
    }

    pub fn with_walker(mut self, walker: impl Walker + 'static) -> Self {
        self.walkers.push(Box::new(walker));
        self
    }

    pub fn with_boxed_walker(mut self, walker: Box<dyn Walker>) -> Self {
        self.walkers.push(walker);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn WalkObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Engine backstop against unbounded loops; 0 disables it
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn walkers(&self) -> &[Box<dyn Walker>] {
        &self.walkers
    }

    pub fn walker(&self, index: usize) -> Option<&dyn Walker> {
        self.walkers.get(index).map(|w| w.as_ref())
    }

    pub fn walker_mut(&mut self, index: usize) -> Option<&mut (dyn Walker + 'static)> {
        self.walkers.get_mut(index).map(|w| w.as_mut())
    }

    /// Walker whose persona matches `name`
    pub fn walker_by_persona(&self, name: &str) -> Option<&dyn Walker> {
        self.walkers
            .iter()
            .find(|w| w.identity().persona_name == name)
            .map(|w| w.as_ref())
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn observer(&self) -> Option<&Arc<dyn WalkObserver>> {
        self.observer.as_ref()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn len(&self) -> usize {
        self.walkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walkers.is_empty()
    }
}
