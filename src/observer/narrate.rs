//! Human-readable progress narration
//!
//! Turns walk events into short lines ("Entering Triage", "Completed Triage
//! (120ms)") with periodic milestone summaries. Transitions and edge
//! evaluations are high-frequency noise and stay silent.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

use super::vocabulary::{Vocabulary, VocabularyFn};
use super::{WalkEvent, WalkEventType, WalkObserver};

/// Receives a single narration line
pub type NarrationSink = Box<dyn Fn(&str) + Send + Sync>;

/// Snapshot of walk progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub nodes_visited: usize,
    pub elapsed: Duration,
    pub current_node: Option<String>,
    pub last_walker: Option<String>,
    pub errors: usize,
}

#[derive(Default)]
struct NarrationState {
    walk_start: Option<Instant>,
    nodes_visited: usize,
    current_node: Option<String>,
    last_walker: Option<String>,
    errors: usize,
}

impl NarrationState {
    fn elapsed(&self) -> Duration {
        self.walk_start.map(|s| s.elapsed()).unwrap_or_default()
    }
}

/// Observer producing narration lines through a sink
pub struct NarrationObserver {
    vocabulary: Box<dyn Vocabulary>,
    sink: NarrationSink,
    milestone_interval: usize,
    show_eta: bool,
    state: Mutex<NarrationState>,
}

impl Default for NarrationObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl NarrationObserver {
    /// Identity vocabulary, tracing sink, milestone every 5 nodes, ETA on
    pub fn new() -> Self {
        Self {
            vocabulary: Box::new(VocabularyFn(|code: &str| code.to_string())),
            sink: Box::new(|line: &str| info!("{}", line)),
            milestone_interval: 5,
            show_eta: true,
            state: Mutex::new(NarrationState::default()),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: impl Vocabulary + 'static) -> Self {
        self.vocabulary = Box::new(vocabulary);
        self
    }

    pub fn with_sink(mut self, sink: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Emit a milestone every `every` node exits; 0 disables milestones
    pub fn with_milestone_interval(mut self, every: usize) -> Self {
        self.milestone_interval = every;
        self
    }

    /// Include the average time per node in milestones
    pub fn with_eta(mut self, enabled: bool) -> Self {
        self.show_eta = enabled;
        self
    }

    pub fn progress(&self) -> Progress {
        let state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        Progress {
            nodes_visited: state.nodes_visited,
            elapsed: state.elapsed(),
            current_node: state.current_node.clone(),
            last_walker: state.last_walker.clone(),
            errors: state.errors,
        }
    }

    fn emit(&self, line: &str) {
        (self.sink)(line);
    }

    fn milestone(&self, state: &NarrationState) -> String {
        let elapsed = state.elapsed();
        let mut line = format!(
            "--- Progress: {} nodes visited | Elapsed: {}",
            state.nodes_visited,
            format_duration(elapsed)
        );
        if self.show_eta && state.nodes_visited > 0 {
            let avg = elapsed / state.nodes_visited as u32;
            line.push_str(&format!(" | Avg: {}/node", format_duration(avg)));
        }
        if state.errors > 0 {
            line.push_str(&format!(" | Errors: {}", state.errors));
        }
        line.push_str(" ---");
        line
    }
}

impl WalkObserver for NarrationObserver {
    fn on_event(&self, event: &WalkEvent) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let node = event.node.as_deref().unwrap_or("");
        let name = self.vocabulary.name(node);

        match event.event_type {
            WalkEventType::NodeEnter => {
                if state.walk_start.is_none() {
                    state.walk_start = Some(Instant::now());
                }
                state.current_node = event.node.clone();
                match &event.walker {
                    Some(walker) => {
                        state.last_walker = Some(walker.clone());
                        self.emit(&format!("[{}] Entering {}", walker, name));
                    }
                    None => self.emit(&format!("Entering {}", name)),
                }
            }
            WalkEventType::NodeExit => {
                state.nodes_visited += 1;
                if let Some(error) = &event.error {
                    state.errors += 1;
                    self.emit(&format!("Failed at {}: {}", name, error));
                } else if !event.elapsed.is_zero() {
                    self.emit(&format!("Completed {} ({})", name, format_duration(event.elapsed)));
                } else {
                    self.emit(&format!("Completed {}", name));
                }
                if self.milestone_interval > 0 && state.nodes_visited % self.milestone_interval == 0 {
                    let line = self.milestone(&state);
                    self.emit(&line);
                }
            }
            WalkEventType::WalkerSwitch => {
                let walker = event.walker.clone().unwrap_or_default();
                self.emit(&format!("Handing off to {} at {}", walker, name));
                state.last_walker = Some(walker);
            }
            WalkEventType::Transition | WalkEventType::EdgeEvaluate => {}
            WalkEventType::WalkComplete => {
                self.emit(&format!(
                    "Walk complete: {} nodes visited in {}",
                    state.nodes_visited,
                    format_duration(state.elapsed())
                ));
            }
            WalkEventType::WalkError => {
                state.errors += 1;
                let error = event.error.as_deref().unwrap_or("unknown error");
                if node.is_empty() {
                    self.emit(&format!("Walk failed: {}", error));
                } else {
                    self.emit(&format!("Walk failed at {}: {}", name, error));
                }
            }
        }
    }
}

/// `<1s` as `Nms`, `<60s` as `N.Ns`, otherwise `XmYs`
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        return format!("{}ms", d.as_millis());
    }
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        return format!("{:.1}s", secs);
    }
    let whole = d.as_secs();
    format!("{}m{}s", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::MapVocabulary;
    use std::sync::Arc;

    fn narrator(milestone: usize) -> (NarrationObserver, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let obs = NarrationObserver::new()
            .with_milestone_interval(milestone)
            .with_sink(move |line: &str| sink_lines.lock().unwrap().push(line.to_string()));
        (obs, lines)
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
    }

    #[test]
    fn test_enter_and_exit_lines() {
        let (obs, lines) = narrator(0);
        obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node("triage").with_walker("Herald"));
        obs.on_event(
            &WalkEvent::new(WalkEventType::NodeExit)
                .with_node("triage")
                .with_elapsed(Duration::from_millis(120)),
        );
        obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node("resolve"));
        obs.on_event(&WalkEvent::new(WalkEventType::NodeExit).with_node("resolve"));

        let lines = lines.lock().unwrap();
        assert_eq!(lines[0], "[Herald] Entering triage");
        assert_eq!(lines[1], "Completed triage (120ms)");
        assert_eq!(lines[2], "Entering resolve");
        assert_eq!(lines[3], "Completed resolve");
    }

    #[test]
    fn test_vocabulary_translation() {
        let vocab = MapVocabulary::new();
        vocab.register("F1", "Triage");
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink_lines = lines.clone();
        let obs = NarrationObserver::new()
            .with_vocabulary(vocab)
            .with_sink(move |line: &str| sink_lines.lock().unwrap().push(line.to_string()));

        obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node("F1"));
        assert_eq!(lines.lock().unwrap()[0], "Entering Triage");
    }

    #[test]
    fn test_transitions_are_silent() {
        let (obs, lines) = narrator(5);
        obs.on_event(&WalkEvent::new(WalkEventType::EdgeEvaluate).with_node("a").with_edge("E1"));
        obs.on_event(&WalkEvent::new(WalkEventType::Transition).with_node("a").with_edge("E1"));
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_milestone_every_n_exits() {
        let (obs, lines) = narrator(2);
        for node in ["a", "b", "c", "d"] {
            obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node(node));
            obs.on_event(&WalkEvent::new(WalkEventType::NodeExit).with_node(node));
        }
        let lines = lines.lock().unwrap();
        let milestones: Vec<_> = lines.iter().filter(|l| l.starts_with("--- Progress:")).collect();
        assert_eq!(milestones.len(), 2);
        assert!(milestones[0].starts_with("--- Progress: 2 nodes visited | Elapsed: "));
        assert!(milestones[0].contains("| Avg: "));
        assert!(milestones[1].ends_with(" ---"));
    }

    #[test]
    fn test_errors_counted() {
        let (obs, lines) = narrator(1);
        obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node("a"));
        obs.on_event(&WalkEvent::new(WalkEventType::NodeExit).with_node("a").with_error("boom"));
        obs.on_event(&WalkEvent::new(WalkEventType::WalkError).with_node("a").with_error("boom"));

        let lines = lines.lock().unwrap();
        assert_eq!(lines[1], "Failed at a: boom");
        assert!(lines[2].contains("| Errors: 1 ---"));
        assert_eq!(lines[3], "Walk failed at a: boom");
        assert_eq!(obs.progress().errors, 2);
    }

    #[test]
    fn test_walker_switch_and_complete() {
        let (obs, lines) = narrator(0);
        obs.on_event(&WalkEvent::new(WalkEventType::WalkerSwitch).with_node("b").with_walker("Seeker"));
        obs.on_event(&WalkEvent::new(WalkEventType::NodeEnter).with_node("b").with_walker("Seeker"));
        obs.on_event(&WalkEvent::new(WalkEventType::NodeExit).with_node("b"));
        obs.on_event(&WalkEvent::new(WalkEventType::WalkComplete));

        let lines = lines.lock().unwrap();
        assert_eq!(lines[0], "Handing off to Seeker at b");
        assert!(lines[3].starts_with("Walk complete: 1 nodes visited in "));

        let progress = obs.progress();
        assert_eq!(progress.nodes_visited, 1);
        assert_eq!(progress.current_node.as_deref(), Some("b"));
        assert_eq!(progress.last_walker.as_deref(), Some("Seeker"));
    }

    #[test]
    fn test_walk_failed_without_node() {
        let (obs, lines) = narrator(0);
        obs.on_event(&WalkEvent::new(WalkEventType::WalkError).with_error("walk cancelled"));
        assert_eq!(lines.lock().unwrap()[0], "Walk failed: walk cancelled");
    }
}
