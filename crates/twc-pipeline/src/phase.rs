use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Where a pipeline run currently is.
///
/// ```text
/// Idle -> Validating -> Resolving -> [Filtering] -> Merging -> Done
///                          ^                          |  \
///                          +------- next layer -------+   Building -> Done
/// ```
///
/// Every non-terminal phase may move to `Failed`. `Done` and `Failed` are
/// terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelinePhase {
    Idle,
    Validating,
    Resolving,
    Filtering,
    Merging,
    Building,
    Done,
    Failed,
}

impl PipelinePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether the run may move from `self` to `next`.
    pub fn can_transition_to(&self, next: PipelinePhase) -> bool {
        use PipelinePhase::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Validating) => true,
            (Validating, Resolving) => true,
            (Resolving, Filtering) | (Resolving, Merging) => true,
            (Filtering, Merging) => true,
            (Merging, Resolving) | (Merging, Building) | (Merging, Done) => true,
            (Building, Done) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Resolving => "resolving",
            Self::Filtering => "filtering",
            Self::Merging => "merging",
            Self::Building => "building",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The phase history of a single run.
#[derive(Clone, Debug)]
pub(crate) struct PhaseTracker {
    history: Vec<PipelinePhase>,
}

impl PhaseTracker {
    pub(crate) fn new() -> Self {
        Self {
            history: vec![PipelinePhase::Idle],
        }
    }

    pub(crate) fn current(&self) -> PipelinePhase {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelinePhase::Idle)
    }

    pub(crate) fn advance(&mut self, next: PipelinePhase) {
        let current = self.current();
        debug_assert!(
            current.can_transition_to(next),
            "illegal pipeline transition {current} -> {next}"
        );
        trace!(from = %current, to = %next, "pipeline phase");
        self.history.push(next);
    }

    pub(crate) fn into_history(self) -> Vec<PipelinePhase> {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelinePhase::*;

    #[test]
    fn happy_path_is_legal() {
        let path = [Idle, Validating, Resolving, Filtering, Merging, Resolving, Merging, Done];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn terminal_phases_go_nowhere() {
        for next in [Idle, Validating, Resolving, Merging, Building, Done, Failed] {
            assert!(!Done.can_transition_to(next));
            assert!(!Failed.can_transition_to(next));
        }
    }

    #[test]
    fn any_live_phase_can_fail() {
        for from in [Idle, Validating, Resolving, Filtering, Merging, Building] {
            assert!(from.can_transition_to(Failed));
        }
    }

    #[test]
    fn layers_cannot_be_merged_before_resolution() {
        assert!(!Validating.can_transition_to(Merging));
        assert!(!Idle.can_transition_to(Resolving));
        assert!(!Filtering.can_transition_to(Done));
    }

    #[test]
    fn tracker_records_history() {
        let mut tracker = PhaseTracker::new();
        tracker.advance(Validating);
        tracker.advance(Failed);
        assert_eq!(tracker.current(), Failed);
        assert_eq!(tracker.into_history(), vec![Idle, Validating, Failed]);
    }
}
