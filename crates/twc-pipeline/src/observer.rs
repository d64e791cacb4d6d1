use std::sync::Mutex;

use tracing::{debug, info, warn};
use twc_merge::OverlayStats;
use twc_types::LayerSpec;

use crate::error::PipelineError;
use crate::report::PipelineReport;

/// Receives progress notifications from a pipeline run.
///
/// All methods default to doing nothing. In [`ExecutionMode::Prefetch`]
/// `layer_started` and `exclusions_applied` are called from worker threads
/// and may arrive in any order; `layer_merged` always follows combination
/// order.
///
/// [`ExecutionMode::Prefetch`]: crate::ExecutionMode::Prefetch
pub trait PipelineObserver: Send + Sync {
    fn layer_started(&self, _index: usize, _layer: &LayerSpec) {}

    /// Called only for layers with a non-empty exclusion set.
    fn exclusions_applied(&self, _index: usize, _removed: &[String]) {}

    fn layer_merged(&self, _index: usize, _stats: &OverlayStats) {}

    fn pipeline_finished(&self, _report: &PipelineReport) {}

    fn pipeline_failed(&self, _error: &PipelineError) {}
}

/// Ignores every notification.
pub struct NoOpObserver;

impl PipelineObserver for NoOpObserver {}

/// Emits each notification as a `tracing` event.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn layer_started(&self, index: usize, layer: &LayerSpec) {
        info!(
            layer = index,
            source = %layer.source.location,
            kind = %layer.source.kind,
            "fetching layer"
        );
    }

    fn exclusions_applied(&self, index: usize, removed: &[String]) {
        debug!(layer = index, removed = removed.len(), keys = ?removed, "exclusions applied");
    }

    fn layer_merged(&self, index: usize, stats: &OverlayStats) {
        info!(
            layer = index,
            added = stats.added,
            replaced = stats.replaced,
            "layer merged"
        );
    }

    fn pipeline_finished(&self, report: &PipelineReport) {
        info!(
            layers = report.layers.len(),
            entries = report.merged.len(),
            digest = %report.merged.digest().short_hex(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "merge complete"
        );
    }

    fn pipeline_failed(&self, error: &PipelineError) {
        warn!(phase = %error.phase(), error = %error, "pipeline failed");
    }
}

/// A notification captured by [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObserverEvent {
    LayerStarted { index: usize, location: String },
    ExclusionsApplied { index: usize, removed: Vec<String> },
    LayerMerged { index: usize, stats: OverlayStats },
    Finished { entries: usize },
    Failed { message: String },
}

/// Keeps every notification in memory, in arrival order.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObserverEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Declared indices of `layer_merged` notifications, in arrival order.
    pub fn merged_layers(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObserverEvent::LayerMerged { index, .. } => Some(index),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ObserverEvent) {
        self.events.lock().expect("lock poisoned").push(event);
    }
}

impl PipelineObserver for RecordingObserver {
    fn layer_started(&self, index: usize, layer: &LayerSpec) {
        self.push(ObserverEvent::LayerStarted {
            index,
            location: layer.source.location.clone(),
        });
    }

    fn exclusions_applied(&self, index: usize, removed: &[String]) {
        self.push(ObserverEvent::ExclusionsApplied {
            index,
            removed: removed.to_vec(),
        });
    }

    fn layer_merged(&self, index: usize, stats: &OverlayStats) {
        self.push(ObserverEvent::LayerMerged {
            index,
            stats: *stats,
        });
    }

    fn pipeline_finished(&self, report: &PipelineReport) {
        self.push(ObserverEvent::Finished {
            entries: report.merged.len(),
        });
    }

    fn pipeline_failed(&self, error: &PipelineError) {
        self.push(ObserverEvent::Failed {
            message: error.to_string(),
        });
    }
}

impl std::fmt::Debug for RecordingObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingObserver")
            .field("events", &self.events().len())
            .finish()
    }
}
