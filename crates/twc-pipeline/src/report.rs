use std::time::Duration;

use serde::Serialize;
use twc_merge::{MergedTree, OverlayStats};
use twc_types::{Precedence, SourceKind};

use crate::combobulator::ExecutionMode;
use crate::phase::PipelinePhase;

/// What happened to one layer during a run.
#[derive(Clone, Debug, Serialize)]
pub struct LayerReport {
    /// Position of the layer in the configuration.
    pub index: usize,
    pub location: String,
    pub kind: SourceKind,
    /// Entries the resolver returned.
    pub resolved: usize,
    /// Keys removed by the layer's exclusions, sorted.
    pub excluded: Vec<String>,
    /// Counts from folding the filtered layer into the accumulator.
    pub overlay: OverlayStats,
    /// Entries of the final tree that came from this layer.
    pub contributed: usize,
    /// Time spent resolving and filtering.
    pub elapsed: Duration,
}

/// The outcome of a successful run.
#[derive(Clone, Debug)]
pub struct PipelineReport {
    pub merged: MergedTree,
    /// Per-layer reports in combination order.
    pub layers: Vec<LayerReport>,
    pub precedence: Precedence,
    pub mode: ExecutionMode,
    /// Phases the run passed through, starting at `Idle`.
    pub phases: Vec<PipelinePhase>,
    pub elapsed: Duration,
}

impl PipelineReport {
    /// Report for the layer at declared position `index`.
    pub fn layer(&self, index: usize) -> Option<&LayerReport> {
        self.layers.iter().find(|l| l.index == index)
    }

    /// Total number of keys removed by exclusions across all layers.
    pub fn excluded_count(&self) -> usize {
        self.layers.iter().map(|l| l.excluded.len()).sum()
    }
}
