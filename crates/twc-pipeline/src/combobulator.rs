use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use twc_build::{Artifact, BuildInvoker};
use twc_merge::{filter_with_report, ExclusionSet, MergedTree};
use twc_source::SourceResolver;
use twc_types::{Configuration, LayerSpec, LayerTree};

use crate::error::{PipelineError, PipelineResult};
use crate::observer::{NoOpObserver, PipelineObserver};
use crate::phase::{PhaseTracker, PipelinePhase};
use crate::report::{LayerReport, PipelineReport};

/// How layers are fetched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Resolve, filter and fold one layer at a time. A failing layer stops
    /// the run before any later layer is resolved.
    #[default]
    Sequential,
    /// Resolve and filter every layer concurrently, then fold in combination
    /// order. The first failure in combination order is reported.
    Prefetch,
}

// ---------------------------------------------------------------------------
// Combobulator
// ---------------------------------------------------------------------------

/// Drives a configuration through resolve, filter and merge.
///
/// The combobulator holds no per-run state; one instance can serve any number
/// of runs, including concurrent ones.
pub struct Combobulator {
    resolver: Arc<dyn SourceResolver>,
    observer: Arc<dyn PipelineObserver>,
    mode: ExecutionMode,
}

/// A layer after resolution and filtering, waiting to be folded.
struct PreparedLayer {
    index: usize,
    tree: LayerTree,
    resolved: usize,
    excluded: Vec<String>,
    elapsed: Duration,
}

impl Combobulator {
    pub fn new(resolver: Arc<dyn SourceResolver>) -> Self {
        Self {
            resolver,
            observer: Arc::new(NoOpObserver),
            mode: ExecutionMode::default(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Merge every layer of `config` into a single tree.
    pub fn combobulate(&self, config: &Configuration) -> PipelineResult<MergedTree> {
        self.combobulate_with_report(config).map(|report| report.merged)
    }

    /// Like [`Self::combobulate`], keeping per-layer details.
    pub fn combobulate_with_report(&self, config: &Configuration) -> PipelineResult<PipelineReport> {
        let start = Instant::now();
        let mut tracker = PhaseTracker::new();
        let (merged, layers) = self.assemble(config, &mut tracker)?;
        tracker.advance(PipelinePhase::Done);
        let report = self.finish(config, merged, layers, tracker, start);
        self.observer.pipeline_finished(&report);
        Ok(report)
    }

    /// Merge `config` and compile the result with `invoker`.
    ///
    /// The invoker runs only after every layer merged successfully. A failed
    /// build produces no artifact.
    pub fn build(
        &self,
        config: &Configuration,
        invoker: &dyn BuildInvoker,
    ) -> PipelineResult<(PipelineReport, Artifact)> {
        let start = Instant::now();
        let mut tracker = PhaseTracker::new();
        let (merged, layers) = self.assemble(config, &mut tracker)?;

        tracker.advance(PipelinePhase::Building);
        debug!(invoker = invoker.name(), entries = merged.len(), "compiling merged tree");
        let artifact = match invoker.compile(&merged) {
            Ok(artifact) => artifact,
            Err(e) => return Err(self.fail(&mut tracker, PipelineError::Build(e))),
        };
        tracker.advance(PipelinePhase::Done);

        let report = self.finish(config, merged, layers, tracker, start);
        self.observer.pipeline_finished(&report);
        info!(
            artifact = %artifact.name,
            bytes = artifact.len(),
            "build complete"
        );
        Ok((report, artifact))
    }

    /// Validate, resolve, filter and fold. Leaves the tracker in `Merging`
    /// on success and `Failed` on error.
    fn assemble(
        &self,
        config: &Configuration,
        tracker: &mut PhaseTracker,
    ) -> PipelineResult<(MergedTree, Vec<LayerReport>)> {
        tracker.advance(PipelinePhase::Validating);
        if let Err(e) = config.validate() {
            return Err(self.fail(tracker, PipelineError::Configuration(e)));
        }

        let order = config.combination_order();
        debug!(
            layers = order.len(),
            precedence = %config.precedence,
            mode = ?self.mode,
            "starting merge"
        );

        let mut merged = MergedTree::new();
        let mut reports = Vec::with_capacity(order.len());

        match self.mode {
            ExecutionMode::Sequential => {
                for &index in &order {
                    let layer = &config.layers[index];
                    tracker.advance(PipelinePhase::Resolving);
                    let (tree, started) = match self.resolve(index, layer) {
                        Ok(resolved) => resolved,
                        Err(e) => return Err(self.fail(tracker, e)),
                    };
                    if !layer.exclude.is_empty() {
                        tracker.advance(PipelinePhase::Filtering);
                    }
                    let prepared = self.filter(index, layer, tree, started);
                    tracker.advance(PipelinePhase::Merging);
                    reports.push(self.fold(&mut merged, prepared, layer));
                }
            }
            ExecutionMode::Prefetch => {
                tracker.advance(PipelinePhase::Resolving);
                let results: Vec<PipelineResult<PreparedLayer>> = order
                    .par_iter()
                    .map(|&index| {
                        let layer = &config.layers[index];
                        let (tree, started) = self.resolve(index, layer)?;
                        Ok(self.filter(index, layer, tree, started))
                    })
                    .collect();

                // `collect` on an indexed parallel iterator keeps input order,
                // so the first error found here is the first in combination order.
                let mut prepared = Vec::with_capacity(results.len());
                for result in results {
                    match result {
                        Ok(layer) => prepared.push(layer),
                        Err(e) => return Err(self.fail(tracker, e)),
                    }
                }

                if config.layers.iter().any(|l| !l.exclude.is_empty()) {
                    tracker.advance(PipelinePhase::Filtering);
                }
                tracker.advance(PipelinePhase::Merging);
                for layer in prepared {
                    let spec = &config.layers[layer.index];
                    reports.push(self.fold(&mut merged, layer, spec));
                }
            }
        }

        let contributions = merged.contributions();
        for report in &mut reports {
            report.contributed = contributions.get(&report.index).copied().unwrap_or(0);
        }
        Ok((merged, reports))
    }

    fn resolve(&self, index: usize, layer: &LayerSpec) -> PipelineResult<(LayerTree, Instant)> {
        self.observer.layer_started(index, layer);
        let started = Instant::now();
        let tree = self
            .resolver
            .resolve(layer)
            .map_err(|error| PipelineError::Resolution {
                index,
                location: layer.source.location.clone(),
                error,
            })?;
        debug!(layer = index, entries = tree.len(), "layer resolved");
        Ok((tree, started))
    }

    fn filter(&self, index: usize, layer: &LayerSpec, tree: LayerTree, started: Instant) -> PreparedLayer {
        let resolved = tree.len();
        if layer.exclude.is_empty() {
            return PreparedLayer {
                index,
                tree,
                resolved,
                excluded: Vec::new(),
                elapsed: started.elapsed(),
            };
        }

        let outcome = filter_with_report(&tree, &ExclusionSet::from(&layer.exclude));
        self.observer.exclusions_applied(index, &outcome.removed);
        PreparedLayer {
            index,
            tree: outcome.tree,
            resolved,
            excluded: outcome.removed,
            elapsed: started.elapsed(),
        }
    }

    fn fold(&self, merged: &mut MergedTree, layer: PreparedLayer, spec: &LayerSpec) -> LayerReport {
        let stats = merged.overlay_over(layer.index, layer.tree);
        self.observer.layer_merged(layer.index, &stats);
        LayerReport {
            index: layer.index,
            location: spec.source.location.clone(),
            kind: spec.source.kind,
            resolved: layer.resolved,
            excluded: layer.excluded,
            overlay: stats,
            contributed: 0,
            elapsed: layer.elapsed,
        }
    }

    fn finish(
        &self,
        config: &Configuration,
        merged: MergedTree,
        layers: Vec<LayerReport>,
        tracker: PhaseTracker,
        start: Instant,
    ) -> PipelineReport {
        PipelineReport {
            merged,
            layers,
            precedence: config.precedence,
            mode: self.mode,
            phases: tracker.into_history(),
            elapsed: start.elapsed(),
        }
    }

    fn fail(&self, tracker: &mut PhaseTracker, error: PipelineError) -> PipelineError {
        tracker.advance(PipelinePhase::Failed);
        self.observer.pipeline_failed(&error);
        error
    }
}

impl std::fmt::Debug for Combobulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combobulator")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
