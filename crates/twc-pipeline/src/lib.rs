//! Layer pipeline for tw-combobulator.
//!
//! A [`Combobulator`] takes a validated [`Configuration`](twc_types::Configuration)
//! and, for each layer in combination order, resolves its source, removes the
//! excluded tiddlers and folds the result into a single
//! [`MergedTree`](twc_merge::MergedTree). With the default precedence the
//! first-declared layer wins every collision.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use twc_pipeline::Combobulator;
//! use twc_source::InMemoryResolver;
//! use twc_types::{Configuration, LayerSpec, LayerTree, Source};
//!
//! let resolver = InMemoryResolver::new()
//!     .with_tree("./a", LayerTree::from_tiddlers([("Foo", "a1")]).unwrap())
//!     .with_tree("./b", LayerTree::from_tiddlers([("Foo", "b1")]).unwrap());
//! let config = Configuration::new(vec![
//!     LayerSpec::new(Source::new("./a").unwrap()),
//!     LayerSpec::new(Source::new("./b").unwrap()),
//! ])
//! .unwrap();
//!
//! let merged = Combobulator::new(Arc::new(resolver)).combobulate(&config).unwrap();
//! assert_eq!(merged.content("Foo"), Some(&b"a1"[..]));
//! ```
//!
//! # Key Types
//!
//! - [`Combobulator`] -- drives resolve, filter, merge and build
//! - [`PipelineObserver`] -- progress notifications
//! - [`PipelinePhase`] -- the run's state machine
//! - [`PipelineReport`] -- merged tree plus per-layer details
//! - [`PipelineError`] -- every failure, tagged with its phase

pub mod combobulator;
pub mod error;
pub mod observer;
pub mod phase;
pub mod report;

pub use combobulator::{Combobulator, ExecutionMode};
pub use error::{PipelineError, PipelineResult};
pub use observer::{NoOpObserver, ObserverEvent, PipelineObserver, RecordingObserver, TracingObserver};
pub use phase::PipelinePhase;
pub use report::{LayerReport, PipelineReport};
