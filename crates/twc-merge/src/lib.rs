//! Layer merge engine for the TiddlyWiki combobulator.
//!
//! Everything here is pure: no I/O, no clocks, no shared state. Given the
//! same layer trees in the same order, the engine always produces the same
//! merged tree.
//!
//! # Key Types
//!
//! - [`matches`] / [`ExclusionSet`] -- Literal title matching
//! - [`filter`] / [`FilterOutcome`] -- Remove excluded tiddlers from one layer
//! - [`merge`] / [`MergedTree`] -- Overlay layers, highest precedence wins

pub mod filter;
pub mod matcher;
pub mod overlay;

#[cfg(test)]
mod properties;

pub use filter::{filter, filter_with_report, FilterOutcome};
pub use matcher::{matches, ExclusionSet};
pub use overlay::{merge, MergedTree, OverlayStats};
