//! Foundation types for the TiddlyWiki combobulator.
//!
//! This crate provides the vocabulary shared by every other `twc` crate: how
//! tiddlers are named, how layers are declared, how a source is classified,
//! and how a resolved layer is represented in memory.
//!
//! # Key Types
//!
//! - [`Title`] / [`TitlePattern`] -- Tiddler identity and exclusion patterns
//! - [`Source`] / [`SourceKind`] -- A layer source, classified once at load time
//! - [`LayerSpec`] -- One declared layer with its exclusions
//! - [`Configuration`] -- The ordered layer stack plus its [`Precedence`]
//! - [`LayerTree`] / [`TreeEntry`] -- One resolved layer, keyed by title or path
//! - [`TreeDigest`] -- BLAKE3 digest over a tree's sorted entries

pub mod digest;
pub mod error;
pub mod layer;
pub mod source;
pub mod title;
pub mod tree;

pub use digest::TreeDigest;
pub use error::TypeError;
pub use layer::{Configuration, LayerSpec, Precedence, DEFAULT_BRANCH};
pub use source::{Source, SourceKind};
pub use title::{Title, TitlePattern};
pub use tree::{LayerTree, TreeEntry};
