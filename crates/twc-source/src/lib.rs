//! Source resolution for the TiddlyWiki combobulator.
//!
//! A resolver turns one declared layer into a fully materialized
//! [`LayerTree`](twc_types::LayerTree). The merge engine never sees where a
//! tree came from; it only sees the tree.
//!
//! # Resolvers
//!
//! All resolvers implement the [`SourceResolver`] trait:
//!
//! - [`LocalPathResolver`] -- reads a wiki folder from disk
//! - [`GitResolver`] -- shallow-clones a repository, then reads it as a folder
//! - [`RemoteDocumentResolver`] -- downloads a single-file HTML wiki and
//!   explodes it into a folder with the `tiddlywiki` executable
//! - [`DispatchingResolver`] -- picks one of the above by [`SourceKind`](twc_types::SourceKind)
//! - [`InMemoryResolver`] -- fixed trees and failures, for tests and embedding
//!
//! # Rules
//!
//! 1. Resolvers never merge or filter; they return the layer as found.
//! 2. Scratch directories are removed when the resolver returns.
//! 3. All I/O and process failures are propagated, never silently ignored.

pub mod dispatch;
pub mod error;
pub mod folder;
pub mod git;
pub mod local;
pub mod memory;
pub mod remote;
pub mod tiddlywiki;
pub mod titles;
pub mod traits;

pub use dispatch::DispatchingResolver;
pub use error::{SourceError, SourceResult};
pub use folder::{publish_folder, read_folder, write_folder};
pub use git::GitResolver;
pub use local::LocalPathResolver;
pub use memory::InMemoryResolver;
pub use remote::RemoteDocumentResolver;
pub use tiddlywiki::{TiddlyWikiCli, ToolError};
pub use traits::SourceResolver;
