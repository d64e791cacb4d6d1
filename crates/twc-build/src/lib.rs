//! Compiling a merged tree into the final wiki file.
//!
//! The merge engine hands over an immutable [`MergedTree`](twc_merge::MergedTree);
//! a [`BuildInvoker`] turns it into an [`Artifact`]. How the compilation
//! happens is invisible to the caller.
//!
//! - [`TiddlyWikiBuilder`] -- writes the tree to a scratch wiki folder and
//!   runs `tiddlywiki <dir> --build index`
//! - [`RecordingBuilder`] -- records invocations and returns a fixed artifact

pub mod artifact;
pub mod error;
pub mod invoker;
pub mod recording;
pub mod tiddlywiki;

pub use artifact::Artifact;
pub use error::{BuildError, BuildResult};
pub use invoker::BuildInvoker;
pub use recording::RecordingBuilder;
pub use tiddlywiki::{TiddlyWikiBuilder, DEFAULT_OUTPUT, DEFAULT_TARGET};
