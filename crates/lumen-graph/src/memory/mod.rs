//! In-memory dev graph.
//!
//! A `parking_lot`-guarded arena of module records that behaves like the
//! module graph of a dev server: records are keyed by handle, indexed by
//! identifier and origin file, and compiled on demand through an injected
//! `SsrCompiler`. Used as the default graph in tests and embedders that do
//! not bridge to an external host graph.

mod compiler;
mod graph;
mod loader;
mod mutations;
mod queries;

pub use compiler::{NoopCompiler, SsrCompiler};
pub use graph::DevModuleGraph;
