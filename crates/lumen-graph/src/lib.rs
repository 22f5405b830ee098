//! # lumen-graph
//!
//! Module records and the loader boundary of a live dev-server module graph.
//!
//! ## Overview
//!
//! The graph itself belongs to the dev server: it creates records as files
//! are requested, wires edges as imports resolve, and compiles modules on
//! demand. Everything in lumen reads it through the [`ModuleLoader`] trait:
//!
//! - **Snapshots**: lookups return `Arc<ModuleNode>` snapshots; the graph may
//!   change between two calls and no call assumes otherwise
//! - **Handles**: every record object has a [`NodeKey`], so two records that
//!   briefly share an identifier stay distinguishable
//! - **Identifiers**: [`id`] holds the normalization and classification rules
//!   (query stripping, style requests, propagation markers)
//!
//! ## Quick Start
//!
//! ```rust
//! use lumen_graph::{DevModuleGraph, ModuleLoader};
//!
//! let graph = DevModuleGraph::new();
//! graph.add_import("/src/pages/index.astro", "/src/styles/global.css");
//!
//! let page = graph.module_by_id("/src/pages/index.astro").unwrap();
//! assert_eq!(page.imported[0].id(), Some("/src/styles/global.css"));
//!
//! let css = graph.module_by_key(page.imported[0].key).unwrap();
//! assert!(css.has_importer("/src/pages/index.astro"));
//! ```
//!
//! ## Thread Safety
//!
//! `DevModuleGraph` keeps its state behind an `Arc<RwLock<_>>`; clones share
//! the graph. Locks are never held across an `.await`.

pub mod id;
pub mod loader;
pub mod module;

mod memory;

pub use loader::{LoaderError, LoaderResult, ModuleLoader};
pub use memory::{DevModuleGraph, NoopCompiler, SsrCompiler};
pub use module::{ModuleNode, ModuleNodeBuilder, ModuleRef, NodeKey};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;
