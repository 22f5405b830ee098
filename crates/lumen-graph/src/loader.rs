//! Module loader abstraction for the live dev graph
//!
//! This module defines the `ModuleLoader` trait through which everything in
//! lumen reads the dev server's module graph and asks it to compile modules
//! for server rendering. The graph is owned by the host; implementations are
//! expected to be mutated concurrently by unrelated activity (other requests,
//! background recompilation), so callers never assume snapshot isolation
//! between two calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::module::{ModuleNode, NodeKey};

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Errors that can occur when the graph is asked to compile a module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    /// No record and no way to create one for the identifier
    #[error("Module not found: {0}")]
    NotFound(String),

    /// Server compilation failed
    #[error("Failed to compile module '{id}': {reason}")]
    Compile { id: String, reason: String },
}

/// Read and compile access to a live module graph
///
/// Lookups are synchronous point reads of the graph's current state and
/// return snapshots. `import` is the only operation that may change the
/// graph: compiling a module resolves its imports, which populates new
/// records and edges visible to later lookups.
///
/// # Example
///
/// ```rust,ignore
/// use lumen_graph::{ModuleLoader, ModuleNode, NodeKey, LoaderResult};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct ViteBridge { /* ... */ }
///
/// #[async_trait]
/// impl ModuleLoader for ViteBridge {
///     fn module_by_id(&self, id: &str) -> Option<Arc<ModuleNode>> {
///         // Ask the host graph for its record
///         todo!()
///     }
///
///     // ... implement other methods
/// }
/// ```
#[async_trait]
pub trait ModuleLoader: Send + Sync + std::fmt::Debug {
    /// Record registered under the exact identifier
    fn module_by_id(&self, id: &str) -> Option<Arc<ModuleNode>>;

    /// Record object behind a handle, if it is still alive
    fn module_by_key(&self, key: NodeKey) -> Option<Arc<ModuleNode>>;

    /// Every record whose origin is `file`
    ///
    /// A single file can be known under several records at once (query
    /// variants, overlapping fast-refresh passes). Implementations may serve
    /// this from a cache that lags behind `module_by_id`.
    fn modules_by_file(&self, file: &str) -> Vec<Arc<ModuleNode>>;

    /// Compile a module for server rendering
    async fn import(&self, id: &str) -> LoaderResult<()>;
}

#[async_trait]
impl<L: ModuleLoader + ?Sized> ModuleLoader for Arc<L> {
    fn module_by_id(&self, id: &str) -> Option<Arc<ModuleNode>> {
        (**self).module_by_id(id)
    }

    fn module_by_key(&self, key: NodeKey) -> Option<Arc<ModuleNode>> {
        (**self).module_by_key(key)
    }

    fn modules_by_file(&self, file: &str) -> Vec<Arc<ModuleNode>> {
        (**self).modules_by_file(file)
    }

    async fn import(&self, id: &str) -> LoaderResult<()> {
        (**self).import(id).await
    }
}

#[async_trait]
impl<'a, L: ModuleLoader + ?Sized> ModuleLoader for &'a L {
    fn module_by_id(&self, id: &str) -> Option<Arc<ModuleNode>> {
        (**self).module_by_id(id)
    }

    fn module_by_key(&self, key: NodeKey) -> Option<Arc<ModuleNode>> {
        (**self).module_by_key(key)
    }

    fn modules_by_file(&self, file: &str) -> Vec<Arc<ModuleNode>> {
        (**self).modules_by_file(file)
    }

    async fn import(&self, id: &str) -> LoaderResult<()> {
        (**self).import(id).await
    }
}
