use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use super::graph::DevModuleGraph;
use crate::id::is_virtual;
use crate::loader::{LoaderError, LoaderResult, ModuleLoader};
use crate::module::{ModuleNode, NodeKey};

#[async_trait]
impl ModuleLoader for DevModuleGraph {
    fn module_by_id(&self, id: &str) -> Option<Arc<ModuleNode>> {
        self.get(id)
    }

    fn module_by_key(&self, key: NodeKey) -> Option<Arc<ModuleNode>> {
        self.get_by_key(key)
    }

    fn modules_by_file(&self, file: &str) -> Vec<Arc<ModuleNode>> {
        self.modules_for_file(Path::new(file))
    }

    async fn import(&self, id: &str) -> LoaderResult<()> {
        // File-backed ids get a record on first compile; virtual ones only
        // exist once something registered them.
        if is_virtual(id) && !self.contains(id) {
            return Err(LoaderError::NotFound(id.to_string()));
        }
        trace!(id, "compiling module for ssr");
        // No lock is held across the await: the compiler writes through
        // the same public mutation methods as everyone else.
        let compiler = Arc::clone(&self.compiler);
        compiler.compile(self, id).await?;
        self.mark_ssr_compiled(id);
        Ok(())
    }
}
