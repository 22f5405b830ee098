//! Read methods for DevModuleGraph.

use std::path::Path;
use std::sync::Arc;

use super::graph::DevModuleGraph;
use crate::module::{ModuleNode, NodeKey};

impl DevModuleGraph {
    /// Latest record registered for `id`.
    pub fn get(&self, id: &str) -> Option<Arc<ModuleNode>> {
        let inner = self.inner.read();
        let key = inner.by_id.get(id)?;
        inner.nodes.get(key).cloned()
    }

    /// Record behind a handle.
    pub fn get_by_key(&self, key: NodeKey) -> Option<Arc<ModuleNode>> {
        self.inner.read().nodes.get(&key).cloned()
    }

    /// All live records whose origin is `file`, in registration order.
    pub fn modules_for_file(&self, file: &Path) -> Vec<Arc<ModuleNode>> {
        let inner = self.inner.read();
        let Some(keys) = inner.by_file.get(file) else {
            return Vec::new();
        };
        keys.iter()
            .filter_map(|key| inner.nodes.get(key).cloned())
            .collect()
    }

    /// Whether a record is registered for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().by_id.contains_key(id)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.inner.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
