//! Mutation methods for DevModuleGraph.

use super::graph::DevModuleGraph;
use crate::module::{ModuleRef, NodeKey};

impl DevModuleGraph {
    /// Record for `id`, created empty if the graph has none yet.
    pub fn ensure_module(&self, id: &str) -> NodeKey {
        self.inner.write().ensure(id)
    }

    /// Add a static import edge, creating forward and reverse entries.
    ///
    /// Both sides are deduplicated by handle; the forward list keeps the
    /// order in which imports were first recorded.
    pub fn add_import(&self, from: &str, to: &str) -> (NodeKey, NodeKey) {
        let mut inner = self.inner.write();
        let from_key = inner.ensure(from);
        let to_key = inner.ensure(to);

        if let Some(node) = inner.node_mut(from_key) {
            if !node.imported.iter().any(|r| r.key == to_key) {
                node.imported.push(ModuleRef::new(to_key, to));
            }
        }
        if let Some(node) = inner.node_mut(to_key) {
            if !node.importers.iter().any(|r| r.key == from_key) {
                node.importers.push(ModuleRef::new(from_key, from));
            }
        }

        (from_key, to_key)
    }

    /// Add several static imports from one module, in order.
    pub fn add_imports<'a, I>(&self, from: &str, targets: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for target in targets {
            self.add_import(from, target);
        }
    }

    /// Add a forward edge with no matching importer entry.
    ///
    /// This is the shape of the edges hot-reload bookkeeping leaves behind
    /// (accepted deps, dynamic-import placeholders).
    pub fn add_unconfirmed_import(&self, from: &str, to: &str) -> (NodeKey, NodeKey) {
        let mut inner = self.inner.write();
        let from_key = inner.ensure(from);
        let to_key = inner.ensure(to);

        if let Some(node) = inner.node_mut(from_key) {
            if !node.imported.iter().any(|r| r.key == to_key) {
                node.imported.push(ModuleRef::new(to_key, to));
            }
        }

        (from_key, to_key)
    }

    /// Add a forward edge whose target has not been resolved to an id.
    pub fn add_unresolved_import(&self, from: &str) -> NodeKey {
        let mut inner = self.inner.write();
        let from_key = inner.ensure(from);
        let placeholder = inner.next_key();

        if let Some(node) = inner.node_mut(from_key) {
            node.imported.push(ModuleRef::unresolved(placeholder));
        }

        placeholder
    }

    /// Remove an import edge in both directions.
    pub fn remove_import(&self, from: &str, to: &str) {
        let mut inner = self.inner.write();
        let (Some(from_key), Some(to_key)) = (inner.key_of(from), inner.key_of(to)) else {
            return;
        };

        if let Some(node) = inner.node_mut(from_key) {
            node.imported.retain(|r| r.key != to_key);
        }
        if let Some(node) = inner.node_mut(to_key) {
            node.importers.retain(|r| r.key != from_key);
        }
    }

    /// Allocate a second record for an identifier that already has one.
    ///
    /// The new record becomes the one returned for `id`; the previous one
    /// stays reachable through its handle and through the origin-file index,
    /// as happens while a fast-refresh pass is in flight.
    pub fn fork_module(&self, id: &str) -> NodeKey {
        self.inner.write().alloc(id)
    }

    /// Drop a record. Edges pointing at it become stale.
    pub fn remove_module(&self, key: NodeKey) {
        let mut inner = self.inner.write();
        let Some(node) = inner.nodes.remove(&key) else {
            return;
        };

        if let Some(id) = node.id() {
            if inner.by_id.get(id) == Some(&key) {
                inner.by_id.remove(id);
            }
        }
        if let Some(file) = &node.file {
            if let Some(keys) = inner.by_file.get_mut(file) {
                keys.shift_remove(&key);
                if keys.is_empty() {
                    inner.by_file.remove(file);
                }
            }
        }
    }

    /// Flag a module as compiled for server rendering.
    pub fn mark_ssr_compiled(&self, id: &str) {
        let mut inner = self.inner.write();
        let key = inner.ensure(id);
        if let Some(node) = inner.node_mut(key) {
            node.ssr_compiled = true;
        }
    }

    /// Forget compilation results so the next import recompiles.
    pub fn invalidate(&self, id: &str) {
        let mut inner = self.inner.write();
        let Some(key) = inner.key_of(id) else {
            return;
        };
        if let Some(node) = inner.node_mut(key) {
            node.ssr_compiled = false;
            node.css = None;
        }
    }

    /// Attach compiled style text to a module.
    pub fn set_css(&self, id: &str, css: impl Into<String>) {
        let mut inner = self.inner.write();
        let key = inner.ensure(id);
        if let Some(node) = inner.node_mut(key) {
            node.css = Some(css.into());
        }
    }

    /// Override the public url of a module.
    pub fn set_url(&self, id: &str, url: impl Into<String>) {
        let mut inner = self.inner.write();
        let key = inner.ensure(id);
        if let Some(node) = inner.node_mut(key) {
            node.url = url.into();
        }
    }
}
