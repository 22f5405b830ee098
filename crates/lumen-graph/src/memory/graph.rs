use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::compiler::{NoopCompiler, SsrCompiler};
use crate::id::{is_virtual, normalize_id};
use crate::module::{ModuleNode, NodeKey};

/// Thread-safe in-memory module graph.
///
/// Cloning is cheap and yields another handle to the same graph.
#[derive(Clone)]
pub struct DevModuleGraph {
    pub(super) inner: Arc<RwLock<GraphInner>>,
    pub(super) compiler: Arc<dyn SsrCompiler>,
}

#[derive(Debug, Default)]
pub(super) struct GraphInner {
    next_key: u64,
    pub(super) nodes: FxHashMap<NodeKey, Arc<ModuleNode>>,
    /// Latest record registered for each identifier.
    pub(super) by_id: FxHashMap<String, NodeKey>,
    /// Records per origin file, in registration order.
    pub(super) by_file: FxHashMap<PathBuf, IndexSet<NodeKey>>,
}

impl DevModuleGraph {
    /// Create an empty graph whose compilations discover nothing.
    pub fn new() -> Self {
        Self::with_compiler(Arc::new(NoopCompiler))
    }

    /// Create an empty graph that compiles through `compiler`.
    pub fn with_compiler(compiler: Arc<dyn SsrCompiler>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(GraphInner::default())),
            compiler,
        }
    }
}

impl Default for DevModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DevModuleGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("DevModuleGraph")
            .field("modules", &inner.nodes.len())
            .field("compiler", &self.compiler)
            .finish()
    }
}

impl GraphInner {
    pub(super) fn next_key(&mut self) -> NodeKey {
        let key = NodeKey::new(self.next_key);
        self.next_key += 1;
        key
    }

    /// Allocate a fresh record for `id` and make it the one `by_id` returns.
    pub(super) fn alloc(&mut self, id: &str) -> NodeKey {
        let key = self.next_key();
        let file = file_for(id);

        let mut builder = ModuleNode::builder(key, id);
        if let Some(file) = &file {
            builder = builder.file(file.clone());
        }

        self.nodes.insert(key, Arc::new(builder.build()));
        self.by_id.insert(id.to_string(), key);
        if let Some(file) = file {
            self.by_file.entry(file).or_default().insert(key);
        }
        key
    }

    pub(super) fn ensure(&mut self, id: &str) -> NodeKey {
        match self.by_id.get(id) {
            Some(key) => *key,
            None => self.alloc(id),
        }
    }

    /// Copy-on-write access; snapshots already handed out stay untouched.
    pub(super) fn node_mut(&mut self, key: NodeKey) -> Option<&mut ModuleNode> {
        self.nodes.get_mut(&key).map(Arc::make_mut)
    }

    pub(super) fn key_of(&self, id: &str) -> Option<NodeKey> {
        self.by_id.get(id).copied()
    }
}

fn file_for(id: &str) -> Option<PathBuf> {
    if is_virtual(id) {
        None
    } else {
        Some(PathBuf::from(normalize_id(id).into_owned()))
    }
}
