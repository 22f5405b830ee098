use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Handle naming one record object in the graph.
///
/// Two records can momentarily share an identifier while the graph churns
/// (a fast-refresh pass allocates a fresh record before the old one is
/// dropped), so record identity is the key, never the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(u64);

impl NodeKey {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One endpoint of an import edge.
///
/// `id` is `None` for edges the graph has recorded before the target was
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef {
    pub key: NodeKey,
    pub id: Option<String>,
}

impl ModuleRef {
    pub fn new(key: NodeKey, id: impl Into<String>) -> Self {
        Self {
            key,
            id: Some(id.into()),
        }
    }

    /// Edge whose target has not been resolved yet.
    pub fn unresolved(key: NodeKey) -> Self {
        Self { key, id: None }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Snapshot of a module record as seen by the graph at query time.
///
/// The graph hands these out behind `Arc`; later mutations produce new
/// snapshots and never touch one that was already returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub key: NodeKey,
    pub id: Option<String>,
    /// Origin file, `None` for virtual modules.
    pub file: Option<PathBuf>,
    pub url: String,
    /// Outgoing edges in source-import order.
    pub imported: Vec<ModuleRef>,
    /// Incoming edges.
    pub importers: Vec<ModuleRef>,
    /// Server-side compilation already happened for this record.
    pub ssr_compiled: bool,
    /// Compiled style text, when the graph has it.
    pub css: Option<String>,
}

impl ModuleNode {
    pub fn builder(key: NodeKey, id: impl Into<String>) -> ModuleNodeBuilder {
        let id = id.into();
        ModuleNodeBuilder {
            node: Self {
                key,
                url: id.clone(),
                id: Some(id),
                file: None,
                imported: Vec::new(),
                importers: Vec::new(),
                ssr_compiled: false,
                css: None,
            },
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn to_ref(&self) -> ModuleRef {
        ModuleRef {
            key: self.key,
            id: self.id.clone(),
        }
    }

    pub fn imported_iter(&self) -> impl Iterator<Item = &ModuleRef> {
        self.imported.iter()
    }

    pub fn importers_iter(&self) -> impl Iterator<Item = &ModuleRef> {
        self.importers.iter()
    }

    /// True if `parent` is recorded on the importer side of this record.
    pub fn has_importer(&self, parent: &str) -> bool {
        self.importers.iter().any(|r| r.id() == Some(parent))
    }
}

/// Builder for `ModuleNode`, used by graph implementations and tests.
pub struct ModuleNodeBuilder {
    node: ModuleNode,
}

impl ModuleNodeBuilder {
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.node.file = Some(file.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.node.url = url.into();
        self
    }

    pub fn imported(mut self, imported: Vec<ModuleRef>) -> Self {
        self.node.imported = imported;
        self
    }

    pub fn importers(mut self, importers: Vec<ModuleRef>) -> Self {
        self.node.importers = importers;
        self
    }

    pub fn ssr_compiled(mut self, ssr_compiled: bool) -> Self {
        self.node.ssr_compiled = ssr_compiled;
        self
    }

    pub fn css(mut self, css: impl Into<String>) -> Self {
        self.node.css = Some(css.into());
        self
    }

    pub fn build(self) -> ModuleNode {
        self.node
    }
}
