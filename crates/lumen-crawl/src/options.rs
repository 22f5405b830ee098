//! Crawl policy.

use serde::{Deserialize, Serialize};

use lumen_graph::id::{PROPAGATED_ASSETS_MARKER, extension_of, has_marker, normalize_id};

/// Markdown flavours a content pipeline compiles into page components.
pub const MARKDOWN_EXTENSIONS: &[&str] = &[".markdown", ".mdown", ".mkdn", ".mkd", ".mdwn", ".md"];

/// Extensions compiled ahead of time by default: page components, Markdoc
/// and Markdown. Only compiling these reveals their nested style imports.
pub fn default_ssr_extensions() -> Vec<String> {
    [".astro", ".mdoc"]
        .iter()
        .chain(MARKDOWN_EXTENSIONS)
        .map(|ext| ext.to_string())
        .collect()
}

/// How the entry records of the root module are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootLookup {
    /// Every record registered for the root's origin file.
    ///
    /// On first load a page can be known under several records at once, and
    /// the per-file index is the only view that sees all of them.
    #[default]
    ByFile,
    /// Only the record registered for the exact root identifier.
    ById,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlOptions {
    /// Extensions eligible for eager server compilation. A leading dot is
    /// optional.
    pub ssr_extensions: Vec<String>,

    /// Raw-identifier marker of a propagation barrier. Empty disables barriers.
    pub propagation_marker: String,

    pub root_lookup: RootLookup,

    /// Import hops from the root that are yielded; records at the limit are
    /// yielded but not expanded. `None` is unlimited.
    pub max_depth: Option<usize>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            ssr_extensions: default_ssr_extensions(),
            propagation_marker: PROPAGATED_ASSETS_MARKER.to_string(),
            root_lookup: RootLookup::default(),
            max_depth: None,
        }
    }
}

impl CrawlOptions {
    /// True when compiling `id` can reveal further asset imports.
    pub fn is_ssr_candidate(&self, id: &str) -> bool {
        let normalized = normalize_id(id);
        let ext = extension_of(&normalized);
        if ext.is_empty() {
            return false;
        }
        let ext = &ext[1..];
        self.ssr_extensions
            .iter()
            .any(|candidate| candidate.trim_start_matches('.') == ext)
    }

    /// True when `id` is a propagation barrier.
    pub fn is_barrier(&self, id: &str) -> bool {
        has_marker(id, &self.propagation_marker)
    }

    /// Whether a record `depth` hops from the root gets expanded.
    pub(crate) fn expands_at(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max| depth < max)
    }
}
