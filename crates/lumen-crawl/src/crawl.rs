//! Lazy depth-first crawl of a live module graph.
//!
//! A crawl is an explicit stack machine: each expanded module pushes one
//! frame holding the records it genuinely imports, and every pull pops the
//! next record, yields it, and schedules its own expansion for the following
//! pull. Work only happens while the consumer pulls, so dropping a [`Crawl`]
//! halfway is all the cancellation there is.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tokio_stream::Stream;
use tracing::{debug, trace};

use lumen_graph::id::{is_style_request, normalize_id, unwrap_id};
use lumen_graph::{ModuleLoader, ModuleNode, NodeKey};

use crate::authenticity::is_imported_by;
use crate::options::{CrawlOptions, RootLookup};

/// Counters collected while a crawl runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Modules expanded (their imports inspected).
    pub expanded: usize,
    pub yielded: usize,
    /// Successful eager compilations.
    pub compiled: usize,
    /// Compilations that failed and were ignored.
    pub compile_failures: usize,
    /// Edges cut at a propagation barrier.
    pub skipped_barriers: usize,
    /// Edges not confirmed from the importer side, or whose record is gone.
    pub rejected_edges: usize,
    /// Edges without an identifier.
    pub malformed_edges: usize,
}

/// Entry point for crawls sharing one loader and one policy.
///
/// # Example
///
/// ```rust
/// use lumen_crawl::Crawler;
/// use lumen_graph::DevModuleGraph;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let graph = DevModuleGraph::new();
/// graph.add_import("/src/pages/index.astro", "/src/styles/global.css");
///
/// let crawler = Crawler::new(graph);
/// let mut crawl = crawler.crawl("/src/pages/index.astro", true);
///
/// let first = crawl.next().await.unwrap();
/// assert_eq!(first.id(), Some("/src/styles/global.css"));
/// assert!(crawl.next().await.is_none());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Crawler<L> {
    loader: L,
    options: Arc<CrawlOptions>,
}

impl<L: ModuleLoader + Clone> Crawler<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            options: Arc::new(CrawlOptions::default()),
        }
    }

    pub fn with_options(mut self, options: CrawlOptions) -> Self {
        self.options = Arc::new(options);
        self
    }

    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Start a crawl from `root`.
    ///
    /// `is_root_file` is true only for the page's entry module; it selects
    /// the per-file lookup for the first expansion.
    pub fn crawl(&self, root: &str, is_root_file: bool) -> Crawl<L> {
        self.crawl_with_scanned(root, is_root_file, FxHashSet::default())
    }

    /// Start a crawl that treats everything in `scanned` as already visited.
    pub fn crawl_with_scanned(
        &self,
        root: &str,
        is_root_file: bool,
        scanned: FxHashSet<String>,
    ) -> Crawl<L> {
        Crawl::new(
            self.loader.clone(),
            Arc::clone(&self.options),
            root,
            is_root_file,
            scanned,
        )
    }
}

/// Crawl `root` with the default policy.
pub fn crawl_graph<L: ModuleLoader>(loader: L, root: &str, is_root_file: bool) -> Crawl<L> {
    Crawl::new(
        loader,
        Arc::new(CrawlOptions::default()),
        root,
        is_root_file,
        FxHashSet::default(),
    )
}

struct Expansion {
    id: String,
    root: bool,
    depth: usize,
}

struct Frame {
    depth: usize,
    queue: VecDeque<Arc<ModuleNode>>,
}

/// A single, non-restartable crawl.
///
/// Yields every module reachable from the root through genuine,
/// non-barrier imports, depth first, siblings in import order. The root
/// itself is never yielded and no identifier is yielded twice.
pub struct Crawl<L> {
    loader: L,
    options: Arc<CrawlOptions>,
    root: String,
    scanned: FxHashSet<String>,
    stack: Vec<Frame>,
    pending: Option<Expansion>,
    stats: CrawlStats,
    finished: bool,
}

impl<L: ModuleLoader> Crawl<L> {
    fn new(
        loader: L,
        options: Arc<CrawlOptions>,
        root: &str,
        is_root_file: bool,
        mut scanned: FxHashSet<String>,
    ) -> Self {
        scanned.insert(root.to_string());
        let pending = options.expands_at(0).then(|| Expansion {
            id: root.to_string(),
            root: is_root_file,
            depth: 0,
        });

        Self {
            loader,
            options,
            root: root.to_string(),
            scanned,
            stack: Vec::new(),
            pending,
            stats: CrawlStats::default(),
            finished: false,
        }
    }

    /// Pull the next discovered module.
    ///
    /// May compile modules through the loader before returning. Returns
    /// `None` once the crawl is exhausted, and keeps returning `None` after.
    pub async fn next(&mut self) -> Option<Arc<ModuleNode>> {
        loop {
            if let Some(expansion) = self.pending.take() {
                let queue = self.expand(&expansion).await;
                if !queue.is_empty() {
                    self.stack.push(Frame {
                        depth: expansion.depth,
                        queue,
                    });
                }
                continue;
            }

            let Some(frame) = self.stack.last_mut() else {
                self.finish();
                return None;
            };
            let Some(module) = frame.queue.pop_front() else {
                self.stack.pop();
                continue;
            };
            let depth = frame.depth + 1;

            let Some(id) = module.id() else {
                continue;
            };
            if !self.scanned.insert(id.to_string()) {
                continue;
            }

            if self.options.expands_at(depth) {
                self.pending = Some(Expansion {
                    id: id.to_string(),
                    root: false,
                    depth,
                });
            }
            self.stats.yielded += 1;
            return Some(module);
        }
    }

    /// Drain the remaining modules.
    pub async fn into_vec(mut self) -> Vec<Arc<ModuleNode>> {
        let mut modules = Vec::new();
        while let Some(module) = self.next().await {
            modules.push(module);
        }
        modules
    }

    /// Adapt the crawl to a `Stream`.
    pub fn into_stream(mut self) -> impl Stream<Item = Arc<ModuleNode>> {
        async_stream::stream! {
            while let Some(module) = self.next().await {
                yield module;
            }
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn stats(&self) -> CrawlStats {
        self.stats
    }

    /// Identifiers visited so far, the root included.
    pub fn scanned(&self) -> &FxHashSet<String> {
        &self.scanned
    }

    /// Inspect the imports of one module and return the records to descend
    /// into, deduplicated by record identity in first-seen order.
    async fn expand(&mut self, expansion: &Expansion) -> VecDeque<Arc<ModuleNode>> {
        let id = expansion.id.as_str();

        // Style modules are leaves: the dev server already bundles their
        // own imports into them.
        if is_style_request(&unwrap_id(id)) {
            return VecDeque::new();
        }
        let normalized = normalize_id(id);

        let entries = match (expansion.root, self.options.root_lookup) {
            (true, RootLookup::ByFile) => self.loader.modules_by_file(&normalized),
            _ => self.loader.module_by_id(id).into_iter().collect(),
        };

        let mut descend: IndexMap<NodeKey, Arc<ModuleNode>, FxBuildHasher> =
            IndexMap::default();

        for entry in entries {
            if entry.id() != Some(id) {
                continue;
            }
            self.scanned.insert(id.to_string());
            self.stats.expanded += 1;

            for edge in entry.imported_iter() {
                let Some(edge_id) = edge.id() else {
                    self.stats.malformed_edges += 1;
                    continue;
                };

                // Never compiled or descended into; only counted when the
                // importer side confirms the edge.
                if self.options.is_barrier(edge_id) {
                    match self.loader.module_by_key(edge.key) {
                        Some(record) if is_imported_by(id, &record) => {
                            trace!(parent = id, id = edge_id, "propagation barrier");
                            self.stats.skipped_barriers += 1;
                        }
                        _ => {
                            trace!(parent = id, id = edge_id, "barrier edge not confirmed by importer");
                            self.stats.rejected_edges += 1;
                        }
                    }
                    continue;
                }

                if self.options.is_ssr_candidate(edge_id) {
                    self.compile_if_needed(edge_id).await;
                }

                // Re-read the record behind the edge: compilation may have
                // just recorded its importers.
                match self.loader.module_by_key(edge.key) {
                    Some(record) if is_imported_by(id, &record) => {
                        descend.entry(record.key).or_insert(record);
                    }
                    _ => {
                        trace!(parent = id, id = edge_id, "edge not confirmed by importer");
                        self.stats.rejected_edges += 1;
                    }
                }
            }
        }

        descend.into_values().collect()
    }

    /// Best-effort eager compilation. Failures are expected for stale edges
    /// and never stop the crawl.
    async fn compile_if_needed(&mut self, id: &str) {
        let compiled = self
            .loader
            .module_by_id(id)
            .is_some_and(|module| module.ssr_compiled);
        if compiled {
            return;
        }

        match self.loader.import(id).await {
            Ok(()) => self.stats.compiled += 1,
            Err(err) => {
                debug!(id, error = %err, "eager ssr compile failed, continuing crawl");
                self.stats.compile_failures += 1;
            }
        }
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        debug!(
            root = %self.root,
            yielded = self.stats.yielded,
            expanded = self.stats.expanded,
            compiled = self.stats.compiled,
            compile_failures = self.stats.compile_failures,
            "module graph crawl finished"
        );
    }
}

impl<L> std::fmt::Debug for Crawl<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crawl")
            .field("root", &self.root)
            .field("scanned", &self.scanned.len())
            .field("depth", &self.stack.len())
            .field("stats", &self.stats)
            .finish()
    }
}
