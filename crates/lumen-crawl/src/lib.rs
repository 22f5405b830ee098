//! # lumen-crawl
//!
//! Discovers, for one page request, which style and asset modules the page's
//! module graph transitively imports, so they can be preloaded or inlined
//! before the response is produced.
//!
//! ## How a crawl proceeds
//!
//! Starting from the page's entry module, each module's imports are
//! inspected in source order:
//!
//! - imports of page components and markup (`.astro`, `.mdoc`, Markdown)
//!   that were never compiled for server rendering are compiled eagerly, as
//!   only their compiled form reveals nested style imports; failures are
//!   logged and ignored
//! - imports carrying the propagation marker are cut off, together with
//!   everything behind them
//! - only imports confirmed from the importer side are followed
//!
//! Style modules end a branch. Results come out lazily, depth first, and
//! every identifier at most once.
//!
//! ```rust
//! use lumen_crawl::crawl_graph;
//! use lumen_graph::DevModuleGraph;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let graph = DevModuleGraph::new();
//! graph.add_import("/src/pages/index.astro", "/src/layouts/Base.astro");
//! graph.add_import("/src/layouts/Base.astro", "/src/styles/base.css");
//!
//! let found: Vec<_> = crawl_graph(&graph, "/src/pages/index.astro", true)
//!     .into_vec()
//!     .await
//!     .iter()
//!     .filter_map(|m| m.id().map(str::to_string))
//!     .collect();
//! assert_eq!(found, ["/src/layouts/Base.astro", "/src/styles/base.css"]);
//! # }
//! ```

mod authenticity;
mod crawl;
mod options;

pub use authenticity::is_imported_by;
pub use crawl::{Crawl, CrawlStats, Crawler, crawl_graph};
pub use options::{CrawlOptions, MARKDOWN_EXTENSIONS, RootLookup, default_ssr_extensions};
