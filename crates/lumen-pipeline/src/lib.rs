//! # lumen-pipeline
//!
//! The rendering side of a dev server: given a route, compile its page
//! component, crawl the live module graph below it and turn what the crawl
//! finds into the page's `<head>` elements.
//!
//! ```rust
//! use lumen_graph::DevModuleGraph;
//! use lumen_pipeline::{DevPipeline, Pipeline, PipelineConfig, RouteData};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> lumen_pipeline::Result<()> {
//! let graph = DevModuleGraph::new();
//! graph.add_import("/src/pages/index.astro", "/src/styles/global.css");
//!
//! let pipeline = DevPipeline::new(graph, PipelineConfig::default());
//! let head = pipeline
//!     .head_elements(&RouteData::new("/", "/src/pages/index.astro"))
//!     .await?;
//!
//! assert_eq!(head.links[0].href, "/src/styles/global.css");
//! # Ok(())
//! # }
//! ```
//!
//! Configuration comes from [`PipelineConfig::load`]; hosts without a
//! tracing subscriber can install one with [`logging::init_logging`].

pub mod config;
pub mod error;
pub mod head;
pub mod logging;
pub mod pipeline;
pub mod route;

pub use config::{PipelineConfig, RendererInfo, RuntimeMode, SsrManifest, TrailingSlash};
pub use error::{ConfigError, PipelineError, Result};
pub use head::{HeadElements, LinkElement, ScriptElement, StyleElement};
pub use pipeline::{DevPipeline, Pipeline, resolve_specifier};
pub use route::{ComponentMetadata, Propagation, RouteData};
