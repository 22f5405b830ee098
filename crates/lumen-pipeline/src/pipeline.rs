//! The rendering pipeline seam and its dev-server implementation.

use std::path::{Component, Path};

use async_trait::async_trait;
use tracing::debug;

use lumen_crawl::Crawler;
use lumen_graph::ModuleLoader;
use lumen_graph::id::TRANSPORT_ID_PREFIX;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::head::{DEV_CLIENT_URL, HeadElements, ScriptElement};
use crate::route::{ComponentMetadata, Propagation, RouteData};

/// Url prefix for files served straight from the file system.
pub const FS_PREFIX: &str = "/@fs/";

/// What a renderer needs from the environment it runs in.
#[async_trait]
pub trait Pipeline: Send + Sync {
    fn config(&self) -> &PipelineConfig;

    /// Modules below a route component and whether any of them propagates
    /// its assets at render time.
    async fn component_metadata(&self, route: &RouteData) -> Result<ComponentMetadata>;

    /// Styles, stylesheet links and scripts for a route's `<head>`.
    async fn head_elements(&self, route: &RouteData) -> Result<HeadElements>;

    /// Turn an import specifier into a url the browser can load.
    async fn resolve(&self, specifier: &str) -> Result<String>;
}

/// Pipeline backed by a live dev-server module graph.
#[derive(Debug, Clone)]
pub struct DevPipeline<L> {
    config: PipelineConfig,
    crawler: Crawler<L>,
}

impl<L: ModuleLoader + Clone> DevPipeline<L> {
    pub fn new(loader: L, config: PipelineConfig) -> Self {
        let crawler = Crawler::new(loader).with_options(config.crawl.clone());
        Self { config, crawler }
    }

    pub fn loader(&self) -> &L {
        self.crawler.loader()
    }

    /// Compile the route component so its imports are in the graph before
    /// the crawl reads them.
    async fn ensure_compiled(&self, component: &str) -> Result<()> {
        let loader = self.crawler.loader();
        let compiled = loader
            .module_by_id(component)
            .is_some_and(|module| module.ssr_compiled);
        if !compiled {
            loader.import(component).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<L: ModuleLoader + Clone> Pipeline for DevPipeline<L> {
    fn config(&self) -> &PipelineConfig {
        &self.config
    }

    async fn component_metadata(&self, route: &RouteData) -> Result<ComponentMetadata> {
        self.ensure_compiled(&route.component).await?;

        let mut crawl = self.crawler.crawl(&route.component, true);
        let mut modules = Vec::new();
        while let Some(module) = crawl.next().await {
            if let Some(id) = module.id() {
                modules.push(id.to_string());
            }
        }

        let propagation = if crawl.stats().skipped_barriers > 0 {
            Propagation::InTree
        } else {
            Propagation::None
        };

        Ok(ComponentMetadata {
            component: route.component.clone(),
            modules,
            propagation,
        })
    }

    async fn head_elements(&self, route: &RouteData) -> Result<HeadElements> {
        self.ensure_compiled(&route.component).await?;

        let mut head = HeadElements::new();
        if self.config.is_development() {
            head.scripts.insert(ScriptElement::module(DEV_CLIENT_URL));
        }

        let mut crawl = self.crawler.crawl(&route.component, true);
        while let Some(module) = crawl.next().await {
            head.collect(&module, &self.config.script_query);
        }

        debug!(
            route = %route.route,
            styles = head.styles.len(),
            links = head.links.len(),
            scripts = head.scripts.len(),
            "collected head elements"
        );
        Ok(head)
    }

    async fn resolve(&self, specifier: &str) -> Result<String> {
        resolve_specifier(self.config.root.as_deref(), specifier)
    }
}

/// Map a specifier to a dev-server url.
///
/// - `/@fs/...` and `/@id/...` urls pass through.
/// - Absolute paths under `root` become root-relative urls, other absolute
///   paths (POSIX or drive-letter) are served through `/@fs/`.
/// - Bare specifiers go through the `/@id/` prefix.
/// - Relative specifiers have no importer to resolve against and fail.
pub fn resolve_specifier(root: Option<&Path>, specifier: &str) -> Result<String> {
    if specifier.is_empty() || specifier.starts_with("./") || specifier.starts_with("../") {
        return Err(PipelineError::Resolve(specifier.to_string()));
    }
    if specifier.starts_with(FS_PREFIX) || specifier.starts_with(TRANSPORT_ID_PREFIX) {
        return Ok(specifier.to_string());
    }

    if is_drive_path(specifier) {
        return Ok(format!("{FS_PREFIX}{}", specifier.replace('\\', "/")));
    }

    if specifier.starts_with('/') {
        if let Some(relative) = root.and_then(|root| Path::new(specifier).strip_prefix(root).ok()) {
            return Ok(root_relative_url(relative));
        }
        return Ok(format!("{FS_PREFIX}{}", specifier.trim_start_matches('/')));
    }

    Ok(format!("{TRANSPORT_ID_PREFIX}{specifier}"))
}

fn is_drive_path(specifier: &str) -> bool {
    let bytes = specifier.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
}

fn root_relative_url(relative: &Path) -> String {
    let segments: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_paths_use_fs_prefix() {
        assert_eq!(
            resolve_specifier(None, "/home/me/site/src/a.ts").unwrap(),
            "/@fs/home/me/site/src/a.ts"
        );
        assert_eq!(
            resolve_specifier(None, "C:/site/src/a.ts").unwrap(),
            "/@fs/C:/site/src/a.ts"
        );
        assert_eq!(
            resolve_specifier(None, "D:\\site\\a.ts").unwrap(),
            "/@fs/D:/site/a.ts"
        );
    }

    #[test]
    fn test_paths_under_root_are_root_relative() {
        let root = Path::new("/home/me/site");
        assert_eq!(
            resolve_specifier(Some(root), "/home/me/site/src/a.ts").unwrap(),
            "/src/a.ts"
        );
        assert_eq!(
            resolve_specifier(Some(root), "/opt/shared/b.ts").unwrap(),
            "/@fs/opt/shared/b.ts"
        );
    }

    #[test]
    fn test_bare_specifiers_use_id_prefix() {
        assert_eq!(
            resolve_specifier(None, "astro/client/idle.js").unwrap(),
            "/@id/astro/client/idle.js"
        );
        assert_eq!(resolve_specifier(None, "/@id/preact").unwrap(), "/@id/preact");
        assert_eq!(resolve_specifier(None, "/@fs/x/y.js").unwrap(), "/@fs/x/y.js");
    }

    #[test]
    fn test_unresolvable_specifiers() {
        assert!(matches!(
            resolve_specifier(None, ""),
            Err(PipelineError::Resolve(_))
        ));
        assert!(matches!(
            resolve_specifier(None, "./local.js"),
            Err(PipelineError::Resolve(s)) if s == "./local.js"
        ));
    }
}
