//! Integration tests for `DevPipeline` over an in-memory dev graph.

use std::sync::Arc;

use lumen_graph::test_utils::{ScriptedCompiler, scripted_graph};
use lumen_graph::{DevModuleGraph, LoaderError};
use lumen_pipeline::head::DEV_CLIENT_URL;
use lumen_pipeline::{
    DevPipeline, LinkElement, Pipeline, PipelineConfig, PipelineError, Propagation, RouteData,
    RuntimeMode, ScriptElement,
};

const PAGE: &str = "/src/pages/index.astro";
const LAYOUT: &str = "/src/layouts/Layout.astro";
const LAYOUT_STYLE: &str = "/src/layouts/Layout.astro?astro&type=style&index=0&lang.css";
const GLOBAL_CSS: &str = "/src/styles/global.css";
const PAGE_SCRIPT: &str = "/src/pages/index.astro?astro&type=script&index=0&lang.ts";
const POST: &str = "/src/components/Post.astro?astroPropagatedAssets";

fn blog_pipeline(config: PipelineConfig) -> (DevPipeline<DevModuleGraph>, Arc<ScriptedCompiler>) {
    let (graph, compiler) = scripted_graph();
    compiler
        .on_compile(PAGE, [LAYOUT, GLOBAL_CSS, PAGE_SCRIPT])
        .on_compile(LAYOUT, [LAYOUT_STYLE, POST]);
    graph.set_css(GLOBAL_CSS, "body{margin:0}");
    graph.set_url(LAYOUT_STYLE, "/@fs/app/src/layouts/Layout.astro?astro&type=style&index=0&lang.css");

    (DevPipeline::new(graph, config), compiler)
}

fn index_route() -> RouteData {
    RouteData::new("/", PAGE).with_pattern("^\\/$")
}

#[tokio::test]
async fn test_head_elements_for_page() -> anyhow::Result<()> {
    let (pipeline, _) = blog_pipeline(PipelineConfig::default());

    let head = pipeline.head_elements(&index_route()).await?;

    let styles: Vec<_> = head.styles.iter().map(|s| (s.module_id.as_str(), s.content.as_str())).collect();
    assert_eq!(styles, [(GLOBAL_CSS, "body{margin:0}")]);

    assert_eq!(
        head.links.iter().cloned().collect::<Vec<_>>(),
        [LinkElement::stylesheet(
            "/@fs/app/src/layouts/Layout.astro?astro&type=style&index=0&lang.css"
        )]
    );

    assert_eq!(
        head.scripts.iter().cloned().collect::<Vec<_>>(),
        [
            ScriptElement::module(DEV_CLIENT_URL),
            ScriptElement::module(PAGE_SCRIPT),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_production_mode_has_no_dev_client() -> anyhow::Result<()> {
    let config = PipelineConfig {
        mode: RuntimeMode::Production,
        ..PipelineConfig::default()
    };
    let (pipeline, _) = blog_pipeline(config);

    let head = pipeline.head_elements(&index_route()).await?;

    assert!(!head.scripts.contains(&ScriptElement::module(DEV_CLIENT_URL)));
    assert_eq!(head.scripts.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_component_is_compiled_once() -> anyhow::Result<()> {
    let (pipeline, compiler) = blog_pipeline(PipelineConfig::default());

    pipeline.head_elements(&index_route()).await?;
    pipeline.head_elements(&index_route()).await?;

    assert_eq!(compiler.call_count(PAGE), 1);
    assert_eq!(compiler.call_count(LAYOUT), 1);
    Ok(())
}

#[tokio::test]
async fn test_component_compile_failure_is_an_error() {
    let (pipeline, compiler) = blog_pipeline(PipelineConfig::default());
    compiler.fail_on(PAGE);

    let result = pipeline.head_elements(&index_route()).await;

    assert!(matches!(
        result,
        Err(PipelineError::Loader(LoaderError::Compile { ref id, .. })) if id == PAGE
    ));
}

#[tokio::test]
async fn test_nested_compile_failure_is_not_an_error() -> anyhow::Result<()> {
    let (pipeline, compiler) = blog_pipeline(PipelineConfig::default());
    compiler.fail_on(LAYOUT);

    let head = pipeline.head_elements(&index_route()).await?;

    // The layout never compiled, so its style block is unknown.
    assert!(head.links.is_empty());
    assert_eq!(head.styles.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_component_metadata_reports_propagation() -> anyhow::Result<()> {
    let (pipeline, _) = blog_pipeline(PipelineConfig::default());

    let metadata = pipeline.component_metadata(&index_route()).await?;

    assert_eq!(metadata.component, PAGE);
    assert_eq!(
        metadata.modules,
        [LAYOUT, LAYOUT_STYLE, GLOBAL_CSS, PAGE_SCRIPT]
    );
    assert_eq!(metadata.propagation, Propagation::InTree);
    assert!(metadata.has_propagation());
    Ok(())
}

#[tokio::test]
async fn test_component_without_barrier() -> anyhow::Result<()> {
    let (graph, compiler) = scripted_graph();
    compiler.on_compile("/src/pages/about.astro", [GLOBAL_CSS]);
    let pipeline = DevPipeline::new(graph, PipelineConfig::default());

    let metadata = pipeline
        .component_metadata(&RouteData::new("/about", "/src/pages/about.astro"))
        .await?;

    assert_eq!(metadata.modules, [GLOBAL_CSS]);
    assert_eq!(metadata.propagation, Propagation::None);
    Ok(())
}

#[tokio::test]
async fn test_unconfirmed_barrier_edge_does_not_propagate() -> anyhow::Result<()> {
    let (graph, compiler) = scripted_graph();
    compiler.on_compile(PAGE, [GLOBAL_CSS]);
    graph.add_unconfirmed_import(PAGE, POST);
    let pipeline = DevPipeline::new(graph, PipelineConfig::default());

    let metadata = pipeline.component_metadata(&index_route()).await?;

    assert_eq!(metadata.modules, [GLOBAL_CSS]);
    assert_eq!(metadata.propagation, Propagation::None);
    assert!(!metadata.has_propagation());
    Ok(())
}

#[tokio::test]
async fn test_crawl_options_come_from_config() -> anyhow::Result<()> {
    let mut config = PipelineConfig::default();
    config.crawl.max_depth = Some(1);
    let (pipeline, _) = blog_pipeline(config);

    let metadata = pipeline.component_metadata(&index_route()).await?;

    assert_eq!(metadata.modules, [LAYOUT, GLOBAL_CSS, PAGE_SCRIPT]);
    Ok(())
}

#[tokio::test]
async fn test_pipeline_as_trait_object() -> anyhow::Result<()> {
    let (pipeline, _) = blog_pipeline(PipelineConfig::default());
    let pipeline: Box<dyn Pipeline> = Box::new(pipeline);

    assert_eq!(pipeline.resolve("preact/hooks").await?, "/@id/preact/hooks");
    assert_eq!(pipeline.resolve("/abs/x.js").await?, "/@fs/abs/x.js");
    assert!(pipeline.config().is_development());
    Ok(())
}
