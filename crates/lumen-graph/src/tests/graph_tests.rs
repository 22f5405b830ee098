use std::path::Path;

use crate::{DevModuleGraph, ModuleNode, NodeKey};

#[test]
fn test_add_import_records_both_sides() {
    let graph = DevModuleGraph::new();
    let (page, style) = graph.add_import("/src/pages/index.astro", "/src/styles/a.css");

    let page_node = graph.get_by_key(page).unwrap();
    let style_node = graph.get_by_key(style).unwrap();

    assert_eq!(page_node.imported.len(), 1);
    assert_eq!(page_node.imported[0].key, style);
    assert_eq!(page_node.imported[0], style_node.to_ref());
    assert!(style_node.has_importer("/src/pages/index.astro"));
    assert_eq!(
        style_node.importers_iter().map(|r| r.key).collect::<Vec<_>>(),
        [page]
    );
    assert!(page_node.importers.is_empty());
}

#[test]
fn test_add_import_is_idempotent_and_ordered() {
    let graph = DevModuleGraph::new();
    graph.add_imports("/src/a.astro", ["/src/b.css", "/src/c.astro", "/src/b.css"]);
    graph.add_import("/src/a.astro", "/src/d.md");

    let ids: Vec<_> = graph
        .get("/src/a.astro")
        .unwrap()
        .imported
        .iter()
        .map(|r| r.id().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["/src/b.css", "/src/c.astro", "/src/d.md"]);
    assert_eq!(graph.get("/src/b.css").unwrap().importers.len(), 1);
}

#[test]
fn test_unconfirmed_import_has_no_importer_entry() {
    let graph = DevModuleGraph::new();
    graph.add_unconfirmed_import("/src/a.astro", "/src/hmr.ts");

    assert_eq!(graph.get("/src/a.astro").unwrap().imported.len(), 1);
    assert!(!graph.get("/src/hmr.ts").unwrap().has_importer("/src/a.astro"));
}

#[test]
fn test_unresolved_import_has_no_id() {
    let graph = DevModuleGraph::new();
    let placeholder = graph.add_unresolved_import("/src/a.astro");

    let node = graph.get("/src/a.astro").unwrap();
    assert_eq!(node.imported[0].key, placeholder);
    assert!(node.imported[0].id().is_none());
    assert!(graph.get_by_key(placeholder).is_none());
}

#[test]
fn test_snapshots_are_not_mutated() {
    let graph = DevModuleGraph::new();
    graph.ensure_module("/src/a.astro");
    let before = graph.get("/src/a.astro").unwrap();

    graph.add_import("/src/a.astro", "/src/b.css");

    assert!(before.imported.is_empty());
    assert_eq!(graph.get("/src/a.astro").unwrap().imported.len(), 1);
}

#[test]
fn test_file_index_groups_query_variants() {
    let graph = DevModuleGraph::new();
    graph.ensure_module("/src/pages/index.astro");
    graph.ensure_module("/src/pages/index.astro?astro&type=style&index=0&lang.css");
    graph.ensure_module("virtual:astro-entry");

    let ids: Vec<_> = graph
        .modules_for_file(Path::new("/src/pages/index.astro"))
        .iter()
        .map(|m| m.id().unwrap().to_string())
        .collect();
    assert_eq!(
        ids,
        [
            "/src/pages/index.astro",
            "/src/pages/index.astro?astro&type=style&index=0&lang.css"
        ]
    );
    assert!(graph.get("virtual:astro-entry").unwrap().file.is_none());
}

#[test]
fn test_fork_keeps_both_records_reachable() {
    let graph = DevModuleGraph::new();
    let old = graph.ensure_module("/src/a.astro");
    let new = graph.fork_module("/src/a.astro");

    assert_ne!(old, new);
    assert!(new.as_u64() > old.as_u64());
    assert_eq!(graph.get("/src/a.astro").unwrap().key, new);
    assert!(graph.get_by_key(old).is_some());
    assert_eq!(graph.modules_for_file(Path::new("/src/a.astro")).len(), 2);
}

#[test]
fn test_remove_module_leaves_stale_edges() {
    let graph = DevModuleGraph::new();
    let (_, style) = graph.add_import("/src/a.astro", "/src/b.css");
    graph.remove_module(style);

    assert!(!graph.contains("/src/b.css"));
    assert!(graph.get_by_key(style).is_none());
    assert_eq!(graph.get("/src/a.astro").unwrap().imported[0].key, style);
    assert!(graph.modules_for_file(Path::new("/src/b.css")).is_empty());
}

#[test]
fn test_remove_import_and_invalidate() {
    let graph = DevModuleGraph::new();
    graph.add_import("/src/a.astro", "/src/b.css");
    graph.mark_ssr_compiled("/src/a.astro");
    graph.set_css("/src/b.css", "body{}");

    graph.remove_import("/src/a.astro", "/src/b.css");
    graph.invalidate("/src/a.astro");
    graph.invalidate("/src/b.css");

    assert!(graph.get("/src/a.astro").unwrap().imported.is_empty());
    assert!(graph.get("/src/b.css").unwrap().importers.is_empty());
    assert!(!graph.get("/src/a.astro").unwrap().ssr_compiled);
    assert!(graph.get("/src/b.css").unwrap().css.is_none());
}

#[test]
fn test_module_node_serializes() {
    let node = ModuleNode::builder(NodeKey::new(7), "/src/a.css")
        .url("/src/a.css?direct")
        .css("a{}")
        .build();
    let json = serde_json::to_value(&node).unwrap();
    assert_eq!(json["key"], 7);
    assert_eq!(json["url"], "/src/a.css?direct");
    assert_eq!(json["css"], "a{}");
}
