//! Test utilities for lumen-graph.
//!
//! Available in test builds and behind the `test-utils` feature so that
//! downstream crates can drive a deterministic graph from their own tests.
//!
//! ## Key Components
//!
//! - `ScriptedCompiler`: an `SsrCompiler` whose discoveries are declared up
//!   front, with per-module failure injection and call counting
//! - `scripted_graph`: a `DevModuleGraph` wired to a fresh `ScriptedCompiler`

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::loader::{LoaderError, LoaderResult};
use crate::memory::{DevModuleGraph, SsrCompiler};

#[derive(Debug, Default, Clone)]
struct CompileScript {
    imports: Vec<String>,
    css: Option<String>,
}

/// Compiler whose effects are scripted per module id.
///
/// ## Usage Example
///
/// ```rust
/// use lumen_graph::test_utils::scripted_graph;
/// use lumen_graph::ModuleLoader;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (graph, compiler) = scripted_graph();
/// compiler.on_compile("/src/Card.astro", ["/src/Card.astro?astro&type=style&lang.css"]);
///
/// graph.import("/src/Card.astro").await.unwrap();
/// assert_eq!(compiler.call_count("/src/Card.astro"), 1);
/// assert_eq!(graph.get("/src/Card.astro").unwrap().imported.len(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedCompiler {
    scripts: RwLock<FxHashMap<String, CompileScript>>,
    failing: RwLock<FxHashSet<String>>,
    calls: RwLock<Vec<String>>,
}

impl ScriptedCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports discovered when `id` is compiled, in source order.
    pub fn on_compile<'a, I>(&self, id: &str, imports: I) -> &Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut scripts = self.scripts.write();
        let script = scripts.entry(id.to_string()).or_default();
        script.imports.extend(imports.into_iter().map(str::to_string));
        self
    }

    /// Style text attached to `id` when it is compiled.
    pub fn css_on_compile(&self, id: &str, css: &str) -> &Self {
        self.scripts.write().entry(id.to_string()).or_default().css = Some(css.to_string());
        self
    }

    /// Make every compilation of `id` fail.
    pub fn fail_on(&self, id: &str) -> &Self {
        self.failing.write().insert(id.to_string());
        self
    }

    /// Every compiled id, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    pub fn call_count(&self, id: &str) -> usize {
        self.calls.read().iter().filter(|call| call.as_str() == id).count()
    }
}

#[async_trait]
impl SsrCompiler for ScriptedCompiler {
    async fn compile(&self, graph: &DevModuleGraph, id: &str) -> LoaderResult<()> {
        self.calls.write().push(id.to_string());

        if self.failing.read().contains(id) {
            return Err(LoaderError::Compile {
                id: id.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        let script = self.scripts.read().get(id).cloned().unwrap_or_default();
        graph.ensure_module(id);
        for import in &script.imports {
            graph.add_import(id, import);
        }
        if let Some(css) = script.css {
            graph.set_css(id, css);
        }
        Ok(())
    }
}

/// A graph compiling through a fresh `ScriptedCompiler`.
pub fn scripted_graph() -> (DevModuleGraph, Arc<ScriptedCompiler>) {
    let compiler = Arc::new(ScriptedCompiler::new());
    let graph = DevModuleGraph::with_compiler(compiler.clone());
    (graph, compiler)
}
