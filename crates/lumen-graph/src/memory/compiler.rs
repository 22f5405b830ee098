use std::fmt::Debug;

use async_trait::async_trait;

use super::graph::DevModuleGraph;
use crate::loader::LoaderResult;

/// Server-side compilation hook for `DevModuleGraph`.
///
/// A compiler transforms the module named by `id` and records whatever it
/// discovers (imports, compiled css) on `graph`. The graph marks the record
/// compiled once this returns `Ok`.
#[async_trait]
pub trait SsrCompiler: Send + Sync + Debug {
    async fn compile(&self, graph: &DevModuleGraph, id: &str) -> LoaderResult<()>;
}

/// Compiler that discovers nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCompiler;

#[async_trait]
impl SsrCompiler for NoopCompiler {
    async fn compile(&self, _graph: &DevModuleGraph, _id: &str) -> LoaderResult<()> {
        Ok(())
    }
}
