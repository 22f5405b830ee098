//! Error types for the rendering pipeline.
//!
//! Crawling itself never fails; what can fail is loading configuration,
//! compiling the page component the crawl starts from, and resolving a
//! specifier a renderer hands in.

use std::path::PathBuf;

use lumen_graph::LoaderError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Top-level pipeline error type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be loaded or did not validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The graph failed to compile the route component
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    /// The specifier cannot be turned into a dev url
    #[error("Cannot resolve specifier '{0}'")]
    Resolve(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },
}
