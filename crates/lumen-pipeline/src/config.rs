//! Pipeline configuration.
//!
//! Sources, lowest priority first: built-in defaults, a `lumen.toml` file
//! (explicit path, or discovered in the working directory), then `LUMEN_`
//! environment variables. Nested keys use a double underscore:
//! `LUMEN_CRAWL__MAX_DEPTH=4`.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use lumen_crawl::CrawlOptions;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::logging::LogLevel;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lumen.toml";

/// Environment prefix for overrides.
pub const ENV_PREFIX: &str = "LUMEN_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingSlash {
    #[default]
    Ignore,
    Always,
    Never,
}

/// Site-level settings shared by every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsrManifest {
    pub adapter_name: Option<String>,
    pub site: Option<String>,
    pub base: String,
    pub trailing_slash: TrailingSlash,
    pub compress_html: bool,
    /// Names of the hydration directives renderers may use (`load`, `idle`, ...)
    pub client_directives: Vec<String>,
}

impl Default for SsrManifest {
    fn default() -> Self {
        Self {
            adapter_name: None,
            site: None,
            base: "/".to_string(),
            trailing_slash: TrailingSlash::default(),
            compress_html: true,
            client_directives: ["idle", "load", "media", "only", "visible"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// A framework renderer registered with the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererInfo {
    pub name: String,
    #[serde(default)]
    pub client_entrypoint: Option<String>,
    pub server_entrypoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mode: RuntimeMode,
    /// Whether routes render on demand rather than being prerendered
    pub server_like: bool,
    pub streaming: bool,
    /// Project root; absolute specifiers under it resolve to root-relative urls
    pub root: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Query fragment that marks a component's hoisted script module
    pub script_query: String,
    pub manifest: SsrManifest,
    pub renderers: Vec<RendererInfo>,
    pub crawl: CrawlOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::default(),
            server_like: false,
            streaming: true,
            root: None,
            log_level: LogLevel::default(),
            script_query: "type=script".to_string(),
            manifest: SsrManifest::default(),
            renderers: Vec::new(),
            crawl: CrawlOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicit `config_path` must exist. Without one, `lumen.toml` in the
    /// working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment)
    }

    /// Extract from an already assembled figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: e.path.join("."),
            hint: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.manifest.base.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "manifest.base".to_string(),
                hint: format!("base must start with '/', got '{}'", self.manifest.base),
            }
            .into());
        }
        if self.script_query.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "script_query".to_string(),
                hint: "script query must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.mode == RuntimeMode::Development
    }
}
