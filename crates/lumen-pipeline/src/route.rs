//! Route and component descriptions.

use serde::{Deserialize, Serialize};

/// A route the pipeline renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteData {
    /// Route path as authored, e.g. `/blog/[slug]`
    pub route: String,
    /// Module identifier of the page component
    pub component: String,
    /// Matching pattern source for the route
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub prerender: bool,
}

impl RouteData {
    pub fn new(route: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            component: component.into(),
            pattern: String::new(),
            prerender: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn prerendered(mut self, prerender: bool) -> Self {
        self.prerender = prerender;
        self
    }
}

/// Whether a component's assets must travel up to the page head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Propagation {
    /// No propagation barrier anywhere below the component
    #[default]
    None,
    /// Some module below the component defers its assets to render time
    InTree,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub component: String,
    /// Crawled module ids, in discovery order
    pub modules: Vec<String>,
    pub propagation: Propagation,
}

impl ComponentMetadata {
    pub fn has_propagation(&self) -> bool {
        self.propagation == Propagation::InTree
    }
}
