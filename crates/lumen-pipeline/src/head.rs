//! Elements injected into a rendered page's `<head>`.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use lumen_graph::ModuleNode;
use lumen_graph::id::{is_style_request, unwrap_id};

/// Url of the dev client script served by the dev server.
pub const DEV_CLIENT_URL: &str = "/@vite/client";

/// Inline `<style>` carrying the compiled CSS of one module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StyleElement {
    /// Module the CSS came from
    pub module_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkElement {
    pub rel: String,
    pub href: String,
}

impl LinkElement {
    pub fn stylesheet(href: impl Into<String>) -> Self {
        Self {
            rel: "stylesheet".to_string(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptElement {
    pub src: String,
    /// Rendered as `type="module"`
    pub module: bool,
}

impl ScriptElement {
    pub fn module(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            module: true,
        }
    }
}

/// Head elements for one page, each kind in first-seen order without
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadElements {
    pub styles: IndexSet<StyleElement>,
    pub links: IndexSet<LinkElement>,
    pub scripts: IndexSet<ScriptElement>,
}

impl HeadElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record whatever `module` contributes to the head.
    ///
    /// Style modules become an inline style when their compiled CSS is known
    /// and a stylesheet link to their url otherwise. Modules whose id carries
    /// `script_query` become module scripts. Returns false for modules that
    /// contribute nothing.
    pub fn collect(&mut self, module: &ModuleNode, script_query: &str) -> bool {
        let Some(id) = module.id() else {
            return false;
        };

        if is_style_request(&unwrap_id(id)) {
            match &module.css {
                Some(css) => {
                    self.styles.insert(StyleElement {
                        module_id: id.to_string(),
                        content: css.clone(),
                    });
                }
                None => self.push_link(LinkElement::stylesheet(url_of(module, id))),
            }
            return true;
        }

        if is_script_request(id, script_query) {
            self.scripts.insert(ScriptElement::module(url_of(module, id)));
            return true;
        }

        false
    }

    /// Add a link unless one with the same href is already present.
    pub fn push_link(&mut self, link: LinkElement) {
        if !self.links.iter().any(|existing| existing.href == link.href) {
            self.links.insert(link);
        }
    }

    pub fn len(&self) -> usize {
        self.styles.len() + self.links.len() + self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn url_of(module: &ModuleNode, id: &str) -> String {
    if module.url.is_empty() {
        id.to_string()
    } else {
        module.url.clone()
    }
}

fn is_script_request(id: &str, script_query: &str) -> bool {
    match id.split_once('?') {
        Some((_, query)) => !script_query.is_empty() && query.split('&').any(|part| part == script_query),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_graph::NodeKey;

    fn node(id: &str) -> lumen_graph::ModuleNodeBuilder {
        ModuleNode::builder(NodeKey::new(0), id)
    }

    #[test]
    fn test_style_with_css_is_inlined() {
        let mut head = HeadElements::new();
        let module = node("/src/styles/global.css").css("body{}").build();

        assert!(head.collect(&module, "type=script"));
        assert_eq!(head.styles.len(), 1);
        assert!(head.links.is_empty());
        assert_eq!(head.styles[0].content, "body{}");
    }

    #[test]
    fn test_style_without_css_is_linked() {
        let mut head = HeadElements::new();
        let module = node("/src/Card.astro?astro&type=style&index=0&lang.css")
            .url("/@fs/app/src/Card.astro?astro&type=style&index=0&lang.css")
            .build();

        assert!(head.collect(&module, "type=script"));
        assert_eq!(
            head.links[0],
            LinkElement::stylesheet("/@fs/app/src/Card.astro?astro&type=style&index=0&lang.css")
        );
    }

    #[test]
    fn test_duplicate_hrefs_are_dropped() {
        let mut head = HeadElements::new();
        head.push_link(LinkElement::stylesheet("/a.css"));
        head.push_link(LinkElement {
            rel: "preload".to_string(),
            href: "/a.css".to_string(),
        });
        assert_eq!(head.links.len(), 1);
    }

    #[test]
    fn test_script_query_matches_whole_parameter() {
        assert!(is_script_request("/src/A.astro?astro&type=script&index=0&lang.ts", "type=script"));
        assert!(!is_script_request("/src/A.astro?astro&type=scripts", "type=script"));
        assert!(!is_script_request("/src/type=script.ts", "type=script"));
    }

    #[test]
    fn test_plain_modules_contribute_nothing() {
        let mut head = HeadElements::new();
        assert!(!head.collect(&node("/src/components/Card.astro").build(), "type=script"));
        assert!(head.is_empty());
    }
}
