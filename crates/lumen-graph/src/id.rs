//! Module identifier rules.
//!
//! Identifiers coming out of the dev graph can carry transport decorations
//! (the `/@id/` prefix, the `__x00__` null-byte escape) and a `?query` suffix
//! used for out-of-band signaling. Extension checks run on the normalized
//! form; graph lookups and marker checks always use the raw identifier.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Prefix the dev server puts in front of ids that are not valid URLs.
pub const TRANSPORT_ID_PREFIX: &str = "/@id/";

/// Escape used for the `\0` prefix of virtual module ids in URLs.
pub const NULL_BYTE_PLACEHOLDER: &str = "__x00__";

/// Query marker that turns a module into a propagation barrier.
pub const PROPAGATED_ASSETS_MARKER: &str = "?astroPropagatedAssets";

/// Style languages a dev server treats as CSS requests.
pub const STYLE_EXTENSIONS: &[&str] = &[
    "css", "less", "sass", "scss", "styl", "stylus", "pcss", "postcss", "sss",
];

static STYLE_REQUEST: LazyLock<Regex> = LazyLock::new(|| {
    let langs = STYLE_EXTENSIONS.join("|");
    Regex::new(&format!(r"\.({langs})(?:$|\?)")).expect("style request pattern is valid")
});

/// Strip transport decorations and the query suffix from a raw identifier.
///
/// ```
/// use lumen_graph::id::normalize_id;
///
/// assert_eq!(normalize_id("/src/pages/index.astro?astro&type=style"), "/src/pages/index.astro");
/// assert_eq!(normalize_id("/@id/__x00__virtual:icons"), "\0virtual:icons");
/// assert_eq!(normalize_id("virtual:image-loader"), "virtual:image-loader");
/// ```
pub fn normalize_id(raw: &str) -> Cow<'_, str> {
    match unwrap_id(raw) {
        Cow::Borrowed(id) => Cow::Borrowed(strip_query(id)),
        Cow::Owned(id) => Cow::Owned(strip_query(&id).to_string()),
    }
}

/// Undo the transport decorations of an identifier, keeping its query.
///
/// ```
/// use lumen_graph::id::unwrap_id;
///
/// assert_eq!(unwrap_id("/@id/__x00__astro:content?lang.css"), "\0astro:content?lang.css");
/// assert_eq!(unwrap_id("/src/a.astro?astro&type=style"), "/src/a.astro?astro&type=style");
/// ```
pub fn unwrap_id(raw: &str) -> Cow<'_, str> {
    let unwrapped = raw.strip_prefix(TRANSPORT_ID_PREFIX).unwrap_or(raw);

    if unwrapped.contains(NULL_BYTE_PLACEHOLDER) {
        Cow::Owned(unwrapped.replace(NULL_BYTE_PLACEHOLDER, "\0"))
    } else {
        Cow::Borrowed(unwrapped)
    }
}

/// Everything before the first `?`.
///
/// This deliberately does not go through URL parsing: ids such as
/// `virtual:image-loader` are not valid URLs.
pub fn strip_query(id: &str) -> &str {
    match id.find('?') {
        Some(idx) => &id[..idx],
        None => id,
    }
}

/// True when the id names a style module.
///
/// Runs on the unwrapped id with its query: style blocks of components are
/// addressed as `Card.astro?astro&type=style&index=0&lang.css`.
pub fn is_style_request(id: &str) -> bool {
    STYLE_REQUEST.is_match(id)
}

/// File extension of an identifier, including the leading dot.
///
/// The query suffix is ignored. Dotfiles without a further extension
/// (`/src/.env`) have no extension.
pub fn extension_of(id: &str) -> &str {
    let path = strip_query(id);
    let base = match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    };
    match base.rfind('.') {
        Some(0) | None => "",
        Some(idx) => &base[idx..],
    }
}

/// True when the raw identifier carries `marker`.
pub fn has_marker(raw: &str, marker: &str) -> bool {
    !marker.is_empty() && raw.contains(marker)
}

/// True for ids that have no backing file (`virtual:*` and `\0`-prefixed ids).
pub fn is_virtual(id: &str) -> bool {
    let normalized = normalize_id(id);
    normalized.starts_with('\0') || normalized.starts_with("virtual:")
}
