use lumen_graph::ModuleNode;

/// Whether `candidate` is a real static import of `parent`.
///
/// The importer-side record is the only one trusted: the forward edges of a
/// dev graph also carry entries added by hot-reload bookkeeping, and
/// following those would preload styles of unrelated modules.
pub fn is_imported_by(parent: &str, candidate: &ModuleNode) -> bool {
    candidate.has_importer(parent)
}
