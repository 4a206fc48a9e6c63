use std::path::{Path, PathBuf};

use crate::cluster_control::ClusterControl;
use crate::error::StoreResult;
use crate::shelf::Shelf;

#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub file: PathBuf,
    pub contexts: Vec<String>,
    /// Contexts that pointed at another file before this import.
    pub displaced: Vec<(String, PathBuf)>,
}

/// Copies `src` into the credential directory and maps its contexts to the
/// stored copy. Re-importing under an existing name replaces the old file
/// and its mappings.
pub async fn import(
    shelf: &mut Shelf,
    control: &dyn ClusterControl,
    src: &Path,
    name: Option<&str>,
) -> StoreResult<ImportReport> {
    let file = shelf.credentials.import(src, name)?;
    let stale = shelf.registry.remove_by_file(&file);
    if stale > 0 {
        tracing::debug!("Dropped {stale} mapping(s) of replaced file {}", file.display());
    }

    let before: Vec<(String, PathBuf)> =
        shelf.registry.records().iter().map(|r| (r.context_name.clone(), r.credential_file.clone())).collect();
    let contexts = shelf.registry.add_mappings_for_file(control, &file).await;
    shelf.registry.normalize();
    shelf.registry.save()?;

    let displaced = before.into_iter().filter(|(name, _)| contexts.contains(name)).collect();
    if contexts.is_empty() {
        tracing::warn!("{} defines no contexts yet", file.display());
    }
    Ok(ImportReport { file, contexts, displaced })
}
