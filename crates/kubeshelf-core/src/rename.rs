use std::path::Path;

use crate::cluster_control::ClusterControl;
use crate::error::StoreResult;
use crate::select::Selector;
use crate::session::Session;
use crate::shelf::Shelf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// New name was empty or equal to the old one.
    Unchanged,
    Renamed { selection_updated: bool, cache_migrated: bool },
}

/// Carries a context rename from the kubeconfig file through the registry,
/// the saved selection and the namespace cache.
pub struct RenamePropagator<'a> {
    control: &'a dyn ClusterControl,
}

impl<'a> RenamePropagator<'a> {
    pub fn new(control: &'a dyn ClusterControl) -> Self {
        Self { control }
    }

    /// Renames `old` to `new` inside `file`, and only once that succeeded,
    /// in every store. An empty or identical `new` keeps the original name.
    pub async fn rename(
        &self,
        shelf: &mut Shelf,
        session: &mut Session,
        file: &Path,
        old: &str,
        new: &str,
    ) -> StoreResult<RenameOutcome> {
        let new = new.trim();
        if new.is_empty() || new == old {
            return Ok(RenameOutcome::Unchanged);
        }

        self.control.rename_context(file, old, new).await?;

        if let Some(previous) = shelf.registry.lookup(new).filter(|f| *f != file) {
            tracing::warn!("Context {new} moves from {} to {}", previous.display(), file.display());
        }
        shelf.registry.rename(file, old, new);
        shelf.registry.save()?;

        let selection_updated = shelf.selection.rename_context(file, old, new)?;

        // Another file still defining `old` keeps its cache.
        let cache_migrated = !shelf.registry.contains(old) && shelf.namespaces.exists(old);
        if cache_migrated {
            shelf.namespaces.migrate(old, new)?;
        }

        session.rename_context(file, old, new);
        tracing::info!("Renamed context {old} -> {new} in {}", file.display());
        Ok(RenameOutcome::Renamed { selection_updated, cache_migrated })
    }

    /// Asks for a new name for each of `contexts` in `file` and applies the
    /// answers. Renames that fail are logged and skipped. Returns the
    /// `(old, new)` pairs that were applied.
    pub async fn offer(
        &self,
        shelf: &mut Shelf,
        session: &mut Session,
        selector: &mut dyn Selector,
        file: &Path,
        contexts: &[String],
    ) -> Vec<(String, String)> {
        let mut applied = Vec::new();
        for old in contexts {
            let prompt = format!("New name for context '{old}' from {} (empty keeps it)", file.display());
            let answer = selector.ask(&prompt, "");
            match self.rename(shelf, session, file, old, &answer).await {
                Ok(RenameOutcome::Renamed { .. }) => applied.push((old.clone(), answer.trim().to_string())),
                Ok(RenameOutcome::Unchanged) => {}
                Err(e) => tracing::warn!("Keeping context {old}: {e}"),
            }
        }
        applied
    }
}
