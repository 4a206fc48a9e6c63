use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::fsutil;

mod codec;

/// The last chosen kubeconfig, context and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub credential_file: PathBuf,
    pub context: String,
    pub namespace: String,
}

#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the stored selection as a whole.
    pub fn save(&self, selection: &Selection) -> StoreResult<()> {
        let fields = [selection.credential_file.to_string_lossy().into_owned(), selection.context.clone()];
        if fields.iter().chain([&selection.namespace]).any(|f| f.contains('\n') || f.contains('\r')) {
            return Err(StoreError::Parse("selection fields must be single-line".into()));
        }
        if fields.iter().any(|f| f.is_empty()) {
            return Err(StoreError::NoSelection);
        }
        fsutil::write_atomic(&self.path, codec::render(selection).as_bytes())?;
        tracing::info!(
            "Saved selection {} / {} / {}",
            selection.credential_file.display(),
            selection.context,
            selection.namespace
        );
        Ok(())
    }

    /// The stored selection, or `None` if there is none. An unreadable or
    /// malformed record counts as no selection.
    pub fn load(&self) -> StoreResult<Option<Selection>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match codec::parse(&contents) {
            Ok(selection) => Ok(Some(selection)),
            Err(e) => {
                tracing::warn!("Ignoring saved selection at {}: {e}", self.path.display());
                Ok(None)
            }
        }
    }

    pub fn clear(&self) -> StoreResult<bool> {
        fsutil::remove_if_exists(&self.path)
    }

    /// Whether the stored selection names `context`.
    pub fn references(&self, context: &str) -> StoreResult<bool> {
        Ok(self.load()?.is_some_and(|s| s.context == context))
    }

    /// Rewrites the stored context name from `old` to `new` when the
    /// selection points at `file`, keeping the namespace. Returns whether a
    /// rewrite happened.
    pub fn rename_context(&self, file: &Path, old: &str, new: &str) -> StoreResult<bool> {
        match self.load()? {
            Some(mut selection) if selection.context == old && selection.credential_file == file => {
                selection.context = new.to_string();
                self.save(&selection)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
