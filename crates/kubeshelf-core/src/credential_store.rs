use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{StoreError, StoreResult};
use crate::fsutil;

/// Directory of imported kubeconfig files.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Regular, non-hidden files in the store, sorted by path. A missing
    /// directory is an empty store.
    pub fn files(&self) -> StoreResult<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || !entry.file_type()?.is_file() {
                continue;
            }
            files.push(absolute(&entry.path()));
        }
        files.sort();
        Ok(files)
    }

    /// Copies `src` into the store under `name` (or the source file name) and
    /// returns the stored path. An existing file with that name is replaced.
    pub fn import(&self, src: &Path, name: Option<&str>) -> StoreResult<PathBuf> {
        let file_name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => src
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| StoreError::NotFound(format!("file name of {}", src.display())))?,
        };
        if file_name.contains('/') || file_name.starts_with('.') {
            return Err(StoreError::Parse(format!("invalid credential file name: {file_name}")));
        }

        let contents = std::fs::read(src).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(src.display().to_string()),
            _ => e.into(),
        })?;
        let dest = absolute(&self.dir.join(file_name));
        fsutil::write_atomic(&dest, &contents)?;
        tracing::info!("Imported {} as {}", src.display(), dest.display());
        Ok(dest)
    }

    /// Whether `path` lives directly under the managed directory.
    pub fn manages(&self, path: &Path) -> bool {
        absolute(path).parent() == Some(absolute(&self.dir).as_path())
    }

    pub fn delete(&self, path: &Path) -> StoreResult<bool> {
        if !self.manages(path) {
            return Err(StoreError::NotFound(format!("{} is not a managed credential file", path.display())));
        }
        fsutil::remove_if_exists(path)
    }

    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        fsutil::modified_time(path)
    }
}

pub(crate) fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
