use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use super::ClusterControl;
use crate::error::{StoreError, StoreResult};

/// In-memory kubeconfig contents keyed by file path.
#[derive(Default)]
pub struct FakeControl {
    files: Mutex<BTreeMap<PathBuf, Vec<String>>>,
    broken: Mutex<HashSet<PathBuf>>,
}

impl FakeControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&self, file: impl Into<PathBuf>, contexts: &[&str]) {
        let contexts = contexts.iter().map(|c| c.to_string()).collect();
        self.files.lock().unwrap().insert(file.into(), contexts);
    }

    /// Every call against `file` fails from now on.
    pub fn break_file(&self, file: impl Into<PathBuf>) {
        self.broken.lock().unwrap().insert(file.into());
    }

    pub fn contexts(&self, file: &Path) -> Vec<String> {
        self.files.lock().unwrap().get(file).cloned().unwrap_or_default()
    }

    fn check(&self, file: &Path) -> StoreResult<()> {
        if self.broken.lock().unwrap().contains(file) {
            return Err(StoreError::ExternalCommandFailed(format!("broken: {}", file.display())));
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterControl for FakeControl {
    async fn list_contexts(&self, file: &Path) -> StoreResult<Vec<String>> {
        self.check(file)?;
        Ok(self.contexts(file))
    }

    async fn delete_context(&self, file: &Path, name: &str) -> StoreResult<()> {
        self.check(file)?;
        let mut files = self.files.lock().unwrap();
        let contexts = files.get_mut(file).ok_or_else(|| StoreError::ExternalCommandFailed("no file".into()))?;
        contexts.retain(|c| c != name);
        Ok(())
    }

    async fn rename_context(&self, file: &Path, old: &str, new: &str) -> StoreResult<()> {
        self.check(file)?;
        let mut files = self.files.lock().unwrap();
        let contexts = files.get_mut(file).ok_or_else(|| StoreError::ExternalCommandFailed("no file".into()))?;
        let entry = contexts
            .iter_mut()
            .find(|c| c.as_str() == old)
            .ok_or_else(|| StoreError::ExternalCommandFailed(format!("no context {old}")))?;
        *entry = new.to_string();
        Ok(())
    }
}
