use std::path::Path;

use async_trait::async_trait;
use kube::config::Kubeconfig;

use super::ClusterControl;
use crate::error::{StoreError, StoreResult};
use crate::fsutil;

/// In-process kubeconfig editing, for hosts without `kubectl`.
#[derive(Debug, Clone, Default)]
pub struct BuiltinControl;

impl BuiltinControl {
    pub fn new() -> Self {
        Self
    }
}

fn read(file: &Path) -> StoreResult<Kubeconfig> {
    Kubeconfig::read_from(file).map_err(|e| StoreError::ExternalCommandFailed(format!("{}: {e}", file.display())))
}

fn write(file: &Path, config: &Kubeconfig) -> StoreResult<()> {
    let yaml = serde_yaml::to_string(config).map_err(|e| StoreError::Parse(e.to_string()))?;
    fsutil::write_atomic(file, yaml.as_bytes())
}

#[async_trait]
impl ClusterControl for BuiltinControl {
    async fn list_contexts(&self, file: &Path) -> StoreResult<Vec<String>> {
        let config = read(file)?;
        Ok(config.contexts.iter().map(|c| c.name.clone()).collect())
    }

    async fn delete_context(&self, file: &Path, name: &str) -> StoreResult<()> {
        let mut config = read(file)?;
        let before = config.contexts.len();
        config.contexts.retain(|c| c.name != name);
        if config.contexts.len() == before {
            return Err(StoreError::ExternalCommandFailed(format!("context {name} not found in {}", file.display())));
        }
        if config.current_context.as_deref() == Some(name) {
            config.current_context = None;
        }
        write(file, &config)
    }

    async fn rename_context(&self, file: &Path, old: &str, new: &str) -> StoreResult<()> {
        let mut config = read(file)?;
        if config.contexts.iter().any(|c| c.name == new) {
            return Err(StoreError::ExternalCommandFailed(format!("context {new} already exists in {}", file.display())));
        }
        let Some(entry) = config.contexts.iter_mut().find(|c| c.name == old) else {
            return Err(StoreError::ExternalCommandFailed(format!("context {old} not found in {}", file.display())));
        };
        entry.name = new.to_string();
        if config.current_context.as_deref() == Some(old) {
            config.current_context = Some(new.to_string());
        }
        write(file, &config)
    }
}
