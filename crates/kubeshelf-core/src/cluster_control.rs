use std::path::Path;

use async_trait::async_trait;

use crate::error::StoreResult;

mod builtin;
#[cfg(test)]
pub(crate) mod fake;
mod kubectl;

pub use builtin::BuiltinControl;
pub use kubectl::Kubectl;

/// Reads and mutates the contexts defined inside one kubeconfig file.
///
/// Every call is independently failable. Callers decide whether a failure
/// gates the operation or only degrades it.
#[async_trait]
pub trait ClusterControl: Send + Sync {
    async fn list_contexts(&self, file: &Path) -> StoreResult<Vec<String>>;

    async fn delete_context(&self, file: &Path, name: &str) -> StoreResult<()>;

    async fn rename_context(&self, file: &Path, old: &str, new: &str) -> StoreResult<()>;
}
