use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::ClusterControl;
use crate::error::{StoreError, StoreResult};

/// `kubectl config ...` invoked as a child process, one kubeconfig at a time.
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: PathBuf,
    timeout: Duration,
}

impl Kubectl {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { binary: binary.into(), timeout }
    }

    async fn run(&self, file: &Path, args: &[&str]) -> StoreResult<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .arg("--kubeconfig")
            .arg(file)
            .env_remove("KUBECONFIG")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let label = format!("{} {}", self.binary.display(), args.join(" "));
        tracing::debug!("Running {label} --kubeconfig {}", file.display());

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(StoreError::ExternalCommandFailed(format!("{label}: {e}"))),
            Err(_) => {
                return Err(StoreError::ExternalCommandFailed(format!(
                    "{label}: timed out after {}s",
                    self.timeout.as_secs()
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError::ExternalCommandFailed(format!("{label}: {}", stderr.trim())));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ClusterControl for Kubectl {
    async fn list_contexts(&self, file: &Path) -> StoreResult<Vec<String>> {
        let stdout = self.run(file, &["config", "get-contexts", "-o", "name"]).await?;
        Ok(parse_context_names(&stdout))
    }

    async fn delete_context(&self, file: &Path, name: &str) -> StoreResult<()> {
        self.run(file, &["config", "delete-context", name]).await.map(|_| ())
    }

    async fn rename_context(&self, file: &Path, old: &str, new: &str) -> StoreResult<()> {
        self.run(file, &["config", "rename-context", old, new]).await.map(|_| ())
    }
}

fn parse_context_names(stdout: &str) -> Vec<String> {
    stdout.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from).collect()
}
