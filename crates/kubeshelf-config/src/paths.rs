use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(alias = "credential-dir")]
    pub credential_dir: String,
    #[serde(alias = "state-dir")]
    pub state_dir: String,
}

impl PathsConfig {
    /// Directory holding imported kubeconfig files.
    pub fn resolved_credential_dir(&self) -> PathBuf {
        if self.credential_dir.trim().is_empty() {
            return home_dir().join(".kube").join("configs");
        }
        expand_home(&self.credential_dir)
    }

    /// Directory holding the registry, saved selection and namespace cache.
    pub fn resolved_state_dir(&self) -> PathBuf {
        if self.state_dir.trim().is_empty() {
            return dirs::data_dir().unwrap_or_else(|| home_dir().join(".local").join("share")).join("kubeshelf");
        }
        expand_home(&self.state_dir)
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub(crate) fn expand_home(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw == "~" {
        return home_dir();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(raw),
    }
}
