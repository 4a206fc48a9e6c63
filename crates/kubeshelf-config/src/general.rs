use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(alias = "confirm-remove")]
    pub confirm_remove: bool,
    #[serde(alias = "default-namespace")]
    pub default_namespace: String,
    #[serde(alias = "prompt-on-new-contexts")]
    pub prompt_on_new_contexts: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { confirm_remove: true, default_namespace: "default".into(), prompt_on_new_contexts: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlBackend {
    Kubectl,
    Builtin,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KubectlConfig {
    pub binary: String,
    #[serde(alias = "timeout-secs")]
    pub timeout_secs: u64,
    pub backend: ControlBackend,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self { binary: "kubectl".into(), timeout_secs: 15, backend: ControlBackend::Kubectl }
    }
}
