pub mod general;
pub mod paths;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use general::{ControlBackend, GeneralConfig, KubectlConfig};
pub use paths::PathsConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub kubectl: KubectlConfig,
}

pub const DEFAULT_CONFIG: &str = include_str!("defaults.toml");

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded defaults must parse")
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::default_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                        Ok(user) => config.merge(user),
                        Err(e) => eprintln!("Warning: invalid config at {}: {e}", path.display()),
                    },
                    Err(e) => eprintln!("Warning: could not read {}: {e}", path.display()),
                }
            }
        }

        config
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let contents = std::fs::read_to_string(path)?;
        let user: AppConfig = toml::from_str(&contents)?;
        config.merge(user);
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("kubeshelf").join("config.toml"))
    }

    /// Writes the commented defaults to the default path.
    pub fn init_default() -> anyhow::Result<PathBuf> {
        let path = Self::default_path().ok_or_else(|| anyhow::anyhow!("No config directory on this system"))?;
        Self::write_default(&path)?;
        Ok(path)
    }

    /// Writes the commented defaults to `path`, never replacing an existing file.
    pub fn write_default(path: &Path) -> anyhow::Result<()> {
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, DEFAULT_CONFIG)?;
        Ok(())
    }

    fn merge(&mut self, user: AppConfig) {
        self.general = user.general;
        self.kubectl = user.kubectl;

        // Paths: only non-empty user values override
        if !user.paths.credential_dir.trim().is_empty() {
            self.paths.credential_dir = user.paths.credential_dir;
        }
        if !user.paths.state_dir.trim().is_empty() {
            self.paths.state_dir = user.paths.state_dir;
        }
    }

    pub fn command_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.kubectl.timeout_secs.max(1))
    }

    pub fn credential_dir(&self) -> PathBuf {
        self.paths.resolved_credential_dir()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.paths.resolved_state_dir()
    }
}

#[cfg(test)]
mod tests;
