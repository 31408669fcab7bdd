use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Identifier source, one `id,callsign[,...]` record per line
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Seconds between background reloads, 0 disables reloading
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,

    /// How often the reload task checks for a stop request
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_source() -> PathBuf {
    PathBuf::from("NXDN.csv")
}

fn default_reload_interval_secs() -> u64 {
    24 * 60 * 60
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            reload_interval_secs: default_reload_interval_secs(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl LookupConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LookupConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("source path is empty".to_string()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config: LookupConfig = toml::from_str(r#"source = "/etc/NXDN.csv""#).unwrap();

        assert_eq!(config.source, PathBuf::from("/etc/NXDN.csv"));
        assert_eq!(config.reload_interval(), Duration::from_secs(86400));
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(!config.reload_interval().is_zero());
    }

    #[test]
    fn test_zero_interval_disables_reload() {
        let config = LookupConfig {
            reload_interval_secs: 0,
            ..LookupConfig::default()
        };
        assert!(config.reload_interval().is_zero());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = LookupConfig::default();
        config.poll_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = LookupConfig {
            source: PathBuf::new(),
            ..LookupConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lookup.toml");
        std::fs::write(
            &path,
            "source = \"ids.csv\"\nreload_interval_secs = 0\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let config = LookupConfig::from_file(&path).unwrap();
        assert_eq!(config.source, PathBuf::from("ids.csv"));
        assert!(config.reload_interval().is_zero());
        assert_eq!(config.poll_interval(), Duration::from_millis(250));

        assert!(matches!(
            LookupConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
