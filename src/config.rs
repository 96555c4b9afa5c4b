use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the attendance backend, without the `/api` suffix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".attendance-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the saved config
    ///
    /// `Ok(None)` means there is no config file yet. A file that exists but
    /// cannot be read or parsed is an error, and is left as it is.
    pub fn load() -> anyhow::Result<Option<Config>> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        Self::load_from(&config_path)
    }

    fn load_from(path: &Path) -> anyhow::Result<Option<Config>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(config))
    }

    fn from_json(contents: &str) -> anyhow::Result<Config> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&config_path)
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(config_dir) = path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn with_overrides(mut self, api_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.api_base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.request_timeout_secs = secs;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_json(r#"{"api_base_url": "http://10.0.0.5:8000"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:8000");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(Config::from_json("{not json").is_err());
    }

    fn scratch_path(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("attendance-tui-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir.join("config.json")
    }

    #[test]
    fn test_missing_file_loads_none() {
        let path = scratch_path("missing");
        assert!(Config::load_from(&path).unwrap().is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error_and_kept() {
        let path = scratch_path("malformed");
        let contents = r#"{"api_base_url": "http://x",}"#;
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("saved");
        let config = Config::default().with_overrides(Some("http://10.0.0.5:8000".to_string()), Some(3));
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Some(config));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some("http://api:9000".to_string()), None);
        assert_eq!(config.api_base_url, "http://api:9000");
        assert_eq!(config.request_timeout_secs, 10);

        let config = Config::default().with_overrides(None, Some(0));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
