use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{ProphetError, Result};
use crate::fetcher::DEFAULT_BASE_URL;
use crate::models::OverviewType;
use crate::storage::OutputPaths;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub enabled: bool,
    /// League whose listings supply icons; icons rarely change between leagues.
    pub league: String,
    pub item_types: Vec<OverviewType>,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub base_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            league: "Standard".to_string(),
            item_types: OverviewType::ALL.to_vec(),
            concurrency: 4,
            timeout_secs: 10,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl IconConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub processed_file: String,
    pub raw_file: String,
    pub icons: IconConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("src/data"),
            processed_file: "processedData.js".to_string(),
            raw_file: "rawData.json".to_string(),
            icons: IconConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ProphetError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.icons.concurrency == 0 {
            return Err(ProphetError::ConfigError("icons.concurrency must be at least 1".to_string()));
        }
        if self.icons.timeout_secs == 0 {
            return Err(ProphetError::ConfigError("icons.timeout_secs must be at least 1".to_string()));
        }
        if self.processed_file.is_empty() || self.raw_file.is_empty() {
            return Err(ProphetError::ConfigError("output file names must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::new(&self.data_dir, &self.processed_file, &self.raw_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("src/data"));
        assert!(config.icons.enabled);
        assert_eq!(config.icons.item_types.len(), 26);
        assert_eq!(config.output_paths().raw_json, PathBuf::from("src/data/rawData.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            data_dir = "exports"

            [icons]
            league = "Settlers"
            item_types = ["Currency", "Scarab"]
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("exports"));
        assert_eq!(config.processed_file, "processedData.js");
        assert_eq!(config.icons.league, "Settlers");
        assert_eq!(config.icons.item_types, vec![OverviewType::Currency, OverviewType::Scarab]);
        assert_eq!(config.icons.concurrency, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml("[icons]\nconcurrency = 0\n").unwrap_err();
        assert!(matches!(err, ProphetError::ConfigError(_)));

        let err = Config::from_toml("[icons]\nitem_types = [\"NotAType\"]\n").unwrap_err();
        assert!(matches!(err, ProphetError::ConfigError(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prophet.toml");
        std::fs::write(&path, "raw_file = \"dump.json\"\n[icons]\nenabled = false\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.raw_file, "dump.json");
        assert!(!config.icons.enabled);

        assert!(Config::from_file(dir.path().join("missing.toml")).is_err());
    }
}
