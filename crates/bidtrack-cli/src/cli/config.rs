//! Persisted CLI preferences.
//!
//! The selected company and store endpoint live in a small JSON file under
//! the platform config directory. A missing or unreadable file silently
//! falls back to defaults; preferences are conveniences, not state the tool
//! depends on.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use bidtrack_core::config::{CoreConfig, DEFAULT_POLL_INTERVAL_SECS};
use bidtrack_core::Company;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    pub company: Company,
    pub store_url: Option<String>,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            company: Company::Mhc,
            store_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl CliConfig {
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bidtrack").join("config.json"))
    }

    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring malformed config");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("no config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn core_config(&self) -> CoreConfig {
        CoreConfig {
            store_url: self.store_url.clone(),
            poll_interval_secs: self.poll_interval_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = CliConfig {
            company: Company::Hdd,
            store_url: Some("http://localhost:3000".into()),
            poll_interval_secs: 5,
        };
        config.save_to(&path).unwrap();

        let loaded = CliConfig::load_from(&path);
        assert_eq!(loaded.company, Company::Hdd);
        assert_eq!(loaded.store_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(loaded.poll_interval_secs, 5);
    }

    #[test]
    fn test_missing_file_defaults() {
        let dir = tempdir().unwrap();
        let loaded = CliConfig::load_from(&dir.path().join("nope.json"));
        assert_eq!(loaded.company, Company::Mhc);
        assert!(loaded.store_url.is_none());
    }

    #[test]
    fn test_malformed_file_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        let loaded = CliConfig::load_from(&path);
        assert_eq!(loaded.company, Company::Mhc);
    }
}
