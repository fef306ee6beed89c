//! Application configuration.
//!
//! Settings come from a YAML file when one is found, then environment
//! variables override individual values:
//!
//! - `MEMBERSHIP_TRACKER_CONFIG`: path of the YAML file (default `config.yaml`
//!   in the working directory, skipped when absent)
//! - `MEMBERSHIP_TRACKER_BIND`: listen address
//! - `MEMBERSHIP_TRACKER_DATA_DIR`: CSV data directory
//! - `SUPABASE_URL` and `SUPABASE_KEY`: switch to the hosted store

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "MEMBERSHIP_TRACKER_CONFIG";
pub const BIND_VAR: &str = "MEMBERSHIP_TRACKER_BIND";
pub const DATA_DIR_VAR: &str = "MEMBERSHIP_TRACKER_DATA_DIR";
pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_KEY";

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Where users and payments are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    Csv { data_directory: PathBuf },
    Supabase { url: String, key: String },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Csv {
            data_directory: default_data_directory(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_address: String,
    /// Origin allowed by CORS
    pub frontend_origin: String,
    pub storage: StorageConfig,
    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            frontend_origin: "http://localhost:8080".to_string(),
            storage: StorageConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from file and environment. Also returns the file that was read,
    /// if any, so the caller can log it once tracing is set up.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// [`AppConfig::load`] with variables read through `lookup`
    pub fn load_with<F>(lookup: F) -> Result<(Self, Option<PathBuf>)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = config_path(&lookup);
        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(lookup);
        Ok((config, path))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_VAR) {
            self.bind_address = bind;
        }

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            self.storage = StorageConfig::Csv {
                data_directory: PathBuf::from(dir),
            };
        }

        if let (Some(url), Some(key)) = (lookup(SUPABASE_URL_VAR), lookup(SUPABASE_KEY_VAR)) {
            self.storage = StorageConfig::Supabase { url, key };
        }
    }
}

/// The file named by `MEMBERSHIP_TRACKER_CONFIG`, else `config.yaml` when it
/// exists in the working directory
pub fn config_path<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(CONFIG_PATH_VAR) {
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
    }
}

/// `~/Documents/Membership Tracker`, falling back to the home directory and
/// then the working directory
pub fn default_data_directory() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Membership Tracker")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1:3000");
        assert_eq!(config.frontend_origin, "http://localhost:8080");
        assert_eq!(config.log_filter, "info");
        match config.storage {
            StorageConfig::Csv { data_directory } => assert!(data_directory.ends_with("Membership Tracker")),
            other => panic!("unexpected storage: {other:?}"),
        }
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("bind_address: 0.0.0.0:8000\n").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.frontend_origin, "http://localhost:8080");
    }

    #[test]
    fn test_yaml_supabase_storage() {
        let yaml = "storage:\n  kind: supabase\n  url: https://example.supabase.co\n  key: secret\nlog_filter: debug\n";
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Supabase {
                url: "https://example.supabase.co".to_string(),
                key: "secret".to_string(),
            }
        );
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(AppConfig::from_yaml("storage:\n  kind: floppy\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "storage:\n  kind: csv\n  data_directory: /srv/members\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Csv {
                data_directory: PathBuf::from("/srv/members")
            }
        );

        assert!(AppConfig::from_file(&temp_dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_load_reports_the_file_it_read() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("tracker.yaml");
        fs::write(&path, "bind_address: 0.0.0.0:8000\nlog_filter: debug\n").unwrap();
        let path_str = path.to_string_lossy().to_string();

        let (config, source) =
            AppConfig::load_with(env(&[(CONFIG_PATH_VAR, path_str.as_str()), (BIND_VAR, "0.0.0.0:9000")])).unwrap();

        assert_eq!(source, Some(path.clone()));
        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_load_fails_on_missing_named_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.yaml").to_string_lossy().to_string();
        assert!(AppConfig::load_with(env(&[(CONFIG_PATH_VAR, missing.as_str())])).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[(BIND_VAR, "0.0.0.0:9000"), (DATA_DIR_VAR, "/tmp/members")]));

        assert_eq!(config.bind_address, "0.0.0.0:9000");
        assert_eq!(
            config.storage,
            StorageConfig::Csv {
                data_directory: PathBuf::from("/tmp/members")
            }
        );
    }

    #[test]
    fn test_supabase_needs_both_variables() {
        let mut config = AppConfig::default();
        config.apply_overrides(env(&[(SUPABASE_URL_VAR, "https://example.supabase.co")]));
        assert!(matches!(config.storage, StorageConfig::Csv { .. }));

        config.apply_overrides(env(&[
            (SUPABASE_URL_VAR, "https://example.supabase.co"),
            (SUPABASE_KEY_VAR, "secret"),
        ]));
        assert!(matches!(config.storage, StorageConfig::Supabase { .. }));
    }
}
