use crate::error::{LumbungError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Environment variable overriding the data directory location.
pub const DATA_DIR_ENV: &str = "LUMBUNG_DATA";

/// Store configuration, persisted as `config.json` alongside the record
/// files. Unknown locations resolve through [`DATA_DIR_ENV`] and then
/// the platform data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    /// Explicit data directory. `None` defers to the environment and
    /// platform defaults.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Persist record lists as pretty-printed JSON.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            pretty: true,
        }
    }
}

impl StoreConfig {
    /// Load the configuration from `dir/config.json`. A missing file is
    /// not an error and yields the defaults.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration to `dir/config.json`, creating the
    /// directory if needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Resolve the directory record files live in: the explicit
    /// `data_dir` if set, else [`DATA_DIR_ENV`], else the platform data
    /// directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        if let Ok(dir) = env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        ProjectDirs::from("com", "lumbung", "lumbung")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                LumbungError::Backend("Could not determine a data directory".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_without_a_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load(dir.path()).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(config.pretty);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/var/lib/lumbung")),
            pretty: false,
        };
        config.save(dir.path()).unwrap();

        let loaded = StoreConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
        assert!(dir.path().join(CONFIG_FILENAME).exists());
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        StoreConfig::default().save(&nested).unwrap();
        assert!(nested.join(CONFIG_FILENAME).exists());
    }

    #[test]
    fn test_partial_config_files_fall_back_per_field() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{\"pretty\": false}").unwrap();

        let loaded = StoreConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.data_dir, None);
        assert!(!loaded.pretty);
    }

    #[test]
    fn test_explicit_data_dir_wins_resolution() {
        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/tmp/somewhere")),
            pretty: true,
        };
        assert_eq!(
            config.resolve_data_dir().unwrap(),
            PathBuf::from("/tmp/somewhere")
        );
    }
}
