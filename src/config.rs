use crate::app_dirs::AppDirs;
use crate::display::DEFAULT_HISTORY_ROWS;
use crate::error::{CtResult, CubeTimeError};
use crate::session::SessionOptions;
use crate::storage::{JsonFileKvStore, KvStore, SqliteKvStore};
use crate::timer::DEFAULT_TICK_MS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub tick_ms: u64,
    pub history_rows: usize,
    pub storage: StorageBackend,
    pub show_tips: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            history_rows: DEFAULT_HISTORY_ROWS,
            storage: StorageBackend::Sqlite,
            show_tips: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> CtResult<()> {
        if self.tick_ms == 0 || self.tick_ms > 1_000 {
            return Err(CubeTimeError::Config(format!(
                "tick_ms must be between 1 and 1000, got {}",
                self.tick_ms
            )));
        }
        if self.history_rows == 0 {
            return Err(CubeTimeError::Config(
                "history_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Open the configured backend, at `path` when given, otherwise in the
    /// state directory
    pub fn open_store(&self, path: Option<&Path>) -> CtResult<Box<dyn KvStore>> {
        let default_path = match self.storage {
            StorageBackend::Sqlite => AppDirs::db_path(),
            StorageBackend::Json => AppDirs::json_store_path(),
        };
        let path = path.map(Path::to_path_buf).or(default_path).ok_or_else(|| {
            CubeTimeError::Config("could not resolve a data directory".to_string())
        })?;

        tracing::info!(backend = %self.storage, path = %path.display(), "opening solve storage");
        Ok(match self.storage {
            StorageBackend::Sqlite => Box::new(SqliteKvStore::open(&path)?),
            StorageBackend::Json => Box::new(JsonFileKvStore::with_path(&path)),
        })
    }
}

impl From<&Config> for SessionOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            tick_period: Duration::from_millis(cfg.tick_ms),
            history_rows: cfg.history_rows,
            show_tips: cfg.show_tips,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("cubetime_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("ignoring malformed config {}: {}", self.path.display(), e),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = Config {
            tick_ms: 50,
            history_rows: 12,
            storage: StorageBackend::Json,
            show_tips: false,
        };
        store.save(&cfg).unwrap();
        assert_eq!(cfg, store.load());
    }

    #[test]
    fn missing_or_malformed_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());

        fs::write(&path, "{{{").unwrap();
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"storage":"json"}"#).unwrap();

        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.storage, StorageBackend::Json);
        assert_eq!(cfg.tick_ms, DEFAULT_TICK_MS);
        assert_eq!(cfg.history_rows, DEFAULT_HISTORY_ROWS);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(Config::default().validate().is_ok());

        let cfg = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(CubeTimeError::Config(_)));

        let cfg = Config {
            history_rows: 0,
            ..Config::default()
        };
        assert_matches!(cfg.validate(), Err(CubeTimeError::Config(_)));
    }

    #[test]
    fn session_options_from_config() {
        let opts = SessionOptions::from(&Config {
            tick_ms: 25,
            history_rows: 3,
            storage: StorageBackend::Sqlite,
            show_tips: false,
        });
        assert_eq!(opts.tick_period, Duration::from_millis(25));
        assert_eq!(opts.history_rows, 3);
        assert!(!opts.show_tips);
    }

    #[test]
    fn open_store_at_explicit_path() {
        let dir = tempdir().unwrap();
        for (backend, file) in [
            (StorageBackend::Sqlite, "solves.db"),
            (StorageBackend::Json, "solves.json"),
        ] {
            let cfg = Config {
                storage: backend,
                ..Config::default()
            };
            let path = dir.path().join(file);
            let mut store = cfg.open_store(Some(&path)).unwrap();
            store.set("k", "v").unwrap();
            assert!(path.exists());

            let reopened = cfg.open_store(Some(&path)).unwrap();
            assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        }
    }

    #[test]
    fn storage_backend_display() {
        assert_eq!(StorageBackend::Sqlite.to_string(), "sqlite");
        assert_eq!(StorageBackend::Json.to_string(), "json");
    }
}
