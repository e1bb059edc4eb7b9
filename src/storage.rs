use crate::error::{CtResult, CubeTimeError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Persistent string key-value store the solve history is written to
pub trait KvStore {
    fn get(&self, key: &str) -> CtResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> CtResult<()>;
}

impl<K: KvStore + ?Sized> KvStore for Box<K> {
    fn get(&self, key: &str) -> CtResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CtResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed store with a single `kv` table
#[derive(Debug)]
pub struct SqliteKvStore {
    conn: Connection,
}

impl SqliteKvStore {
    pub fn open<P: AsRef<Path>>(path: P) -> CtResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> CtResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> CtResult<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> CtResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> CtResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

/// Store that keeps every key in one pretty-printed JSON object file
#[derive(Debug, Clone)]
pub struct JsonFileKvStore {
    path: PathBuf,
}

impl JsonFileKvStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> CtResult<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KvStore for JsonFileKvStore {
    fn get(&self, key: &str) -> CtResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> CtResult<()> {
        // an unreadable file is replaced rather than blocking every write
        let mut all = self.read_all().unwrap_or_default();
        all.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&all)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-process store. `fail_writes` simulates an unavailable or full backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> CtResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CtResult<()> {
        if self.fail_writes {
            return Err(CubeTimeError::Storage("quota exceeded".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_sqlite_get_missing_key() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        assert_eq!(store.get("nope").unwrap(), None);
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let mut store = SqliteKvStore::open_in_memory().unwrap();
        store.set("solves", "[]").unwrap();
        store.set("solves", "[1]").unwrap();
        assert_eq!(store.get("solves").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_sqlite_persists_across_connections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("solves.db");
        {
            let mut store = SqliteKvStore::open(&path).unwrap();
            store.set("k", "v").unwrap();
        }
        let store = SqliteKvStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_json_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = JsonFileKvStore::with_path(&path);

        assert_eq!(store.get("a").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let reopened = JsonFileKvStore::with_path(&path);
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_json_file_corrupt_read_is_error_but_write_recovers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let mut store = JsonFileKvStore::with_path(&path);
        assert_matches!(store.get("a"), Err(CubeTimeError::Json(_)));

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_memory_store_failure_switch() {
        let mut store = MemoryKvStore::new().with_value("k", "old");
        store.set_fail_writes(true);
        assert_matches!(store.set("k", "new"), Err(CubeTimeError::Storage(_)));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("old"));

        store.set_fail_writes(false);
        store.set("k", "new").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn KvStore> = Box::new(MemoryKvStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
