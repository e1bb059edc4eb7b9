use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use cubetime::storage::{JsonFileKvStore, KvStore, SqliteKvStore};
use cubetime::store::{PersistenceStatus, SolveStore, SOLVES_KEY};

fn at(ms: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

#[test]
fn sqlite_history_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("solves.db");

    let (first, second) = {
        let mut store = SolveStore::load(SqliteKvStore::open(&path).unwrap());
        let a = store.append(15_000, "R U R' U'", at(1_700_000_000_000));
        let b = store.append(12_500, "F2 B2", at(1_700_000_100_000));
        assert_eq!(store.status(), &PersistenceStatus::Healthy);
        (a, b)
    };

    let store = SolveStore::load(SqliteKvStore::open(&path).unwrap());
    assert_eq!(store.all(), &[second.clone(), first.clone()]);

    let mut store = store;
    assert!(store.remove(first.id));
    let store = SolveStore::load(SqliteKvStore::open(&path).unwrap());
    assert_eq!(store.all(), &[second]);
}

#[test]
fn json_history_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("solves.json");

    {
        let mut store = SolveStore::load(JsonFileKvStore::with_path(&path));
        store.append(9_876, "L D2", at(1_700_000_000_000));
    }

    let store = SolveStore::load(JsonFileKvStore::with_path(&path));
    assert_eq!(store.len(), 1);
    assert_eq!(store.all()[0].duration_ms, 9_876);
    assert_eq!(store.all()[0].scramble, "L D2");
}

#[test]
fn browser_shaped_history_is_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("solves.json");

    let mut kv = JsonFileKvStore::with_path(&path);
    kv.set(
        SOLVES_KEY,
        r#"[{"id":1700000000456,"time":20123,"date":"2023-11-14T22:13:20.456Z","scramble":"R U"},
            {"id":1700000000123,"time":25000,"date":"2023-11-14T22:13:20.123Z"}]"#,
    )
    .unwrap();

    let store = SolveStore::load(JsonFileKvStore::with_path(&path));
    assert_eq!(store.len(), 2);
    assert_eq!(store.all()[0].duration_ms, 20_123);
    assert_eq!(store.all()[1].scramble, "");
}

#[test]
fn corrupt_history_starts_empty_and_recovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("solves.db");

    {
        let mut kv = SqliteKvStore::open(&path).unwrap();
        kv.set(SOLVES_KEY, "{not json").unwrap();
    }

    let mut store = SolveStore::load(SqliteKvStore::open(&path).unwrap());
    assert!(store.is_empty());

    store.append(1_000, "U", at(1_700_000_000_000));
    let store = SolveStore::load(SqliteKvStore::open(&path).unwrap());
    assert_eq!(store.len(), 1);
}
