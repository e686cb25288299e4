use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use transtat::model::PullRequestRecord;
use transtat::store::Store;

fn merged(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 5, day, 12, 0, 0).unwrap()
}

fn record(number: u64, author: &str, zh_word_count: u64) -> PullRequestRecord {
    PullRequestRecord {
        number,
        author: author.to_string(),
        merged_at: merged(1),
        base_branch: "master".to_string(),
        zh_word_count,
    }
}

#[test]
fn open_creates_parent_dirs_and_schema() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("data").join("db.sqlite");
    let store = Store::open(&db_path).unwrap();
    assert!(db_path.exists());
    assert_eq!(store.records().unwrap().len(), 0);
}

#[test]
fn ensure_schema_is_idempotent() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("db.sqlite")).unwrap();
    store.insert(&record(1, "alice", 42)).unwrap();

    for _ in 0..3 {
        store.ensure_schema().unwrap();
    }

    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].zh_word_count, 42);
}

#[test]
fn exists_reflects_inserts() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("db.sqlite")).unwrap();

    assert!(!store.exists(7).unwrap());
    assert!(store.insert(&record(7, "alice", 10)).unwrap());
    assert!(store.exists(7).unwrap());
    assert!(!store.exists(8).unwrap());
}

#[test]
fn insert_is_idempotent_and_keeps_first_count() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("db.sqlite")).unwrap();

    assert!(store.insert(&record(7, "alice", 10)).unwrap());
    assert!(!store.insert(&record(7, "alice", 99)).unwrap());

    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].number, 7);
    assert_eq!(records[0].zh_word_count, 10);
}

#[test]
fn records_roundtrip_all_fields() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("db.sqlite")).unwrap();

    let original = PullRequestRecord {
        number: 1234,
        author: "译者".to_string(),
        merged_at: merged(15),
        base_branch: "release-1.0".to_string(),
        zh_word_count: 567,
    };
    store.insert(&original).unwrap();

    let records = store.records().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].number, original.number);
    assert_eq!(records[0].author, original.author);
    assert_eq!(records[0].merged_at, original.merged_at);
    assert_eq!(records[0].base_branch, original.base_branch);
    assert_eq!(records[0].zh_word_count, original.zh_word_count);
}

#[test]
fn records_preserve_insertion_order() {
    let dir = tempdir().unwrap();
    let store = Store::open(dir.path().join("db.sqlite")).unwrap();

    for number in [5, 3, 9, 1] {
        store.insert(&record(number, "alice", number)).unwrap();
    }

    let numbers: Vec<u64> = store.records().unwrap().iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![5, 3, 9, 1]);
}
