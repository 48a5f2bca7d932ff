use chrono::{Duration, Local, TimeZone};
use mobdb::replication::SnapshotStore;
use mobdb::replication::snapshot::backup_file_name;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "mobdb-snapshot-{tag}-{}-{nanos}",
        std::process::id()
    ))
}

#[tokio::test]
async fn retention_keeps_only_the_newest_backups() {
    let root = scratch_dir("retention");
    fs::create_dir_all(&root).await.unwrap();
    let source = root.join("app.db");
    let store = SnapshotStore::new(root.join("backups"));

    let start = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let mut created = Vec::new();
    for i in 0..7 {
        fs::write(&source, format!("generation {i}")).await.unwrap();
        let at = start + Duration::seconds(i64::from(i) * 90);
        let path = store.create_backup_at(&source, 3, at).await.unwrap();
        created.push(path);
    }

    let remaining = store.list_backups("app.db").await.unwrap();
    assert_eq!(remaining, created[4..].to_vec());

    let newest = fs::read_to_string(remaining.last().unwrap()).await.unwrap();
    assert_eq!(newest, "generation 6");

    let _ = fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn backup_directory_is_created_on_demand() {
    let root = scratch_dir("mkdir");
    fs::create_dir_all(&root).await.unwrap();
    let source = root.join("app.db");
    fs::write(&source, b"SQLite format 3\0").await.unwrap();

    let store = SnapshotStore::new(root.join("nested").join("backups"));
    let path = store.create_backup(&source, 5).await.unwrap();

    assert!(path.starts_with(store.dir()));
    assert_eq!(fs::read(&path).await.unwrap(), b"SQLite format 3\0");

    // A second call with the directory already present must also succeed.
    let later = Local::now() + Duration::seconds(5);
    store.create_backup_at(&source, 5, later).await.unwrap();
    assert_eq!(store.list_backups("app.db").await.unwrap().len(), 2);

    let _ = fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn same_second_backups_overwrite_each_other() {
    let root = scratch_dir("collision");
    fs::create_dir_all(&root).await.unwrap();
    let source = root.join("app.db");
    let store = SnapshotStore::new(root.join("backups"));
    let at = Local.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

    fs::write(&source, "first").await.unwrap();
    store.create_backup_at(&source, 10, at).await.unwrap();
    fs::write(&source, "second").await.unwrap();
    let path = store.create_backup_at(&source, 10, at).await.unwrap();

    let backups = store.list_backups("app.db").await.unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&path).await.unwrap(), "second");

    let _ = fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn unrelated_files_are_never_pruned() {
    let root = scratch_dir("unrelated");
    let backups_dir = root.join("backups");
    fs::create_dir_all(&backups_dir).await.unwrap();
    let source = root.join("app.db");
    fs::write(&source, "data").await.unwrap();

    let foreign = [
        "other.db_20200101_000000.db",
        "app.db_notes.txt",
        "README",
    ];
    for name in foreign {
        fs::write(backups_dir.join(name), "keep").await.unwrap();
    }

    let store = SnapshotStore::new(&backups_dir);
    let start = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..3 {
        store
            .create_backup_at(&source, 1, start + Duration::hours(i))
            .await
            .unwrap();
    }

    assert_eq!(store.list_backups("app.db").await.unwrap().len(), 1);
    for name in foreign {
        assert!(fs::try_exists(backups_dir.join(name)).await.unwrap(), "{name}");
    }

    let _ = fs::remove_dir_all(&root).await;
}

#[tokio::test]
async fn unreadable_source_aborts_without_writing() {
    let root = scratch_dir("missing-source");
    let store = SnapshotStore::new(root.join("backups"));

    let err = store
        .create_backup(&root.join("absent.db"), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, mobdb::MobdbError::IoError(_)));
    assert!(store.list_backups("absent.db").await.unwrap().is_empty());

    let _ = fs::remove_dir_all(&root).await;
}

#[test]
fn file_names_follow_the_documented_layout() {
    let at = Local.with_ymd_and_hms(2023, 12, 31, 23, 59, 9).unwrap();
    assert_eq!(
        backup_file_name("questions.db", at),
        "questions.db_20231231_235909.db"
    );
}
