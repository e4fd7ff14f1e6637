use chrono::{TimeZone, Utc};
use taskpad_core::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, Task, TaskId, TaskStore,
};

fn sample_tasks() -> Vec<Task> {
    let mut done = Task::new(
        TaskId(1_700_000_000_500),
        "write report",
        Utc.timestamp_millis_opt(1_700_000_000_500).unwrap(),
    );
    done.completed = true;
    vec![
        Task::new(
            TaskId(1_700_000_000_900),
            "buy milk",
            Utc.timestamp_millis_opt(1_700_000_000_900).unwrap(),
        ),
        done,
        Task::new(
            TaskId(1_700_000_000_100),
            "üñíçødé ✓",
            Utc.timestamp_millis_opt(1_700_000_000_100).unwrap(),
        ),
    ]
}

#[test]
fn memory_store_save_then_load_is_field_for_field_equal() {
    let mut store = TaskStore::new(MemoryKeyValueStore::new());
    let tasks = sample_tasks();
    store.save(&tasks).unwrap();
    assert_eq!(store.load(), tasks);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let tasks = sample_tasks();

    {
        let mut store = TaskStore::new(SqliteKeyValueStore::open(&path).unwrap());
        store.save(&tasks).unwrap();
    }

    let reopened = TaskStore::new(SqliteKeyValueStore::open(&path).unwrap());
    assert_eq!(reopened.load(), tasks);
}

#[test]
fn save_overwrites_previous_blob() {
    let mut store = TaskStore::new(MemoryKeyValueStore::new());
    store.save(&sample_tasks()).unwrap();
    store.save(&[]).unwrap();
    assert_eq!(store.kv().get("tasks").unwrap().as_deref(), Some("[]"));
    assert!(store.load().is_empty());
}

#[test]
fn blob_written_by_browser_build_loads() {
    let raw = r#"[{"id":1717171717171,"text":"from the browser","completed":false,"createdAt":"2024-05-31T16:08:37.171Z"}]"#;
    let store = TaskStore::new(MemoryKeyValueStore::with_entry("tasks", raw));
    let tasks = store.load();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId(1_717_171_717_171));
    assert_eq!(tasks[0].created_at, "2024-05-31T16:08:37.171Z");
}
