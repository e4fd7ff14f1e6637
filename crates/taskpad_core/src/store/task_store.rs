//! Task collection persistence over a key-value store.
//!
//! # Responsibility
//! - Load the task collection once at startup.
//! - Overwrite the stored blob with the full collection after every mutation.
//!
//! # Invariants
//! - Stored layout is a JSON array of `{id, text, completed, createdAt}`.
//! - Loaded tasks always satisfy `Task::validate()` and carry unique ids.

use crate::model::task::Task;
use crate::store::kv::KeyValueStore;
use crate::store::StoreResult;
use log::{info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Storage key used when no configuration overrides it.
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Serializes the task collection under one fixed key.
pub struct TaskStore<S: KeyValueStore> {
    kv: S,
    key: String,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(kv: S) -> Self {
        Self::with_key(kv, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(kv: S, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Loads the persisted collection.
    ///
    /// Never fails: a missing key, a read error or a blob that is not a JSON
    /// array yields an empty collection. Individual entries that fail shape or
    /// invariant checks, or repeat an earlier id, are dropped.
    pub fn load(&self) -> Vec<Task> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=store_load module=store status=ok tasks=0 source=empty");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=read_failed error={err}"
                );
                return Vec::new();
            }
        };

        let (tasks, dropped) = decode_tasks(&raw);
        if dropped > 0 {
            warn!(
                "event=store_load module=store status=degraded tasks={} dropped={}",
                tasks.len(),
                dropped
            );
        } else {
            info!(
                "event=store_load module=store status=ok tasks={}",
                tasks.len()
            );
        }
        tasks
    }

    /// Serializes `tasks` and overwrites the stored blob.
    pub fn save(&mut self, tasks: &[Task]) -> StoreResult<()> {
        let blob = serde_json::to_string(tasks)?;
        match self.kv.set(&self.key, &blob) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok tasks={} bytes={}",
                    tasks.len(),
                    blob.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error error_code=write_failed error={err}"
                );
                Err(err)
            }
        }
    }
}

/// Decodes a stored blob, returning surviving tasks and the number dropped.
///
/// A blob that is not a JSON array counts as one dropped unit.
pub fn decode_tasks(raw: &str) -> (Vec<Task>, usize) {
    let entries = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(entries)) => entries,
        Ok(Value::Null) => return (Vec::new(), 0),
        Ok(_) | Err(_) => return (Vec::new(), 1),
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for entry in entries {
        match decode_entry(entry) {
            Some(task) if seen.insert(task.id) => tasks.push(task),
            _ => dropped += 1,
        }
    }
    (tasks, dropped)
}

fn decode_entry(entry: Value) -> Option<Task> {
    let mut task: Task = serde_json::from_value(entry).ok()?;
    let trimmed = task.text.trim();
    if trimmed.len() != task.text.len() {
        task.text = trimmed.to_string();
    }
    task.validate().ok()?;
    Some(task)
}

#[cfg(test)]
mod tests {
    use super::{decode_tasks, TaskStore};
    use crate::model::task::{Task, TaskId};
    use crate::store::kv::{KeyValueStore, MemoryKeyValueStore};
    use chrono::{TimeZone, Utc};

    fn task(id: i64, text: &str) -> Task {
        Task::new(TaskId(id), text, Utc.timestamp_millis_opt(id).unwrap())
    }

    #[test]
    fn save_writes_browser_compatible_layout() {
        let mut store = TaskStore::new(MemoryKeyValueStore::new());
        let mut done = task(2, "done");
        done.completed = true;
        store.save(&[done]).unwrap();

        let raw = store.kv().get("tasks").unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":2,"text":"done","completed":true,"createdAt":"1970-01-01T00:00:00.002Z"}]"#
        );
    }

    #[test]
    fn missing_null_and_non_array_blobs_load_as_empty() {
        assert!(TaskStore::new(MemoryKeyValueStore::new()).load().is_empty());
        for blob in ["null", "{\"id\":1}", "not json", "42"] {
            let store = TaskStore::new(MemoryKeyValueStore::with_entry("tasks", blob));
            assert!(store.load().is_empty(), "blob {blob} should load empty");
        }
    }

    #[test]
    fn malformed_entries_are_dropped_individually() {
        let raw = r#"[
            {"id":3,"text":"keep","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
            {"id":4,"text":"   ","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
            {"id":5.5,"text":"float id","completed":false,"createdAt":"2024-01-01T00:00:00.000Z"},
            {"id":6,"text":"no flag","createdAt":"2024-01-01T00:00:00.000Z"},
            {"id":7,"text":"bad date","completed":true,"createdAt":"soon"},
            {"id":3,"text":"dup","completed":true,"createdAt":"2024-01-01T00:00:00.000Z"},
            "garbage",
            {"id":8,"text":"  padded ","completed":true,"createdAt":"2024-01-01T00:00:00.000Z","extra":1}
        ]"#;
        let (tasks, dropped) = decode_tasks(raw);
        assert_eq!(dropped, 6);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "keep");
        assert_eq!(tasks[1].id, TaskId(8));
        assert_eq!(tasks[1].text, "padded");
        assert!(tasks[1].completed);
    }

    #[test]
    fn custom_key_is_respected() {
        let mut store = TaskStore::with_key(MemoryKeyValueStore::new(), "todo-v2");
        store.save(&[task(1, "a")]).unwrap();
        assert!(store.kv().get("tasks").unwrap().is_none());
        assert_eq!(store.load().len(), 1);
    }
}
