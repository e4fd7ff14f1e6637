//! Task collection use-cases.
//!
//! # Responsibility
//! - Own the in-memory collection (newest-first) for one session.
//! - Resynchronize the persisted copy after every mutation.
//!
//! # Invariants
//! - Display order equals collection order; nothing here reorders tasks.
//! - Unknown ids and blank input are no-ops, never errors.
//! - Every successful mutation is followed by exactly one `TaskStore::save`.

use crate::model::clock::Clock;
use crate::model::task::{Task, TaskId, TaskIdAllocator};
use crate::store::kv::KeyValueStore;
use crate::store::task_store::TaskStore;
use crate::store::StoreResult;
use log::{debug, info};

/// Ordered, mutable task sequence with its id allocator.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    ids: TaskIdAllocator,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts an existing sequence, keeping its order.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let ids = TaskIdAllocator::seeded_from(&tasks);
        Self { tasks, ids }
    }

    /// Prepends a new incomplete task.
    ///
    /// Returns `None` without touching the list when `text` is blank.
    pub fn add(&mut self, text: &str, clock: &impl Clock) -> Option<&Task> {
        if text.trim().is_empty() {
            return None;
        }
        let now = clock.now();
        let id = self.ids.next(now.timestamp_millis(), &self.tasks);
        self.tasks.insert(0, Task::new(id, text, now));
        self.tasks.first()
    }

    /// Flips `completed` and returns the new value, or `None` for unknown ids.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Removes exactly the matching task.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Number of tasks with `completed == false`.
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Mutation service pairing the live collection with its persisted copy.
pub struct TaskService<S: KeyValueStore, C: Clock> {
    list: TaskList,
    store: TaskStore<S>,
    clock: C,
}

impl<S: KeyValueStore, C: Clock> TaskService<S, C> {
    /// Loads the persisted collection and takes ownership of the store.
    pub fn load(store: TaskStore<S>, clock: C) -> Self {
        let list = TaskList::from_tasks(store.load());
        Self { list, store, clock }
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    pub fn tasks(&self) -> &[Task] {
        self.list.as_slice()
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    /// Adds a task and persists. `None` when `text` is blank.
    pub fn add(&mut self, text: &str) -> Option<(Task, StoreResult<()>)> {
        let task = self.list.add(text, &self.clock)?.clone();
        info!(
            "event=task_add module=service status=ok id={} tasks={}",
            task.id,
            self.list.len()
        );
        let persisted = self.store.save(self.list.as_slice());
        Some((task, persisted))
    }

    /// Toggles completion and persists. `None` for unknown ids.
    pub fn toggle_complete(&mut self, id: TaskId) -> Option<(Task, StoreResult<()>)> {
        let Some(completed) = self.list.toggle_complete(id) else {
            debug!("event=task_toggle module=service status=skipped id={id} reason=not_found");
            return None;
        };
        info!("event=task_toggle module=service status=ok id={id} completed={completed}");
        let task = self.list.get(id)?.clone();
        let persisted = self.store.save(self.list.as_slice());
        Some((task, persisted))
    }

    /// Removes a task and persists. `None` for unknown ids.
    pub fn remove(&mut self, id: TaskId) -> Option<(Task, StoreResult<()>)> {
        let Some(task) = self.list.remove(id) else {
            debug!("event=task_remove module=service status=skipped id={id} reason=not_found");
            return None;
        };
        info!(
            "event=task_remove module=service status=ok id={id} tasks={}",
            self.list.len()
        );
        let persisted = self.store.save(self.list.as_slice());
        Some((task, persisted))
    }
}

#[cfg(test)]
mod tests {
    use super::TaskList;
    use crate::model::clock::Clock;
    use crate::model::task::TaskId;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(i64);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(self.0).unwrap()
        }
    }

    #[test]
    fn add_prepends_and_skips_blank_text() {
        let clock = FixedClock(10);
        let mut list = TaskList::new();
        assert!(list.add("", &clock).is_none());
        assert!(list.add(" \t ", &clock).is_none());
        assert!(list.is_empty());

        list.add("A", &clock).unwrap();
        list.add("B", &clock).unwrap();
        let texts: Vec<_> = list.iter().map(|task| task.text.as_str()).collect();
        assert_eq!(texts, ["B", "A"]);
        assert!(list.iter().all(|task| !task.completed));
    }

    #[test]
    fn same_millisecond_adds_get_distinct_ids() {
        let clock = FixedClock(1_700_000_000_000);
        let mut list = TaskList::new();
        let first = list.add("one", &clock).unwrap().id;
        let second = list.add("two", &clock).unwrap().id;
        assert_ne!(first, second);
        assert_eq!(list.get(first).unwrap().text, "one");
        assert_eq!(list.get(second).unwrap().text, "two");
    }

    #[test]
    fn toggle_and_remove_ignore_unknown_ids() {
        let clock = FixedClock(1);
        let mut list = TaskList::new();
        list.add("A", &clock);
        let before = list.clone();

        assert_eq!(list.toggle_complete(TaskId(999)), None);
        assert!(list.remove(TaskId(999)).is_none());
        assert_eq!(list.as_slice(), before.as_slice());
    }

    #[test]
    fn active_count_tracks_completion() {
        let clock = FixedClock(1);
        let mut list = TaskList::new();
        let a = list.add("A", &clock).unwrap().id;
        list.add("B", &clock);
        assert_eq!(list.active_count(), 2);
        assert_eq!(list.toggle_complete(a), Some(true));
        assert_eq!(list.active_count(), 1);
    }
}
