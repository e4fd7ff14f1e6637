use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use taskpad_core::{render, Filter, Task, TaskId, TaskListView};

fn collection() -> Vec<Task> {
    (0..7)
        .map(|n| {
            let mut task = Task::new(
                TaskId(100 - n),
                &format!("task {n}"),
                Utc.timestamp_millis_opt(100 - n).unwrap(),
            );
            task.completed = n % 3 == 0;
            task
        })
        .collect()
}

#[test]
fn filters_partition_collection_in_original_order() {
    let tasks = collection();
    let all_ids: Vec<_> = tasks.iter().map(|task| task.id).collect();

    let active = render(&tasks, Filter::Active).ids();
    let completed = render(&tasks, Filter::Completed).ids();
    assert_eq!(render(&tasks, Filter::All).ids(), all_ids);

    let active_set: HashSet<_> = active.iter().copied().collect();
    let completed_set: HashSet<_> = completed.iter().copied().collect();
    assert!(active_set.is_disjoint(&completed_set));
    assert_eq!(active.len() + completed.len(), tasks.len());

    let expected_active: Vec<_> = tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| task.id)
        .collect();
    let expected_completed: Vec<_> = tasks
        .iter()
        .filter(|task| task.completed)
        .map(|task| task.id)
        .collect();
    assert_eq!(active, expected_active);
    assert_eq!(completed, expected_completed);
}

#[test]
fn rendering_does_not_mutate_collection() {
    let tasks = collection();
    let snapshot = tasks.clone();
    for filter in Filter::all() {
        let _ = render(&tasks, filter);
    }
    assert_eq!(tasks, snapshot);
}

#[test]
fn every_filter_on_empty_collection_renders_placeholder() {
    for filter in Filter::all() {
        assert!(matches!(
            render(&[], filter),
            TaskListView::Placeholder { message: "No tasks" }
        ));
    }
}
