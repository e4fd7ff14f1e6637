//! Pure projection from task state to a renderable view model.
//!
//! # Responsibility
//! - Compute the visible subset for the selected filter.
//! - Build the complete list representation from scratch on every call.
//!
//! # Invariants
//! - Visible order equals collection order.
//! - An empty visible subset renders as a single placeholder entry.

use crate::model::filter::Filter;
use crate::model::task::{Task, TaskId};
use crate::notify::NotifyAffordance;

/// Placeholder text shown when the visible subset is empty.
pub const EMPTY_PLACEHOLDER: &str = "No tasks";
/// Label of the per-task delete control.
pub const DELETE_LABEL: &str = "×";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Normal,
    Completed,
}

/// One rendered task row: toggle, label, delete control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItemView {
    pub id: TaskId,
    pub text: String,
    pub checked: bool,
    pub text_style: TextStyle,
    pub delete_label: &'static str,
}

impl TaskItemView {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            checked: task.completed,
            text_style: if task.completed {
                TextStyle::Completed
            } else {
                TextStyle::Normal
            },
            delete_label: DELETE_LABEL,
        }
    }
}

/// Rendered task list body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    Items(Vec<TaskItemView>),
    Placeholder { message: &'static str },
}

impl TaskListView {
    /// Ids of rendered rows; empty for the placeholder.
    pub fn ids(&self) -> Vec<TaskId> {
        match self {
            Self::Items(items) => items.iter().map(|item| item.id).collect(),
            Self::Placeholder { .. } => Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// State of a host button: text and whether it is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub label: &'static str,
    pub disabled: bool,
}

/// Whole-screen view model handed to the host on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppView {
    pub filter: Filter,
    pub list: TaskListView,
    pub notify_button: ButtonView,
    pub install_visible: bool,
}

/// Returns the tasks visible under `filter`, in collection order.
pub fn visible_tasks(tasks: &[Task], filter: Filter) -> impl Iterator<Item = &Task> {
    tasks.iter().filter(move |task| filter.matches(task))
}

/// Rebuilds the list representation for `filter`.
pub fn render(tasks: &[Task], filter: Filter) -> TaskListView {
    let items: Vec<_> = visible_tasks(tasks, filter)
        .map(TaskItemView::from_task)
        .collect();
    if items.is_empty() {
        TaskListView::Placeholder {
            message: EMPTY_PLACEHOLDER,
        }
    } else {
        TaskListView::Items(items)
    }
}

/// Builds the full app view model.
pub fn render_app(
    tasks: &[Task],
    filter: Filter,
    notify: NotifyAffordance,
    install_visible: bool,
) -> AppView {
    AppView {
        filter,
        list: render(tasks, filter),
        notify_button: ButtonView {
            label: notify.label(),
            disabled: notify.is_disabled(),
        },
        install_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::{render, TaskListView, TextStyle, EMPTY_PLACEHOLDER};
    use crate::model::filter::Filter;
    use crate::model::task::{Task, TaskId};
    use chrono::{TimeZone, Utc};

    fn task(id: i64, completed: bool) -> Task {
        let mut task = Task::new(TaskId(id), &format!("t{id}"), Utc.timestamp_millis_opt(id).unwrap());
        task.completed = completed;
        task
    }

    #[test]
    fn empty_subset_renders_placeholder() {
        let tasks = vec![task(1, false)];
        assert_eq!(
            render(&tasks, Filter::Completed),
            TaskListView::Placeholder {
                message: EMPTY_PLACEHOLDER
            }
        );
        assert!(render(&[], Filter::All).is_placeholder());
    }

    #[test]
    fn completed_rows_are_checked_and_styled() {
        let tasks = vec![task(2, true), task(1, false)];
        let TaskListView::Items(items) = render(&tasks, Filter::All) else {
            panic!("expected items");
        };
        assert!(items[0].checked);
        assert_eq!(items[0].text_style, TextStyle::Completed);
        assert!(!items[1].checked);
        assert_eq!(items[1].text_style, TextStyle::Normal);
        assert_eq!(items[1].delete_label, "×");
    }
}
