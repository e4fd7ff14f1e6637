//! Core domain logic for Taskpad.
//! This crate is the single source of truth for task-list invariants; host
//! shells only execute the effects it returns.

pub mod app;
pub mod config;
pub mod db;
pub mod effect;
pub mod install;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod service;
pub mod store;
pub mod view;
pub mod worker;

pub use app::{TaskApp, UiEvent};
pub use config::{AppConfig, ConfigError};
pub use effect::{Effect, TimerId, TimerPurpose};
pub use install::{InstallOutcome, InstallPrompt, InstallState};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::clock::{Clock, SystemClock};
pub use model::filter::{parse_filter, Filter, FilterParseError};
pub use model::task::{Task, TaskId, TaskIdAllocator, TaskValidationError, MAX_TASK_ID};
pub use notify::{
    parse_permission, DeliveryRoute, HostCapabilities, Notification, NotificationGateway,
    NotifyAffordance, Permission, PermissionParseError,
};
pub use reminder::ReminderScheduler;
pub use service::task_service::{TaskList, TaskService};
pub use store::kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use store::task_store::{TaskStore, DEFAULT_STORAGE_KEY};
pub use store::{StoreError, StoreResult};
pub use view::{render, AppView, ButtonView, TaskItemView, TaskListView, TextStyle};
pub use worker::{WorkerRegistration, WorkerState};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
