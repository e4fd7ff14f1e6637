//! FFI use-case API for the host shell.
//!
//! # Responsibility
//! - Expose the task-list controller to the host via FRB.
//! - Translate core effects into flat, host-friendly records.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One session per process; `app_start` replaces any previous session.
//! - Every response carries the effects the host must execute, in order.

use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};
use taskpad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_filter,
    parse_permission, ping as ping_inner, AppConfig, AppView, DeliveryRoute, Effect,
    HostCapabilities, InstallOutcome, SqliteKeyValueStore, TaskApp, TaskId, TaskListView,
    TextStyle, TimerId, TimerPurpose, UiEvent,
};

const DB_FILE_NAME: &str = "taskpad.sqlite3";
const DB_PATH_ENV: &str = "TASKPAD_DB_PATH";

type Session = TaskApp<SqliteKeyValueStore>;

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Host facilities and permission state observed at launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLaunch {
    /// `default|granted|denied`.
    pub permission: String,
    pub notifications: bool,
    pub service_worker: bool,
    pub worker_display: bool,
    /// Overrides the SQLite file; falls back to `TASKPAD_DB_PATH`, then temp dir.
    pub db_path: Option<String>,
    /// JSON `AppConfig` document; absent fields take defaults.
    pub config_json: Option<String>,
}

/// One rendered task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTaskItem {
    pub id: i64,
    pub text: String,
    pub checked: bool,
    pub completed_style: bool,
    pub delete_label: String,
}

/// Whole-screen view model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostView {
    pub filter: String,
    pub items: Vec<HostTaskItem>,
    /// Set when the list renders as a single placeholder entry.
    pub placeholder: Option<String>,
    pub notify_label: String,
    pub notify_disabled: bool,
    pub install_visible: bool,
}

/// Work the host must perform, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEffect {
    Render {
        view: HostView,
    },
    ClearInput,
    Notify {
        title: String,
        body: String,
        /// Present for worker-mediated display.
        icon: Option<String>,
        vibrate: Vec<u32>,
    },
    RequestPermission,
    StartInterval {
        timer_id: u64,
        period_ms: u64,
        purpose: String,
    },
    CancelInterval {
        timer_id: u64,
    },
    RegisterWorker {
        script_path: String,
    },
    CheckForUpdate,
    PromptInstall,
}

/// Response envelope for every session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppResponse {
    pub ok: bool,
    pub message: String,
    pub effects: Vec<HostEffect>,
}

impl AppResponse {
    fn success(effects: Vec<Effect>) -> Self {
        Self {
            ok: true,
            message: String::new(),
            effects: effects.into_iter().map(to_host_effect).collect(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            effects: Vec::new(),
        }
    }
}

/// Opens storage, loads tasks and runs the launch sequence.
///
/// # FFI contract
/// - Sync call; performs a small SQLite open/migrate.
/// - Replaces any previous session (page reload semantics).
#[flutter_rust_bridge::frb(sync)]
pub fn app_start(launch: HostLaunch) -> AppResponse {
    let permission = match parse_permission(&launch.permission) {
        Ok(permission) => permission,
        Err(err) => return AppResponse::failure(format!("app_start failed: {err}")),
    };
    let config = match launch.config_json.as_deref() {
        Some(raw) if !raw.trim().is_empty() => match AppConfig::from_json_str(raw) {
            Ok(config) => config,
            Err(err) => return AppResponse::failure(format!("app_start failed: {err}")),
        },
        _ => AppConfig::default(),
    };
    let db_path = launch
        .db_path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(resolve_db_path);
    let kv = match SqliteKeyValueStore::open(&db_path) {
        Ok(kv) => kv,
        Err(err) => return AppResponse::failure(format!("app_start failed: {err}")),
    };

    let capabilities = HostCapabilities {
        notifications: launch.notifications,
        service_worker: launch.service_worker,
        worker_display: launch.worker_display,
    };
    let mut app = match TaskApp::new(kv, config, capabilities, permission) {
        Ok(app) => app,
        Err(err) => return AppResponse::failure(format!("app_start failed: {err}")),
    };
    let effects = app.start();
    *lock_session() = Some(app);
    AppResponse::success(effects)
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_add_task(text: String) -> AppResponse {
    dispatch(UiEvent::AddClicked { text })
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_input_key(key: String, text: String) -> AppResponse {
    dispatch(UiEvent::InputKeyPressed { key, text })
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_toggle_task(id: i64) -> AppResponse {
    dispatch(UiEvent::ToggleTask { id: TaskId(id) })
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_delete_task(id: i64) -> AppResponse {
    dispatch(UiEvent::DeleteTask { id: TaskId(id) })
}

/// Selects `all|active|completed`.
#[flutter_rust_bridge::frb(sync)]
pub fn app_select_filter(filter: String) -> AppResponse {
    match parse_filter(&filter) {
        Ok(filter) => dispatch(UiEvent::FilterSelected { filter }),
        Err(err) => AppResponse::failure(format!("app_select_filter failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_request_notifications() -> AppResponse {
    dispatch(UiEvent::NotifyClicked)
}

/// Second step of the permission flow.
#[flutter_rust_bridge::frb(sync)]
pub fn app_permission_resolved(permission: String) -> AppResponse {
    match parse_permission(&permission) {
        Ok(permission) => dispatch(UiEvent::PermissionResolved { permission }),
        Err(err) => AppResponse::failure(format!("app_permission_resolved failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_before_install_prompt() -> AppResponse {
    dispatch(UiEvent::BeforeInstallPrompt)
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_install_clicked() -> AppResponse {
    dispatch(UiEvent::InstallClicked)
}

/// Relays `accepted|dismissed`.
#[flutter_rust_bridge::frb(sync)]
pub fn app_install_resolved(outcome: String) -> AppResponse {
    let outcome = match outcome.trim() {
        "accepted" => InstallOutcome::Accepted,
        "dismissed" => InstallOutcome::Dismissed,
        other => {
            return AppResponse::failure(format!(
                "app_install_resolved failed: unsupported outcome `{other}`"
            ))
        }
    };
    dispatch(UiEvent::InstallResolved { outcome })
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_installed() -> AppResponse {
    dispatch(UiEvent::AppInstalled)
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_worker_registered() -> AppResponse {
    dispatch(UiEvent::WorkerRegistered)
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_worker_failed(reason: String) -> AppResponse {
    dispatch(UiEvent::WorkerRegistrationFailed { reason })
}

#[flutter_rust_bridge::frb(sync)]
pub fn app_timer_fired(timer_id: u64) -> AppResponse {
    dispatch(UiEvent::TimerFired {
        timer: TimerId(timer_id),
    })
}

fn dispatch(event: UiEvent) -> AppResponse {
    let mut session = lock_session();
    match session.as_mut() {
        Some(app) => AppResponse::success(app.dispatch(event)),
        None => AppResponse::failure("app session not started; call app_start first"),
    }
}

fn lock_session() -> MutexGuard<'static, Option<Session>> {
    let slot = SESSION.get_or_init(|| Mutex::new(None));
    slot.lock().unwrap_or_else(|poisoned| {
        warn!("event=session_lock module=ffi status=recovered reason=poisoned");
        poisoned.into_inner()
    })
}

fn resolve_db_path() -> PathBuf {
    if let Ok(raw) = std::env::var(DB_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DB_FILE_NAME)
}

fn to_host_effect(effect: Effect) -> HostEffect {
    match effect {
        Effect::Render(view) => HostEffect::Render {
            view: to_host_view(view),
        },
        Effect::ClearInput => HostEffect::ClearInput,
        Effect::Notify(note) => {
            let (icon, vibrate) = match note.route {
                DeliveryRoute::WorkerMediated { icon, vibrate } => (Some(icon), vibrate),
                DeliveryRoute::Direct => (None, Vec::new()),
            };
            HostEffect::Notify {
                title: note.title,
                body: note.body,
                icon,
                vibrate,
            }
        }
        Effect::RequestPermission => HostEffect::RequestPermission,
        Effect::StartInterval {
            timer,
            period,
            purpose,
        } => HostEffect::StartInterval {
            timer_id: timer.0,
            period_ms: u64::try_from(period.as_millis()).unwrap_or(u64::MAX),
            purpose: match purpose {
                TimerPurpose::Reminder => "reminder",
                TimerPurpose::UpdateCheck => "update_check",
            }
            .to_string(),
        },
        Effect::CancelInterval { timer } => HostEffect::CancelInterval { timer_id: timer.0 },
        Effect::RegisterWorker { script_path } => HostEffect::RegisterWorker { script_path },
        Effect::CheckForUpdate => HostEffect::CheckForUpdate,
        Effect::PromptInstall => HostEffect::PromptInstall,
    }
}

fn to_host_view(view: AppView) -> HostView {
    let (items, placeholder) = match view.list {
        TaskListView::Items(items) => (
            items
                .into_iter()
                .map(|item| HostTaskItem {
                    id: item.id.as_i64(),
                    text: item.text,
                    checked: item.checked,
                    completed_style: item.text_style == TextStyle::Completed,
                    delete_label: item.delete_label.to_string(),
                })
                .collect(),
            None,
        ),
        TaskListView::Placeholder { message } => (Vec::new(), Some(message.to_string())),
    };
    HostView {
        filter: view.filter.as_str().to_string(),
        items,
        placeholder,
        notify_label: view.notify_button.label.to_string(),
        notify_disabled: view.notify_button.disabled,
        install_visible: view.install_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        app_add_task, app_delete_task, app_permission_resolved, app_request_notifications,
        app_select_filter, app_start, app_toggle_task, core_version, init_logging, ping,
        AppResponse, HostEffect, HostLaunch, HostView,
    };
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // Session is process-global; serialize tests that touch it.
    static SESSION_TESTS: Mutex<()> = Mutex::new(());

    fn launch(permission: &str) -> HostLaunch {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "taskpad-ffi-{}-{nanos}.sqlite3",
            std::process::id()
        ));
        HostLaunch {
            permission: permission.to_string(),
            notifications: true,
            service_worker: true,
            worker_display: false,
            db_path: Some(path.to_string_lossy().into_owned()),
            config_json: None,
        }
    }

    fn last_view(response: &AppResponse) -> HostView {
        response
            .effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                HostEffect::Render { view } => Some(view.clone()),
                _ => None,
            })
            .expect("response should render")
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn start_rejects_unknown_permission() {
        let _guard = SESSION_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        let response = app_start(launch("maybe"));
        assert!(!response.ok);
        assert!(response.message.contains("permission"));
    }

    #[test]
    fn start_applies_json_config_and_rejects_bad_documents() {
        let _guard = SESSION_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        let mut bad = launch("default");
        bad.config_json = Some(r#"{"reminder_interval_secs":0}"#.to_string());
        let response = app_start(bad);
        assert!(!response.ok);
        assert!(response.message.contains("reminder_interval_secs"));

        let mut unknown = launch("default");
        unknown.config_json = Some(r#"{"colour":"blue"}"#.to_string());
        assert!(!app_start(unknown).ok);

        let mut tuned = launch("granted");
        tuned.config_json = Some(r#"{"reminder_interval_secs":60}"#.to_string());
        let response = app_start(tuned);
        assert!(response.ok, "{}", response.message);
        assert!(response.effects.iter().any(|effect| matches!(
            effect,
            HostEffect::StartInterval { period_ms: 60_000, .. }
        )));
    }

    #[test]
    fn session_flow_renders_and_persists() {
        let _guard = SESSION_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        let started = app_start(launch("default"));
        assert!(started.ok, "{}", started.message);
        let view = last_view(&started);
        assert_eq!(view.placeholder.as_deref(), Some("No tasks"));
        assert_eq!(view.notify_label, "Enable notifications");

        let added = app_add_task("ship it".to_string());
        assert!(added.ok);
        assert!(added.effects.contains(&HostEffect::ClearInput));
        let id = last_view(&added).items[0].id;

        let toggled = app_toggle_task(id);
        assert!(last_view(&toggled).items[0].completed_style);

        let filtered = app_select_filter("active".to_string());
        let view = last_view(&filtered);
        assert_eq!(view.filter, "active");
        assert!(view.items.is_empty());

        assert!(!app_select_filter("someday".to_string()).ok);

        let removed = app_delete_task(id);
        assert!(removed.ok);
        assert!(app_delete_task(id).effects.is_empty());
    }

    #[test]
    fn permission_flow_emits_direct_confirmation() {
        let _guard = SESSION_TESTS.lock().unwrap_or_else(|p| p.into_inner());
        assert!(app_start(launch("default")).ok);
        assert_eq!(
            app_request_notifications().effects,
            vec![HostEffect::RequestPermission]
        );

        let resolved = app_permission_resolved("granted".to_string());
        assert!(resolved.effects.iter().any(|effect| matches!(
            effect,
            HostEffect::Notify { icon: None, title, .. } if title == "Notifications enabled"
        )));
        assert!(resolved.effects.iter().any(|effect| matches!(
            effect,
            HostEffect::StartInterval { period_ms: 7_200_000, purpose, .. } if purpose == "reminder"
        )));
    }
}
