//! Application controller and UI event dispatcher.
//!
//! # Responsibility
//! - Own every piece of session state behind one value.
//! - Map host UI events to mutations, and mutations to effects.
//!
//! # Invariants
//! - For one event: mutate, then persist, then render, then notify.
//! - No-op events (blank input, unknown ids, stale timers) yield no effects.
//! - Storage failures are logged and never surfaced to the user.

use crate::config::{AppConfig, ConfigError};
use crate::effect::{Effect, TimerIds, TimerId};
use crate::install::{InstallOutcome, InstallPrompt};
use crate::model::clock::{Clock, SystemClock};
use crate::model::filter::Filter;
use crate::model::task::{Task, TaskId};
use crate::notify::{
    task_added_message, task_completed_message, HostCapabilities, NotificationGateway, Permission,
};
use crate::reminder::ReminderScheduler;
use crate::service::task_service::TaskService;
use crate::store::kv::KeyValueStore;
use crate::store::task_store::TaskStore;
use crate::store::StoreResult;
use crate::view::{render_app, AppView};
use crate::worker::WorkerRegistration;
use log::{debug, info, warn};

/// Key that submits the new-task input.
pub const SUBMIT_KEY: &str = "Enter";

/// Host UI events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    AddClicked { text: String },
    InputKeyPressed { key: String, text: String },
    ToggleTask { id: TaskId },
    DeleteTask { id: TaskId },
    FilterSelected { filter: Filter },
    NotifyClicked,
    PermissionResolved { permission: Permission },
    BeforeInstallPrompt,
    InstallClicked,
    InstallResolved { outcome: InstallOutcome },
    AppInstalled,
    WorkerRegistered,
    WorkerRegistrationFailed { reason: String },
    TimerFired { timer: TimerId },
}

/// One running session of the task list.
pub struct TaskApp<S: KeyValueStore, C: Clock = SystemClock> {
    config: AppConfig,
    tasks: TaskService<S, C>,
    filter: Filter,
    gateway: NotificationGateway,
    reminder: ReminderScheduler,
    worker: WorkerRegistration,
    install: InstallPrompt,
    timers: TimerIds,
}

impl<S: KeyValueStore> TaskApp<S, SystemClock> {
    pub fn new(
        kv: S,
        config: AppConfig,
        capabilities: HostCapabilities,
        permission: Permission,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(kv, SystemClock, config, capabilities, permission)
    }
}

impl<S: KeyValueStore, C: Clock> TaskApp<S, C> {
    /// Loads persisted tasks; no effects are produced until `start`.
    ///
    /// # Errors
    /// - `ConfigError::Invalid` when `config` fails `AppConfig::validate`.
    pub fn with_clock(
        kv: S,
        clock: C,
        config: AppConfig,
        capabilities: HostCapabilities,
        permission: Permission,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = TaskStore::with_key(kv, config.storage_key.clone());
        let gateway = NotificationGateway::new(capabilities, permission, &config);
        let reminder = ReminderScheduler::new(config.reminder_interval());
        let worker = WorkerRegistration::new(
            config.worker_script_path.clone(),
            config.update_check_interval(),
        );
        Ok(Self {
            tasks: TaskService::load(store, clock),
            filter: Filter::default(),
            gateway,
            reminder,
            worker,
            install: InstallPrompt::new(),
            timers: TimerIds::default(),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn gateway(&self) -> &NotificationGateway {
        &self.gateway
    }

    pub fn reminder(&self) -> &ReminderScheduler {
        &self.reminder
    }

    pub fn worker(&self) -> &WorkerRegistration {
        &self.worker
    }

    pub fn install(&self) -> &InstallPrompt {
        &self.install
    }

    pub fn store(&self) -> &TaskStore<S> {
        self.tasks.store()
    }

    /// Current view model.
    pub fn view(&self) -> AppView {
        render_app(
            self.tasks.tasks(),
            self.filter,
            self.gateway.affordance(),
            self.install.is_visible(),
        )
    }

    /// Launch sequence: first render, permission affordance, reminders when
    /// already granted, worker registration.
    pub fn start(&mut self) -> Vec<Effect> {
        let start_reminders = self.gateway.startup();
        info!(
            "event=core_init module=app status=ok tasks={} permission={}",
            self.tasks.tasks().len(),
            self.gateway.permission().as_str()
        );

        let mut effects = vec![Effect::Render(self.view())];
        if start_reminders {
            effects.extend(self.start_reminders());
        }
        let supported = self.gateway.capabilities().service_worker;
        effects.extend(self.worker.begin(supported));
        effects
    }

    /// Handles one host event.
    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Effect> {
        match event {
            UiEvent::AddClicked { text } => self.add_task(&text),
            UiEvent::InputKeyPressed { key, text } => {
                if key == SUBMIT_KEY {
                    self.add_task(&text)
                } else {
                    Vec::new()
                }
            }
            UiEvent::ToggleTask { id } => self.toggle_task(id),
            UiEvent::DeleteTask { id } => self.delete_task(id),
            UiEvent::FilterSelected { filter } => self.select_filter(filter),
            UiEvent::NotifyClicked => self.gateway.begin_permission_request().into_iter().collect(),
            UiEvent::PermissionResolved { permission } => self.permission_resolved(permission),
            UiEvent::BeforeInstallPrompt => {
                let changed = self.install.offer();
                self.render_if(changed)
            }
            UiEvent::InstallClicked => self.install.begin_install().into_iter().collect(),
            UiEvent::InstallResolved { outcome } => {
                let changed = self.install.complete_install(outcome);
                self.render_if(changed)
            }
            UiEvent::AppInstalled => {
                let changed = self.install.mark_installed();
                self.render_if(changed)
            }
            UiEvent::WorkerRegistered => {
                let timer = self.timers.next();
                self.worker.registered(timer).into_iter().collect()
            }
            UiEvent::WorkerRegistrationFailed { reason } => {
                self.worker.failed(&reason);
                Vec::new()
            }
            UiEvent::TimerFired { timer } => self.timer_fired(timer),
        }
    }

    fn add_task(&mut self, text: &str) -> Vec<Effect> {
        let Some((task, persisted)) = self.tasks.add(text) else {
            debug!("event=task_add module=app status=skipped reason=blank_text");
            return Vec::new();
        };
        log_persist_failure("task_add", persisted);

        let mut effects = vec![Effect::Render(self.view()), Effect::ClearInput];
        let (title, body) = task_added_message(&task.text);
        effects.extend(self.gateway.notify(title, body).map(Effect::Notify));
        effects
    }

    fn toggle_task(&mut self, id: TaskId) -> Vec<Effect> {
        let Some((task, persisted)) = self.tasks.toggle_complete(id) else {
            return Vec::new();
        };
        log_persist_failure("task_toggle", persisted);

        let mut effects = vec![Effect::Render(self.view())];
        if task.completed {
            let (title, body) = task_completed_message(&task.text);
            effects.extend(self.gateway.notify(title, body).map(Effect::Notify));
        }
        effects
    }

    fn delete_task(&mut self, id: TaskId) -> Vec<Effect> {
        let Some((_, persisted)) = self.tasks.remove(id) else {
            return Vec::new();
        };
        log_persist_failure("task_remove", persisted);
        vec![Effect::Render(self.view())]
    }

    fn select_filter(&mut self, filter: Filter) -> Vec<Effect> {
        self.filter = filter;
        info!(
            "event=filter_select module=app status=ok filter={}",
            filter.as_str()
        );
        vec![Effect::Render(self.view())]
    }

    fn permission_resolved(&mut self, permission: Permission) -> Vec<Effect> {
        let outcome = self.gateway.complete_permission_request(permission);
        let mut effects = vec![Effect::Render(self.view())];
        effects.extend(outcome.confirmation.map(Effect::Notify));
        if outcome.granted {
            effects.extend(self.start_reminders());
        }
        effects
    }

    fn start_reminders(&mut self) -> Vec<Effect> {
        if !self.gateway.capabilities().service_worker {
            debug!("event=reminder_start module=app status=skipped reason=no_service_worker");
            return Vec::new();
        }
        let timer = self.timers.next();
        self.reminder.start(timer)
    }

    fn timer_fired(&mut self, timer: TimerId) -> Vec<Effect> {
        if let Some(effect) = self.worker.on_tick(timer) {
            return vec![effect];
        }
        let active = self.tasks.list().active_count();
        self.reminder
            .on_tick(timer, active, &self.gateway)
            .map(Effect::Notify)
            .into_iter()
            .collect()
    }

    fn render_if(&self, changed: bool) -> Vec<Effect> {
        if changed {
            vec![Effect::Render(self.view())]
        } else {
            Vec::new()
        }
    }
}

fn log_persist_failure(event: &str, persisted: StoreResult<()>) {
    if let Err(err) = persisted {
        warn!("event={event} module=app status=degraded error_code=persist_failed error={err}");
    }
}
