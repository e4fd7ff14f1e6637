//! Background worker registration and update polling.
//!
//! # Invariants
//! - Registration is requested at most once per session.
//! - Registration failure is logged only; it never blocks task features.

use crate::effect::{Effect, TimerId, TimerPurpose};
use log::{debug, info, warn};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Unregistered,
    Pending,
    Registered { update_timer: TimerId },
    Failed { reason: String },
    Unsupported,
}

#[derive(Debug, Clone)]
pub struct WorkerRegistration {
    script_path: String,
    update_interval: Duration,
    state: WorkerState,
}

impl WorkerRegistration {
    pub fn new(script_path: impl Into<String>, update_interval: Duration) -> Self {
        Self {
            script_path: script_path.into(),
            update_interval,
            state: WorkerState::Unregistered,
        }
    }

    pub fn state(&self) -> &WorkerState {
        &self.state
    }

    /// Requests registration when the host supports workers.
    pub fn begin(&mut self, supported: bool) -> Option<Effect> {
        if !supported {
            self.state = WorkerState::Unsupported;
            return None;
        }
        if self.state != WorkerState::Unregistered {
            return None;
        }
        self.state = WorkerState::Pending;
        info!(
            "event=worker_register module=worker status=start path={}",
            self.script_path
        );
        Some(Effect::RegisterWorker {
            script_path: self.script_path.clone(),
        })
    }

    /// Registration succeeded: start update polling under `timer`.
    pub fn registered(&mut self, timer: TimerId) -> Option<Effect> {
        if self.state != WorkerState::Pending {
            debug!("event=worker_register module=worker status=skipped reason=not_pending");
            return None;
        }
        self.state = WorkerState::Registered {
            update_timer: timer,
        };
        info!("event=worker_register module=worker status=ok update_timer={timer}");
        Some(Effect::StartInterval {
            timer,
            period: self.update_interval,
            purpose: TimerPurpose::UpdateCheck,
        })
    }

    pub fn failed(&mut self, reason: &str) {
        warn!("event=worker_register module=worker status=error error={reason}");
        self.state = WorkerState::Failed {
            reason: reason.to_string(),
        };
    }

    /// Handles a timer tick; `Some` when it belongs to update polling.
    pub fn on_tick(&self, timer: TimerId) -> Option<Effect> {
        match self.state {
            WorkerState::Registered { update_timer } if update_timer == timer => {
                debug!("event=worker_update module=worker status=start");
                Some(Effect::CheckForUpdate)
            }
            _ => None,
        }
    }
}
