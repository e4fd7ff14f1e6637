//! Side-effect intents returned to the host.
//!
//! The core never touches UI, notification, timer or worker APIs directly.
//! Each controller call returns an ordered list of `Effect`s that the host
//! executes; asynchronous results come back as new events.

use crate::notify::Notification;
use crate::view::AppView;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Host timer handle allocated by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl Display for TimerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a recurring timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    Reminder,
    UpdateCheck,
}

/// Monotonic allocator for `TimerId`s; ids are never reused in a session.
#[derive(Debug, Clone, Default)]
pub struct TimerIds {
    next: u64,
}

impl TimerIds {
    pub fn next(&mut self) -> TimerId {
        self.next += 1;
        TimerId(self.next)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace the whole rendered screen.
    Render(AppView),
    /// Clear the new-task input field.
    ClearInput,
    /// Display one notification; fire-and-forget.
    Notify(Notification),
    /// Ask the host for notification permission; answer with
    /// `UiEvent::PermissionResolved`.
    RequestPermission,
    StartInterval {
        timer: TimerId,
        period: Duration,
        purpose: TimerPurpose,
    },
    CancelInterval {
        timer: TimerId,
    },
    /// Register the background worker; answer with `WorkerRegistered` or
    /// `WorkerRegistrationFailed`.
    RegisterWorker {
        script_path: String,
    },
    /// Ask the registered worker to check for an update.
    CheckForUpdate,
    /// Show the deferred install prompt; answer with `InstallResolved`.
    PromptInstall,
}
