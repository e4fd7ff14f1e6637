//! Notification gateway.
//!
//! # Responsibility
//! - Mirror the host permission state and drive the permission request flow.
//! - Build notifications and pick the host delivery route.
//!
//! # Invariants
//! - No notification is produced unless permission is `Granted`.
//! - Permission changes only through `startup` input or a completed request.
//! - Delivery is fire-and-forget; failures never reach callers.

use crate::config::AppConfig;
use crate::effect::Effect;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host notification permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

/// Parses the host permission string (`default|granted|denied`).
pub fn parse_permission(value: &str) -> Result<Permission, PermissionParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "default" => Ok(Permission::Default),
        "granted" => Ok(Permission::Granted),
        "denied" => Ok(Permission::Denied),
        other => Err(PermissionParseError(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionParseError(pub String);

impl Display for PermissionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported permission `{}`; expected default|granted|denied",
            self.0
        )
    }
}

impl Error for PermissionParseError {}

/// State of the "enable notifications" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyAffordance {
    /// Waiting for the user to ask.
    Available,
    Enabled,
    Blocked,
    /// Last request was not granted; the user may ask again.
    Declined,
    /// Host has no notification facility.
    Unsupported,
}

impl NotifyAffordance {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Enable notifications",
            Self::Enabled => "Notifications enabled",
            Self::Blocked => "Notifications blocked",
            Self::Declined => "Notifications disabled",
            Self::Unsupported => "Notifications unavailable",
        }
    }

    pub fn is_disabled(self) -> bool {
        matches!(self, Self::Enabled | Self::Blocked | Self::Unsupported)
    }
}

/// Host facilities reported once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Notification API present.
    pub notifications: bool,
    /// Background worker API present.
    pub service_worker: bool,
    /// Worker-mediated notification display (push-capable host).
    pub worker_display: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            notifications: true,
            service_worker: true,
            worker_display: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryRoute {
    /// Shown by the background worker with fixed metadata.
    WorkerMediated { icon: String, vibrate: Vec<u32> },
    /// Immediate page-level notification.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub route: DeliveryRoute,
}

/// Outcome of a completed permission request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionOutcome {
    pub granted: bool,
    pub confirmation: Option<Notification>,
}

pub fn task_added_message(text: &str) -> (&'static str, String) {
    ("Task added", format!("Task: {text}"))
}

pub fn task_completed_message(text: &str) -> (&'static str, String) {
    ("Task completed", format!("You completed: {text}"))
}

pub fn notifications_enabled_message() -> (&'static str, String) {
    (
        "Notifications enabled",
        "You will now receive task notifications".to_string(),
    )
}

pub fn reminder_message(active: usize) -> (&'static str, String) {
    ("Task reminder", format!("You have {active} unfinished tasks"))
}

/// Permission state plus routing for outgoing notifications.
#[derive(Debug, Clone)]
pub struct NotificationGateway {
    capabilities: HostCapabilities,
    permission: Permission,
    affordance: NotifyAffordance,
    icon: String,
    vibrate: Vec<u32>,
}

impl NotificationGateway {
    pub fn new(capabilities: HostCapabilities, permission: Permission, config: &AppConfig) -> Self {
        Self {
            capabilities,
            permission,
            affordance: NotifyAffordance::Available,
            icon: config.notification_icon.clone(),
            vibrate: config.vibration_pattern_ms.clone(),
        }
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn affordance(&self) -> NotifyAffordance {
        self.affordance
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    pub fn is_granted(&self) -> bool {
        self.capabilities.notifications && self.permission == Permission::Granted
    }

    /// Sets the affordance from the launch-time permission.
    ///
    /// Returns whether reminders should start right away.
    pub fn startup(&mut self) -> bool {
        self.affordance = if !self.capabilities.notifications {
            NotifyAffordance::Unsupported
        } else {
            match self.permission {
                Permission::Granted => NotifyAffordance::Enabled,
                Permission::Denied => NotifyAffordance::Blocked,
                Permission::Default => NotifyAffordance::Available,
            }
        };
        self.is_granted()
    }

    /// First step of the permission flow.
    ///
    /// Returns `None` when already granted or unsupported. Every click asks
    /// again; an unanswered request never blocks the next one.
    pub fn begin_permission_request(&mut self) -> Option<Effect> {
        if !self.capabilities.notifications || self.permission == Permission::Granted {
            return None;
        }
        info!("event=permission_request module=notify status=start");
        Some(Effect::RequestPermission)
    }

    /// Second step: consumes the host's answer.
    pub fn complete_permission_request(&mut self, result: Permission) -> PermissionOutcome {
        self.permission = result;
        info!(
            "event=permission_result module=notify status=ok permission={}",
            result.as_str()
        );

        if self.is_granted() {
            self.affordance = NotifyAffordance::Enabled;
            let (title, body) = notifications_enabled_message();
            PermissionOutcome {
                granted: true,
                confirmation: self.notify(title, body),
            }
        } else {
            self.affordance = NotifyAffordance::Declined;
            PermissionOutcome {
                granted: false,
                confirmation: None,
            }
        }
    }

    /// Builds a notification when permission is granted.
    pub fn notify(&self, title: &str, body: impl Into<String>) -> Option<Notification> {
        if !self.is_granted() {
            return None;
        }
        let route = if self.capabilities.service_worker && self.capabilities.worker_display {
            DeliveryRoute::WorkerMediated {
                icon: self.icon.clone(),
                vibrate: self.vibrate.clone(),
            }
        } else {
            DeliveryRoute::Direct
        };
        Some(Notification {
            title: title.to_string(),
            body: body.into(),
            route,
        })
    }
}
