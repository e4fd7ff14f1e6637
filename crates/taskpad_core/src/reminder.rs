//! Periodic reminder about unfinished tasks.
//!
//! # Invariants
//! - At most one reminder timer is active; starting replaces the previous one.
//! - Ticks from a replaced timer are ignored.
//! - Nothing is persisted; a reload restarts from zero elapsed time.

use crate::effect::{Effect, TimerId, TimerPurpose};
use crate::notify::{reminder_message, Notification, NotificationGateway};
use log::{debug, info};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    period: Duration,
    active: Option<TimerId>,
}

impl ReminderScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            active: None,
        }
    }

    pub fn active_timer(&self) -> Option<TimerId> {
        self.active
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Starts the recurring timer under `timer`, cancelling any previous one.
    pub fn start(&mut self, timer: TimerId) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(previous) = self.active.replace(timer) {
            effects.push(Effect::CancelInterval { timer: previous });
        }
        effects.push(Effect::StartInterval {
            timer,
            period: self.period,
            purpose: TimerPurpose::Reminder,
        });
        info!(
            "event=reminder_start module=reminder status=ok timer={} period_secs={}",
            timer,
            self.period.as_secs()
        );
        effects
    }

    /// Evaluates one tick. Returns the reminder to show, if any.
    pub fn on_tick(
        &self,
        timer: TimerId,
        active_count: usize,
        gateway: &NotificationGateway,
    ) -> Option<Notification> {
        if self.active != Some(timer) {
            debug!("event=reminder_tick module=reminder status=skipped timer={timer} reason=stale");
            return None;
        }
        if active_count == 0 {
            debug!("event=reminder_tick module=reminder status=skipped timer={timer} reason=no_active_tasks");
            return None;
        }
        let (title, body) = reminder_message(active_count);
        let notification = gateway.notify(title, body);
        info!(
            "event=reminder_tick module=reminder status=ok timer={} active={} emitted={}",
            timer,
            active_count,
            notification.is_some()
        );
        notification
    }
}

#[cfg(test)]
mod tests {
    use super::ReminderScheduler;
    use crate::config::AppConfig;
    use crate::effect::{Effect, TimerId, TimerPurpose};
    use crate::notify::{HostCapabilities, NotificationGateway, Permission};
    use std::time::Duration;

    fn gateway(permission: Permission) -> NotificationGateway {
        NotificationGateway::new(HostCapabilities::default(), permission, &AppConfig::default())
    }

    #[test]
    fn restarting_cancels_previous_timer() {
        let mut reminder = ReminderScheduler::new(Duration::from_secs(7_200));
        assert_eq!(
            reminder.start(TimerId(1)),
            vec![Effect::StartInterval {
                timer: TimerId(1),
                period: Duration::from_secs(7_200),
                purpose: TimerPurpose::Reminder,
            }]
        );
        let effects = reminder.start(TimerId(2));
        assert_eq!(effects[0], Effect::CancelInterval { timer: TimerId(1) });
        assert_eq!(reminder.active_timer(), Some(TimerId(2)));
    }

    #[test]
    fn tick_reports_active_count_only_when_granted() {
        let mut reminder = ReminderScheduler::new(Duration::from_secs(1));
        reminder.start(TimerId(5));

        let note = reminder
            .on_tick(TimerId(5), 3, &gateway(Permission::Granted))
            .expect("reminder");
        assert_eq!(note.title, "Task reminder");
        assert_eq!(note.body, "You have 3 unfinished tasks");

        assert!(reminder.on_tick(TimerId(5), 0, &gateway(Permission::Granted)).is_none());
        assert!(reminder.on_tick(TimerId(5), 3, &gateway(Permission::Denied)).is_none());
    }

    #[test]
    fn stale_timer_ticks_are_ignored() {
        let mut reminder = ReminderScheduler::new(Duration::from_secs(1));
        reminder.start(TimerId(1));
        reminder.start(TimerId(2));
        assert!(reminder.on_tick(TimerId(1), 4, &gateway(Permission::Granted)).is_none());
    }
}
