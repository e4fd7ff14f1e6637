//! Deferred install prompt.
//!
//! The host offers an install prompt once; the core defers it behind an
//! install button and consumes it on the first click.

use crate::effect::Effect;
use log::info;

/// User's answer to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Dismissed => "dismissed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    #[default]
    Idle,
    /// Prompt deferred; button visible.
    Deferred,
    /// Prompt shown; waiting for the user's choice.
    Prompting,
    Installed,
}

#[derive(Debug, Clone, Default)]
pub struct InstallPrompt {
    state: InstallState,
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, InstallState::Deferred)
    }

    /// Host offered a prompt. Returns whether the view changed.
    pub fn offer(&mut self) -> bool {
        match self.state {
            InstallState::Idle => {
                self.state = InstallState::Deferred;
                info!("event=install_prompt module=install status=deferred");
                true
            }
            _ => false,
        }
    }

    /// Install button clicked. `None` when no prompt is deferred.
    pub fn begin_install(&mut self) -> Option<Effect> {
        if self.state != InstallState::Deferred {
            return None;
        }
        self.state = InstallState::Prompting;
        info!("event=install_prompt module=install status=start");
        Some(Effect::PromptInstall)
    }

    /// Consumes the deferred prompt; the button is hidden either way.
    pub fn complete_install(&mut self, outcome: InstallOutcome) -> bool {
        if self.state != InstallState::Prompting {
            return false;
        }
        self.state = match outcome {
            InstallOutcome::Accepted => InstallState::Installed,
            InstallOutcome::Dismissed => InstallState::Idle,
        };
        info!(
            "event=install_prompt module=install status=ok outcome={}",
            outcome.as_str()
        );
        true
    }

    /// Host reports the app is installed. Returns whether the view changed.
    pub fn mark_installed(&mut self) -> bool {
        let was_visible = self.is_visible();
        self.state = InstallState::Installed;
        was_visible
    }
}
