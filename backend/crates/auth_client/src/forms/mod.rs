//! Headless Auth Forms
//!
//! Each form runs `Idle -> Submitting -> (Succeeded | Failed) -> Idle`.
//! Validation failures never leave `Idle` and never reach the client.
//! Status is published on a watch channel so a view can render the
//! in-flight state while `submit` holds the form.

pub mod password_toggle;
pub mod sign_in;
pub mod sign_up;
pub mod social;

use tokio::sync::watch;

pub use password_toggle::PasswordToggle;
pub use sign_in::SignInController;
pub use sign_up::SignUpController;
pub use social::{SocialSignInController, SocialStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl FormStatus {
    /// Inputs and the submit control are disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }
}

/// How a `submit` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Field errors recorded, nothing sent
    Invalid,
    Succeeded,
    Failed,
}

/// Latest-value status publisher
pub(crate) struct StatusCell<T>(watch::Sender<T>);

impl<T: Copy> StatusCell<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self(watch::Sender::new(initial))
    }

    pub(crate) fn get(&self) -> T {
        *self.0.borrow()
    }

    /// Publishes even when nobody is subscribed
    pub(crate) fn set(&self, value: T) {
        self.0.send_replace(value);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<T> {
        self.0.subscribe()
    }
}
