// Notification delivery
//
// Every login and logout produces exactly one notification carrying a fixed
// field set. Senders make a single best-effort attempt; callers decide what
// a failure means for the session.

mod dry_run;
mod emailjs;

use anyhow::Result;
use serde::Serialize;
use std::future::Future;

pub use dry_run::DryRunSender;
pub use emailjs::EmailJsSender;

/// Which end of a session a notification reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    LogIn,
    LogOut,
}

impl EventKind {
    /// Label shown to the user and sent in the `event` field
    pub fn label(self) -> &'static str {
        match self {
            EventKind::LogIn => "Log In",
            EventKind::LogOut => "Log Out",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Template parameters for one entry or exit email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub name: String,
    pub location: String,
    pub email: String,
    pub event: String,
    pub time: String,
    /// Formatted `HH:MM:SS`; empty for login
    pub duration: String,
}

impl Notification {
    pub fn new(
        name: &str,
        location: &str,
        email: &str,
        event: EventKind,
        time: String,
        duration: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            location: location.to_string(),
            email: email.to_string(),
            event: event.label().to_string(),
            time,
            duration: duration.unwrap_or_default(),
        }
    }
}

/// Delivers notifications to an external service
pub trait NotificationSender: Send + Sync {
    /// Make one delivery attempt
    fn send(&self, notification: &Notification) -> impl Future<Output = Result<()>> + Send;
}
