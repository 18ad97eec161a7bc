use super::duration::format_duration;
use super::state::{Phase, Session};
use super::validation::validate_login;

/// What the primary button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LogIn,
    LogOut,
}

/// Everything a surface needs to render the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModel {
    /// Name, location and email inputs accept edits
    pub inputs_enabled: bool,
    pub action: Action,
    pub action_label: &'static str,
    pub action_enabled: bool,
    /// Elapsed time line, only present while logged in
    pub duration: Option<String>,
}

impl ViewModel {
    pub fn from_session(session: &Session) -> Self {
        let busy = session.phase.is_busy();

        let action = if session.is_active() { Action::LogOut } else { Action::LogIn };

        let action_label = match (busy, action) {
            (true, _) => "Sending...",
            (false, Action::LogIn) => "Log In",
            (false, Action::LogOut) => "Log Out",
        };

        let action_enabled = !busy
            && match action {
                Action::LogIn => {
                    validate_login(&session.name, &session.location, &session.email).is_ok()
                }
                Action::LogOut => true,
            };

        let duration = match session.phase {
            Phase::LoggedIn | Phase::LoggingOut => Some(format_duration(session.elapsed_seconds)),
            Phase::LoggedOut | Phase::LoggingIn => None,
        };

        Self {
            inputs_enabled: session.phase == Phase::LoggedOut,
            action,
            action_label,
            action_enabled,
            duration,
        }
    }
}
