use thiserror::Error;
use uuid::Uuid;

use super::validation::{validate_login, ValidationError};

/// Lifecycle phase of a tracking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    LoggedOut,
    /// Entry notification in flight
    LoggingIn,
    LoggedIn,
    /// Exit notification in flight
    LoggingOut,
}

impl Phase {
    /// Whether a notification is currently being sent
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::LoggingIn | Phase::LoggingOut)
    }
}

/// Editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Location,
    Email,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Field::Name => "name",
            Field::Location => "location",
            Field::Email => "email",
        };
        f.write_str(label)
    }
}

/// Input to the session state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    EditField(Field, String),
    /// Login button pressed; carries the formatted login time
    LoginRequested { time: String },
    /// Entry notification finished, successfully or not
    LoginSettled,
    LogoutRequested,
    /// Exit notification finished, successfully or not
    LogoutSettled,
    Tick,
}

/// Event that is not allowed in the current phase
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("A notification is already being sent")]
    Busy,
    #[error("Already logged in")]
    AlreadyLoggedIn,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("The {0} field cannot be changed while logged in")]
    FieldLocked(Field),
    #[error("{event} is not valid while {phase:?}")]
    Unexpected { event: &'static str, phase: Phase },
}

/// The in-memory record of the current user's session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub name: String,
    pub location: String,
    pub email: String,
    pub phase: Phase,
    pub elapsed_seconds: u64,
    /// Identifier for log correlation, present from login request to logout
    pub session_id: Option<Uuid>,
    /// Formatted login timestamp
    pub started_at: Option<String>,
}

impl Session {
    /// Create an empty, logged-out session
    pub fn new() -> Self {
        Self::default()
    }

    /// True from the moment login completes until logout completes
    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::LoggedIn | Phase::LoggingOut)
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Location => &self.location,
            Field::Email => &self.email,
        }
    }
}

/// Compute the next session for an event
///
/// Pure: the input session is never modified, and a rejected event
/// leaves the caller's state exactly as it was.
pub fn transition(session: &Session, event: SessionEvent) -> Result<Session, TransitionError> {
    let mut next = session.clone();

    match event {
        SessionEvent::EditField(field, value) => {
            match session.phase {
                Phase::LoggedOut => {}
                Phase::LoggingIn | Phase::LoggingOut => return Err(TransitionError::Busy),
                Phase::LoggedIn => return Err(TransitionError::FieldLocked(field)),
            }
            match field {
                Field::Name => next.name = value,
                Field::Location => next.location = value,
                Field::Email => next.email = value,
            }
        }
        SessionEvent::LoginRequested { time } => {
            match session.phase {
                Phase::LoggedOut => {}
                Phase::LoggingIn | Phase::LoggingOut => return Err(TransitionError::Busy),
                Phase::LoggedIn => return Err(TransitionError::AlreadyLoggedIn),
            }
            validate_login(&session.name, &session.location, &session.email)?;
            next.phase = Phase::LoggingIn;
            next.session_id = Some(Uuid::new_v4());
            next.started_at = Some(time);
        }
        SessionEvent::LoginSettled => {
            if session.phase != Phase::LoggingIn {
                return Err(TransitionError::Unexpected {
                    event: "login completion",
                    phase: session.phase,
                });
            }
            next.phase = Phase::LoggedIn;
            next.elapsed_seconds = 0;
        }
        SessionEvent::LogoutRequested => {
            match session.phase {
                Phase::LoggedIn => {}
                Phase::LoggingIn | Phase::LoggingOut => return Err(TransitionError::Busy),
                Phase::LoggedOut => return Err(TransitionError::NotLoggedIn),
            }
            next.phase = Phase::LoggingOut;
        }
        SessionEvent::LogoutSettled => {
            if session.phase != Phase::LoggingOut {
                return Err(TransitionError::Unexpected {
                    event: "logout completion",
                    phase: session.phase,
                });
            }
            next.phase = Phase::LoggedOut;
            next.elapsed_seconds = 0;
            next.session_id = None;
            next.started_at = None;
        }
        SessionEvent::Tick => {
            if !session.is_active() {
                return Err(TransitionError::Unexpected {
                    event: "tick",
                    phase: session.phase,
                });
            }
            next.elapsed_seconds += 1;
        }
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> Session {
        Session {
            name: "Jane".to_string(),
            location: "Office".to_string(),
            email: "jane@example.com".to_string(),
            ..Session::default()
        }
    }

    fn login_requested() -> SessionEvent {
        SessionEvent::LoginRequested {
            time: "10/18/2026, 9:00:00 AM".to_string(),
        }
    }

    fn logged_in_session() -> Session {
        let session = transition(&filled_session(), login_requested()).unwrap();
        transition(&session, SessionEvent::LoginSettled).unwrap()
    }

    #[test]
    fn new_session_is_logged_out_and_idle() {
        let session = Session::new();
        assert_eq!(session.phase, Phase::LoggedOut);
        assert!(!session.is_active());
        assert_eq!(session.elapsed_seconds, 0);
        assert!(session.session_id.is_none());
    }

    #[test]
    fn edit_fields_while_logged_out() {
        let session = Session::new();
        let session = transition(&session, SessionEvent::EditField(Field::Name, "Jane".into())).unwrap();
        let session =
            transition(&session, SessionEvent::EditField(Field::Location, "Office".into())).unwrap();
        let session =
            transition(&session, SessionEvent::EditField(Field::Email, "jane@example.com".into()))
                .unwrap();

        assert_eq!(session, filled_session());
    }

    #[test]
    fn full_lifecycle() {
        let session = filled_session();

        let session = transition(&session, login_requested()).unwrap();
        assert_eq!(session.phase, Phase::LoggingIn);
        assert!(!session.is_active());
        assert!(session.session_id.is_some());
        assert_eq!(session.started_at.as_deref(), Some("10/18/2026, 9:00:00 AM"));

        let session = transition(&session, SessionEvent::LoginSettled).unwrap();
        assert_eq!(session.phase, Phase::LoggedIn);
        assert!(session.is_active());

        let session = transition(&session, SessionEvent::Tick).unwrap();
        let session = transition(&session, SessionEvent::Tick).unwrap();
        assert_eq!(session.elapsed_seconds, 2);

        let session = transition(&session, SessionEvent::LogoutRequested).unwrap();
        assert_eq!(session.phase, Phase::LoggingOut);
        assert!(session.is_active());
        assert_eq!(session.elapsed_seconds, 2);

        let session = transition(&session, SessionEvent::LogoutSettled).unwrap();
        assert_eq!(session.phase, Phase::LoggedOut);
        assert!(!session.is_active());
        assert_eq!(session.elapsed_seconds, 0);
        assert!(session.session_id.is_none());
        assert!(session.started_at.is_none());

        // Form values survive for the next session
        assert_eq!(session.name, "Jane");
    }

    #[test]
    fn login_rejected_for_invalid_input_without_state_change() {
        for email in ["", "jane", "jane@example", "@example.com"] {
            let mut session = filled_session();
            session.email = email.to_string();

            let result = transition(&session, login_requested());
            assert!(matches!(result, Err(TransitionError::Invalid(_))), "email {:?}", email);
            assert_eq!(session.phase, Phase::LoggedOut);
            assert!(!session.is_active());
        }
    }

    #[test]
    fn login_rejected_while_busy_or_logged_in() {
        let logging_in = transition(&filled_session(), login_requested()).unwrap();
        assert_eq!(transition(&logging_in, login_requested()), Err(TransitionError::Busy));

        let logged_in = logged_in_session();
        assert_eq!(
            transition(&logged_in, login_requested()),
            Err(TransitionError::AlreadyLoggedIn)
        );
    }

    #[test]
    fn logout_rejected_unless_logged_in() {
        assert_eq!(
            transition(&filled_session(), SessionEvent::LogoutRequested),
            Err(TransitionError::NotLoggedIn)
        );

        let logging_out = transition(&logged_in_session(), SessionEvent::LogoutRequested).unwrap();
        assert_eq!(
            transition(&logging_out, SessionEvent::LogoutRequested),
            Err(TransitionError::Busy)
        );
    }

    #[test]
    fn fields_locked_while_logged_in() {
        let session = logged_in_session();
        assert_eq!(
            transition(&session, SessionEvent::EditField(Field::Email, "x@y.z".into())),
            Err(TransitionError::FieldLocked(Field::Email))
        );
    }

    #[test]
    fn fields_locked_while_sending() {
        let session = transition(&filled_session(), login_requested()).unwrap();
        assert_eq!(
            transition(&session, SessionEvent::EditField(Field::Name, "Bob".into())),
            Err(TransitionError::Busy)
        );
    }

    #[test]
    fn ticks_only_count_while_active() {
        assert!(transition(&filled_session(), SessionEvent::Tick).is_err());

        let logging_in = transition(&filled_session(), login_requested()).unwrap();
        assert!(transition(&logging_in, SessionEvent::Tick).is_err());

        let logging_out = transition(&logged_in_session(), SessionEvent::LogoutRequested).unwrap();
        assert_eq!(transition(&logging_out, SessionEvent::Tick).unwrap().elapsed_seconds, 1);
    }

    #[test]
    fn settle_events_require_matching_phase() {
        assert!(transition(&filled_session(), SessionEvent::LoginSettled).is_err());
        assert!(transition(&filled_session(), SessionEvent::LogoutSettled).is_err());
        assert!(transition(&logged_in_session(), SessionEvent::LoginSettled).is_err());
    }

    #[test]
    fn busy_phases() {
        assert!(Phase::LoggingIn.is_busy());
        assert!(Phase::LoggingOut.is_busy());
        assert!(!Phase::LoggedIn.is_busy());
        assert!(!Phase::LoggedOut.is_busy());
    }
}
