use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::clock::WallClock;
use super::duration::format_duration;
use super::state::{transition, Field, Session, SessionEvent, TransitionError};
use super::timer::TickTimer;
use super::view::ViewModel;
use crate::config::TrackerSettings;
use crate::notify::{EventKind, Notification, NotificationSender};

/// Result of the single delivery attempt made for a login or logout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed(String),
}

/// Report returned once a login or logout has completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: EventKind,
    pub outcome: DeliveryOutcome,
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        self.outcome == DeliveryOutcome::Sent
    }

    /// Confirmation or alert text for the user
    pub fn message(&self) -> String {
        match self.outcome {
            DeliveryOutcome::Sent => format!("{} email sent!", self.event),
            DeliveryOutcome::Failed(_) => {
                "Failed to send email. Check the log for details.".to_string()
            }
        }
    }
}

/// Owns a session, its tick timer and the notification sender
///
/// All state changes go through [`transition`]. The timer is started only
/// after the entry notification settles and stopped only after the exit
/// notification settles.
pub struct SessionController<N> {
    session: Arc<Mutex<Session>>,
    timer: Mutex<TickTimer>,
    sender: N,
    clock: WallClock,
}

impl<N: NotificationSender> SessionController<N> {
    /// Create a controller with a fresh, logged-out session
    pub fn new(sender: N, settings: &TrackerSettings) -> anyhow::Result<Self> {
        Ok(Self::with_clock(sender, settings.clock()?))
    }

    pub fn with_clock(sender: N, clock: WallClock) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            timer: Mutex::new(TickTimer::new()),
            sender,
            clock,
        }
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub async fn view(&self) -> ViewModel {
        ViewModel::from_session(&*self.session.lock().await)
    }

    /// Change a form field; only allowed while logged out
    pub async fn edit(&self, field: Field, value: impl Into<String>) -> Result<(), TransitionError> {
        let mut session = self.session.lock().await;
        *session = transition(&session, SessionEvent::EditField(field, value.into()))?;
        Ok(())
    }

    /// Validate the form, send the entry notification and start the timer
    ///
    /// The session is logged in once the send settles, whether or not it
    /// succeeded.
    pub async fn login(&self) -> Result<Delivery, TransitionError> {
        let notification = {
            let mut session = self.session.lock().await;
            let time = self.clock.now_string();
            let next = transition(&session, SessionEvent::LoginRequested { time: time.clone() })?;
            *session = next;

            info!(
                session_id = ?session.session_id,
                "Logging in {} at {} ({})",
                session.name,
                time,
                self.clock.zone()
            );

            Notification::new(
                &session.name,
                &session.location,
                &session.email,
                EventKind::LogIn,
                time,
                None,
            )
        };

        let delivery = self.deliver(EventKind::LogIn, &notification).await;

        let mut timer = self.timer.lock().await;
        {
            let mut session = self.session.lock().await;
            *session = transition(&session, SessionEvent::LoginSettled)?;
        }
        if let Err(e) = timer.start(self.session.clone()) {
            error!("Failed to start tick timer: {:#}", e);
        }

        Ok(delivery)
    }

    /// Send the exit notification with the elapsed duration, then stop the
    /// timer and reset the counter
    pub async fn logout(&self) -> Result<Delivery, TransitionError> {
        let notification = {
            let mut session = self.session.lock().await;
            let next = transition(&session, SessionEvent::LogoutRequested)?;
            *session = next;

            let time = self.clock.now_string();
            let duration = format_duration(session.elapsed_seconds);

            info!(
                session_id = ?session.session_id,
                "Logging out {} at {} after {} (logged in at {})",
                session.name,
                time,
                duration,
                session.started_at.as_deref().unwrap_or("unknown")
            );

            Notification::new(
                &session.name,
                &session.location,
                &session.email,
                EventKind::LogOut,
                time,
                Some(duration),
            )
        };

        let delivery = self.deliver(EventKind::LogOut, &notification).await;

        let mut timer = self.timer.lock().await;
        timer.stop();
        let mut session = self.session.lock().await;
        *session = transition(&session, SessionEvent::LogoutSettled)?;

        Ok(delivery)
    }

    /// One best-effort send; failures are logged and reported, never retried
    async fn deliver(&self, event: EventKind, notification: &Notification) -> Delivery {
        tracing::debug!("Sending email with params: {:?}", notification);

        match self.sender.send(notification).await {
            Ok(()) => {
                info!("{} email sent!", event);
                Delivery {
                    event,
                    outcome: DeliveryOutcome::Sent,
                }
            }
            Err(e) => {
                error!("Email error: {:#}", e);
                warn!("Continuing {} without a delivered notification", event);
                Delivery {
                    event,
                    outcome: DeliveryOutcome::Failed(format!("{:#}", e)),
                }
            }
        }
    }
}
