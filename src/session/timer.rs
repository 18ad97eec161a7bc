use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use super::state::{transition, Session, SessionEvent};

/// One tick per second of elapsed time
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Recurring tick source that advances a session's elapsed counter
///
/// Holds at most one running task. Dropping the timer cancels it.
#[derive(Default)]
pub struct TickTimer {
    handle: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Create a stopped timer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start ticking the given session
    ///
    /// Fails if a tick task is already running; the old one must be
    /// stopped first.
    pub fn start(&mut self, session: Arc<Mutex<Session>>) -> Result<()> {
        if self.is_running() {
            anyhow::bail!("Tick timer is already running");
        }

        let period = TICK_PERIOD;
        debug!("Starting tick timer");

        self.handle = Some(tokio::spawn(async move {
            // First tick one full period after start
            let mut interval = time::interval_at(Instant::now() + period, period);

            loop {
                interval.tick().await;

                let mut session = session.lock().await;
                match transition(&session, SessionEvent::Tick) {
                    Ok(next) => *session = next,
                    Err(e) => {
                        warn!("Tick ignored: {}", e);
                        break;
                    }
                }
            }
        }));

        Ok(())
    }

    /// Stop the tick task if one is running
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Tick timer stopped");
        }
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
