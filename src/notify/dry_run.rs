use anyhow::Result;
use tracing::info;

use super::{Notification, NotificationSender};

/// Sender that only logs, for running without delivery credentials
#[derive(Debug, Clone, Default)]
pub struct DryRunSender;

impl NotificationSender for DryRunSender {
    async fn send(&self, notification: &Notification) -> Result<()> {
        info!(
            "[DRY RUN] Would send {} email for {} <{}> at {} (location: {}, duration: {:?})",
            notification.event,
            notification.name,
            notification.email,
            notification.time,
            notification.location,
            notification.duration
        );
        Ok(())
    }
}
