use anyhow::{Context, Result};

use crate::config::Config;
use crate::notify::{DryRunSender, EmailJsSender, NotificationSender};
use crate::session::{Field, SessionController};
use crate::ui::run_terminal;

/// Form values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct Prefill {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
}

/// Run the interactive tracker
pub async fn run_start(config: Config, dry_run: bool, prefill: Prefill) -> Result<()> {
    config.validate(!dry_run).context("Invalid configuration")?;

    tracing::info!("Timestamps shown in {}", config.tracker.timezone);

    if dry_run {
        tracing::info!("[DRY RUN] Notifications will be logged, not sent");
        let controller = SessionController::new(DryRunSender, &config.tracker)?;
        run_session(&controller, prefill).await
    } else {
        tracing::info!("Delivery service: {}", config.delivery.endpoint);
        let sender = EmailJsSender::new(config.delivery.clone())?;
        let controller = SessionController::new(sender, &config.tracker)?;
        run_session(&controller, prefill).await
    }
}

async fn run_session<N: NotificationSender>(controller: &SessionController<N>, prefill: Prefill) -> Result<()> {
    apply_prefill(controller, prefill).await?;
    run_terminal(controller).await
}

async fn apply_prefill<N: NotificationSender>(controller: &SessionController<N>, prefill: Prefill) -> Result<()> {
    for (field, value) in [
        (Field::Name, prefill.name),
        (Field::Location, prefill.location),
        (Field::Email, prefill.email),
    ] {
        if let Some(value) = value {
            controller
                .edit(field, value)
                .await
                .with_context(|| format!("Failed to prefill {}", field))?;
        }
    }
    Ok(())
}
