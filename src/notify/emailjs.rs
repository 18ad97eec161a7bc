use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::{Notification, NotificationSender};
use crate::config::DeliveryConfig;

/// Request body accepted by the EmailJS send endpoint
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    /// EmailJS calls the public key `user_id`
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a Notification,
}

/// Sends notifications through the EmailJS REST API
pub struct EmailJsSender {
    client: Client,
    config: DeliveryConfig,
}

impl EmailJsSender {
    /// Create a sender for the configured service and template
    pub fn new(config: DeliveryConfig) -> Result<Self> {
        let url = url::Url::parse(&config.endpoint)
            .context("Invalid delivery endpoint URL")?;

        if url.scheme() != "https" {
            anyhow::bail!("Delivery endpoint must use HTTPS (got: {})", url.scheme());
        }

        let client = Client::builder()
            .user_agent(format!("punch-clock/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .https_only(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn request_body<'a>(&'a self, notification: &'a Notification) -> SendRequest<'a> {
        SendRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            access_token: self.config.private_key.as_deref(),
            template_params: notification,
        }
    }
}

impl NotificationSender for EmailJsSender {
    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::debug!("Posting {} notification to: {}", notification.event, self.config.endpoint);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&self.request_body(notification))
            .send()
            .await
            .context("Failed to connect to email delivery service")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        check_response(status, &body)?;

        tracing::info!("{} email accepted by delivery service", notification.event);
        Ok(())
    }
}

/// Map a delivery service response to success or an error
fn check_response(status: StatusCode, body: &str) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            anyhow::bail!(
                "Access denied ({}). Check the service id, template id and keys: {}",
                status,
                body.trim()
            )
        }
        status => {
            anyhow::bail!(
                "Email delivery service returned unexpected status {}: {}",
                status,
                body.trim()
            )
        }
    }
}
