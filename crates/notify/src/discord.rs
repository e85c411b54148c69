//! Discord webhook publisher.

use std::time::Duration;

use async_trait::async_trait;
use condor_core::DiscordConfig;
use condor_range::{CondorReport, ReportPublisher};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::embed::{build_embed, EmbedStyle, WebhookPayload};
use crate::error::{NotifyError, Result};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Posts reports as embeds to a Discord channel webhook.
pub struct DiscordWebhook {
    url: SecretString,
    username: Option<String>,
    style: EmbedStyle,
    http: Client,
}

impl std::fmt::Debug for DiscordWebhook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordWebhook")
            .field("url", &"[REDACTED]")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl DiscordWebhook {
    /// Creates a publisher for a webhook URL.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(url: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url,
            username: None,
            style: EmbedStyle::default(),
            http,
        })
    }

    /// Creates a publisher from configuration.
    ///
    /// # Errors
    /// Returns `MissingWebhook` when no URL is configured.
    pub fn from_config(config: &DiscordConfig) -> Result<Self> {
        let url = config
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(NotifyError::MissingWebhook)?;

        let mut webhook = Self::new(SecretString::from(url.to_string()))?;
        webhook.username.clone_from(&config.username);
        webhook.style = EmbedStyle {
            color: config.color,
            footer: config.footer.clone(),
        };
        Ok(webhook)
    }

    /// Builds the webhook body for a report.
    #[must_use]
    pub fn payload(&self, report: &CondorReport) -> WebhookPayload {
        WebhookPayload {
            username: self.username.clone(),
            embeds: vec![build_embed(report, &self.style)],
        }
    }

    /// Sends one report.
    ///
    /// # Errors
    /// Returns `Api` for any non-2xx answer (Discord replies 204 on success).
    pub async fn send(&self, report: &CondorReport) -> Result<()> {
        let body = serde_json::to_vec(&self.payload(report))?;
        debug!(symbol = %report.symbol, bytes = body.len(), "Posting Discord embed");

        let response = self
            .http
            .post(self.url.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(NotifyError::api(status.as_u16(), text));
        }

        info!(symbol = %report.symbol, status = status.as_u16(), "Discord message sent");
        Ok(())
    }
}

#[async_trait]
impl ReportPublisher for DiscordWebhook {
    async fn publish(&self, report: &CondorReport) -> anyhow::Result<()> {
        if let Err(e) = self.send(report).await {
            warn!(retryable = e.is_retryable(), error = %e, "Discord delivery failed");
            return Err(e.into());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "discord"
    }
}
