//! Evolution API WhatsApp relay client

use crate::config::RelayConfig;
use crate::funnel::submission::NotificationSink;
use serde::Serialize;

/// Body of an Evolution API sendText request
#[derive(Debug, Serialize)]
struct SendTextBody<'a> {
    number: &'a str,
    text: &'a str,
}

/// Sends lead notifications through an Evolution API instance.
/// When the relay is not configured the message is written to the log
/// instead and delivery is reported as successful, so a bare deployment
/// still captures leads.
#[derive(Debug, Clone)]
pub struct RelayClient {
    config: RelayConfig,
    client: reqwest::Client,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Send a text message to a WhatsApp number through the relay
    pub async fn send_text(&self, number: &str, text: &str) -> Result<(), String> {
        let url = format!(
            "{}/message/sendText/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.instance
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .json(&SendTextBody { number, text })
            .send()
            .await
            .map_err(|e| format!("Relay request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Relay returned {}: {}", status, body));
        }

        Ok(())
    }
}

impl NotificationSink for RelayClient {
    async fn notify(&self, message: &str) -> Result<(), String> {
        if !self.is_configured() {
            log::info!("Relay not configured, notification text:\n{}", message);
            return Ok(());
        }
        self.send_text(&self.config.notify_number, message).await
    }
}
