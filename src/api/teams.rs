use crate::errors::{HookError, Result};
use crate::models::message::TeamsMessage;
use reqwest::Client;

pub struct TeamsClient {
    client: Client,
    webhook_url: String,
}

impl TeamsClient {
    pub fn new(webhook_url: String) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    /// Posts one message to the incoming webhook. Any non-2xx answer is an error.
    pub async fn post_message(&self, message: &TeamsMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(HookError::WebhookRejected { status, body });
        }

        Ok(())
    }
}
