//! LINE Messaging API push client.

use async_trait::async_trait;
use craftbell_core::dispatch::PushNotifier;
use craftbell_core::error::{BotError, Result};
use tracing::debug;

pub struct LinePush {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl LinePush {
    pub fn new(client: reqwest::Client, base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
            token: token.into(),
        }
    }

    fn push_url(&self) -> String {
        format!("{}/v2/bot/message/push", self.base.trim_end_matches('/'))
    }
}

#[async_trait]
impl PushNotifier for LinePush {
    /// POST one text message to one recipient. Success is HTTP 200;
    /// anything else is a `Notify` error for the caller to log.
    async fn send(&self, to: &str, text: &str) -> Result<()> {
        let body = serde_json::json!({
            "to": to,
            "messages": [{"type": "text", "text": text}],
        });

        let response = self
            .client
            .post(self.push_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BotError::Notify {
                target: to.to_string(),
                reason: e.to_string(),
            })?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(BotError::Notify {
                target: to.to_string(),
                reason: format!("http {}", response.status()),
            });
        }
        debug!(user = %to, "push delivered");
        Ok(())
    }
}
