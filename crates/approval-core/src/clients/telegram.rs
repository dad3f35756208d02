//! Telegram client for delivering approval notifications

use crate::config::TelegramConfig;
use crate::error::{ApprovalError, Result};
use crate::types::ChatId;
use crate::workflow::traits::MessageSender;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;
use std::time::Duration;

/// Bot API sender for direct messages and the shared group channel.
///
/// Every send is bounded by the configured timeout; a timeout counts as a
/// delivery failure, not a crash.
pub struct TelegramSender {
    bot_token: String,
    group_chat_id: ChatId,
    http_client: HttpClient,
}

impl TelegramSender {
    pub fn new(config: TelegramConfig) -> Self {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.send_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            bot_token: config.bot_token,
            group_chat_id: ChatId::new(config.group_chat_id),
            http_client,
        }
    }

    /// Send one message through the Bot API.
    async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let payload = json!({
            "chat_id": chat_id.as_str(),
            "text": text,
            "disable_web_page_preview": true,
        });

        let response = self.http_client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApprovalError::ServiceUnavailable(format!(
                "Telegram API error: {}",
                error_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send_direct(&self, chat_id: &ChatId, text: &str) -> bool {
        match self.send_message(chat_id, text).await {
            Ok(()) => {
                log::info!("Telegram DM sent to {}", chat_id);
                true
            }
            Err(e) => {
                log::warn!("Telegram DM to {} failed: {}", chat_id, e);
                false
            }
        }
    }

    async fn send_broadcast(&self, text: &str) -> bool {
        match self.send_message(&self.group_chat_id, text).await {
            Ok(()) => {
                log::info!("Telegram group message sent");
                true
            }
            Err(e) => {
                log::warn!("Telegram group message failed: {}", e);
                false
            }
        }
    }
}
