//! Configuration management for the approval system

use crate::error::{ApprovalError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub portal: PortalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,

    #[serde(alias = "chat_id")] // Accept both 'group_chat_id' and 'chat_id'
    pub group_chat_id: String,

    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,
}

/// Portal links embedded in notification texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_portal_base_url")]
    pub base_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: default_portal_base_url(),
        }
    }
}

// Default functions
fn default_send_timeout_secs() -> u64 {
    5
}

fn default_portal_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl ApprovalConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ApprovalError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ApprovalConfig = serde_json::from_str(json)
            .map_err(|e| ApprovalError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            return Err(ApprovalError::Config(
                "Telegram bot token is required".to_string(),
            ));
        }

        if self.telegram.group_chat_id.is_empty() {
            return Err(ApprovalError::Config(
                "Telegram group chat id is required".to_string(),
            ));
        }

        if self.telegram.send_timeout_secs == 0 {
            return Err(ApprovalError::Config(
                "Telegram send timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
