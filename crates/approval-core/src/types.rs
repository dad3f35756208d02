//! Domain types shared across the approval core
//!
//! The document itself lives in the excluded storage layer; the engine only
//! sees the fields it needs to build a route and address notifications.

use approval_types::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly typed document id (storage-layer primary key)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(i64);

impl DocumentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subject document as handed over by the web layer.
///
/// One route per document, ever; the engine enforces the one-to-one
/// relation through [`DocumentId`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub requester_name: String,
    pub requester_department: String,
    pub created_at: DateTime<Utc>,
}

/// Strongly typed messenger chat id (numeric or string ids both occur)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification target in the recipient directory.
///
/// Never deleted by the workflow itself; retired entries are soft-disabled
/// through `active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: String,
    pub chat_id: ChatId,
    pub active: bool,
}

impl Recipient {
    pub fn new(role: Role, chat_id: ChatId) -> Self {
        Self {
            role,
            name: String::new(),
            department: String::new(),
            chat_id,
            active: true,
        }
    }

    pub fn with_identity(mut self, name: impl Into<String>, department: impl Into<String>) -> Self {
        self.name = name.into();
        self.department = department.into();
        self
    }
}
