//! In-memory recipient directory
//!
//! Backs the [`RecipientDirectory`] seam for deployments where the
//! recipient set lives with the process, and for tests. The admin UI
//! mutates entries through `upsert`/`deactivate`; the workflow core only
//! ever reads.

use crate::types::{ChatId, Recipient};
use crate::workflow::traits::RecipientDirectory;
use approval_types::Role;
use parking_lot::RwLock;

#[derive(Default)]
pub struct InMemoryRecipientDirectory {
    entries: RwLock<Vec<Recipient>>,
}

impl InMemoryRecipientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a recipient, replacing any existing entry with the same
    /// chat id. Recipients are never deleted, only deactivated.
    pub fn upsert(&self, recipient: Recipient) {
        let mut entries = self.entries.write();
        if let Some(existing) = entries.iter_mut().find(|r| r.chat_id == recipient.chat_id) {
            *existing = recipient;
        } else {
            entries.push(recipient);
        }
    }

    /// Soft-disable the recipient with the given chat id.
    pub fn deactivate(&self, chat_id: &ChatId) -> bool {
        let mut entries = self.entries.write();
        match entries.iter_mut().find(|r| &r.chat_id == chat_id) {
            Some(recipient) => {
                recipient.active = false;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl RecipientDirectory for InMemoryRecipientDirectory {
    fn active_by_role(&self, role: Role) -> Vec<Recipient> {
        self.entries
            .read()
            .iter()
            .filter(|r| r.active && r.role == role)
            .cloned()
            .collect()
    }

    fn match_requester(&self, name: &str, department: &str) -> Vec<Recipient> {
        if name.is_empty() {
            return Vec::new();
        }

        let entries = self.entries.read();
        let drafters: Vec<&Recipient> = entries
            .iter()
            .filter(|r| r.active && r.role == Role::Drafter)
            .collect();

        // Exact department+name match wins over name-only.
        if !department.is_empty() {
            let exact: Vec<Recipient> = drafters
                .iter()
                .filter(|r| r.name == name && r.department == department)
                .map(|r| (*r).clone())
                .collect();
            if !exact.is_empty() {
                return exact;
            }
        }

        drafters
            .into_iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect()
    }
}
