//! Collaborator seams for the route engine and dispatcher
//!
//! Each seam has explicit, required parameters - no optional context objects.
//! This enables compile-time safety and easy mocking for tests.

use crate::types::{ChatId, Recipient};
use approval_types::Role;
use async_trait::async_trait;

/// Read-only query capability over the recipient directory.
///
/// The directory is mutated only by the excluded admin UI; the core never
/// writes through this seam.
pub trait RecipientDirectory: Send + Sync {
    /// All active recipients carrying the given role, role-only filter.
    fn active_by_role(&self, role: Role) -> Vec<Recipient>;

    /// Active drafter recipients matching the requester of a document.
    ///
    /// Exact (department, name) matches win; when there is none, falls back
    /// to name-only matching. An empty name matches nobody.
    fn match_requester(&self, name: &str, department: &str) -> Vec<Recipient>;
}

/// Abstract message-send capability.
///
/// Implementations must absorb network failures: a failed delivery returns
/// `false`, it never surfaces as an error to the workflow that emitted the
/// notification. Sends are expected to be bounded in time.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a direct message to a single recipient address.
    async fn send_direct(&self, chat_id: &ChatId, text: &str) -> bool;

    /// Send one message to the shared group channel.
    async fn send_broadcast(&self, text: &str) -> bool;
}
