//! Notification dispatcher
//!
//! Resolves a routing decision into concrete recipients and performs the
//! sends. Strictly downstream of the route state change: delivery failures
//! are recorded in the summary, never raised, so a dead messenger can
//! never look like a failed approval.

use crate::services::notification_router::{decide, RoutingDecision};
use crate::types::ChatId;
use crate::workflow::route_types::RouteEvent;
use crate::workflow::traits::{MessageSender, RecipientDirectory};
use approval_types::{EventKind, Role, TemplateCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one direct-message attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmOutcome {
    pub role: Role,
    pub chat_id: ChatId,
    pub delivered: bool,
}

/// Structured result of one dispatch call, for observability and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub dm: Vec<DmOutcome>,
    /// `None` when the decision did not call for a broadcast.
    pub broadcast: Option<bool>,
    pub decision: RoutingDecision,
}

impl DispatchSummary {
    /// True when every attempted delivery succeeded.
    pub fn all_delivered(&self) -> bool {
        self.dm.iter().all(|o| o.delivered) && self.broadcast.unwrap_or(true)
    }
}

pub struct NotificationDispatcher {
    directory: Arc<dyn RecipientDirectory>,
    sender: Arc<dyn MessageSender>,
}

impl NotificationDispatcher {
    pub fn new(directory: Arc<dyn RecipientDirectory>, sender: Arc<dyn MessageSender>) -> Self {
        Self { directory, sender }
    }

    /// Decide targets for the event and perform the sends.
    ///
    /// Requester DMs use drafter matching: exact department+name first,
    /// name-only fallback, and silently nobody when neither matches - a
    /// missing recipient is not an error.
    pub async fn dispatch(
        &self,
        template: TemplateCode,
        event: EventKind,
        actor_role: Option<Role>,
        requester_name: &str,
        requester_department: &str,
        text: &str,
    ) -> DispatchSummary {
        let decision = decide(template, event, actor_role);
        let mut dm = Vec::new();

        for role in &decision.dm_roles {
            for recipient in self.directory.active_by_role(*role) {
                let delivered = self.sender.send_direct(&recipient.chat_id, text).await;
                if !delivered {
                    log::warn!(
                        "DM to {} recipient {} failed",
                        role,
                        recipient.chat_id
                    );
                }
                dm.push(DmOutcome {
                    role: *role,
                    chat_id: recipient.chat_id,
                    delivered,
                });
            }
        }

        if decision.dm_requester {
            for recipient in self
                .directory
                .match_requester(requester_name, requester_department)
            {
                let delivered = self.sender.send_direct(&recipient.chat_id, text).await;
                if !delivered {
                    log::warn!("Requester DM to {} failed", recipient.chat_id);
                }
                dm.push(DmOutcome {
                    role: Role::Drafter,
                    chat_id: recipient.chat_id,
                    delivered,
                });
            }
        }

        let broadcast = if decision.broadcast {
            let delivered = self.sender.send_broadcast(text).await;
            if !delivered {
                log::warn!("Broadcast for {} {} failed", template, event);
            }
            Some(delivered)
        } else {
            None
        };

        log::info!(
            "Dispatched {} {} notifications: {} DM(s), broadcast={:?}",
            template,
            event,
            dm.len(),
            broadcast
        );

        DispatchSummary {
            dm,
            broadcast,
            decision,
        }
    }

    /// Dispatch for a transition event drained from the route engine.
    pub async fn dispatch_event(&self, event: &RouteEvent, text: &str) -> DispatchSummary {
        self.dispatch(
            event.template,
            event.kind,
            event.actor_role,
            &event.requester_name,
            &event.requester_department,
            text,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryRecipientDirectory;
    use crate::types::Recipient;
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records every send; direct sends to chat ids listed in `failing`
    /// report failure.
    #[derive(Default)]
    struct RecordingSender {
        direct: Mutex<Vec<(ChatId, String)>>,
        broadcasts: Mutex<Vec<String>>,
        failing: Vec<ChatId>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send_direct(&self, chat_id: &ChatId, text: &str) -> bool {
            self.direct.lock().push((chat_id.clone(), text.to_string()));
            !self.failing.contains(chat_id)
        }

        async fn send_broadcast(&self, text: &str) -> bool {
            self.broadcasts.lock().push(text.to_string());
            true
        }
    }

    fn directory() -> Arc<InMemoryRecipientDirectory> {
        let directory = InMemoryRecipientDirectory::new();
        directory.upsert(
            Recipient::new(Role::Drafter, ChatId::new("100")).with_identity("Kim", "Sales"),
        );
        directory.upsert(
            Recipient::new(Role::Drafter, ChatId::new("101")).with_identity("Kim", "Finance"),
        );
        directory.upsert(Recipient::new(Role::Admin, ChatId::new("200")).with_identity("Park", ""));
        Arc::new(directory)
    }

    #[tokio::test]
    async fn submit_dms_every_active_admin_and_broadcasts() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = NotificationDispatcher::new(directory(), sender.clone());

        let summary = dispatcher
            .dispatch(
                TemplateCode::Normal,
                EventKind::Submit,
                None,
                "Kim",
                "Sales",
                "submitted",
            )
            .await;

        assert_eq!(summary.dm.len(), 1);
        assert_eq!(summary.dm[0].role, Role::Admin);
        assert_eq!(summary.dm[0].chat_id.as_str(), "200");
        assert!(summary.dm[0].delivered);
        assert_eq!(summary.broadcast, Some(true));
        assert!(summary.all_delivered());

        assert_eq!(sender.direct.lock().len(), 1);
        assert_eq!(sender.broadcasts.lock().as_slice(), ["submitted"]);
    }

    #[tokio::test]
    async fn requester_dm_prefers_exact_department_match() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = NotificationDispatcher::new(directory(), sender.clone());

        let summary = dispatcher
            .dispatch(
                TemplateCode::AdminFinal,
                EventKind::Reject,
                Some(Role::Admin),
                "Kim",
                "Sales",
                "rejected",
            )
            .await;

        let requester_dms: Vec<_> = summary.dm.iter().filter(|o| o.role == Role::Drafter).collect();
        assert_eq!(requester_dms.len(), 1);
        assert_eq!(requester_dms[0].chat_id.as_str(), "100");
    }

    #[tokio::test]
    async fn missing_requester_recipient_is_silent() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = NotificationDispatcher::new(directory(), sender.clone());

        let summary = dispatcher
            .dispatch(
                TemplateCode::AdminFinal,
                EventKind::Approve,
                Some(Role::Admin),
                "Nobody",
                "Nowhere",
                "approved",
            )
            .await;

        assert!(summary.dm.is_empty());
        // The forced broadcast still goes out.
        assert_eq!(summary.broadcast, Some(true));
        assert!(summary.all_delivered());
    }

    #[tokio::test]
    async fn delivery_failure_is_captured_not_raised() {
        let sender = Arc::new(RecordingSender {
            failing: vec![ChatId::new("200")],
            ..Default::default()
        });
        let dispatcher = NotificationDispatcher::new(directory(), sender.clone());

        let summary = dispatcher
            .dispatch(
                TemplateCode::Normal,
                EventKind::Submit,
                None,
                "Kim",
                "Sales",
                "submitted",
            )
            .await;

        assert_eq!(summary.dm.len(), 1);
        assert!(!summary.dm[0].delivered);
        assert!(!summary.all_delivered());
        // The failed DM did not stop the broadcast.
        assert_eq!(summary.broadcast, Some(true));
    }

    #[tokio::test]
    async fn event_records_carry_enough_context_to_dispatch() {
        use crate::types::{Document, DocumentId};
        use crate::workflow::engine::RouteEngine;
        use chrono::Utc;

        let directory = directory();
        let engine = RouteEngine::new(directory.clone());
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = NotificationDispatcher::new(directory, sender.clone());

        let doc = Document {
            id: DocumentId::new(1),
            title: "Purchase request".to_string(),
            requester_name: "Kim".to_string(),
            requester_department: "Sales".to_string(),
            created_at: Utc::now(),
        };
        engine.build_route(&doc, TemplateCode::Normal).unwrap();

        for event in engine.drain_events() {
            let summary = dispatcher.dispatch_event(&event, "submitted").await;
            assert_eq!(summary.broadcast, Some(true));
        }
        assert_eq!(sender.broadcasts.lock().len(), 1);
    }
}
