//! End-to-end route lifecycle tests
//!
//! Drives the engine, the event outbox and the dispatcher together the
//! way the web layer does: mutate the route, drain the transition events,
//! dispatch notifications strictly afterwards.

use approval_core::{
    compose_event_text, ActionContext, ChatId, Document, DocumentId, EventKind,
    InMemoryRecipientDirectory, MessageSender, NotificationDispatcher, Recipient, Role,
    RouteEngine, RouteStatus, StepState, TemplateCode,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Always-succeeding sender that records every delivery.
#[derive(Default)]
struct RecordingSender {
    direct: Mutex<Vec<(ChatId, String)>>,
    broadcasts: Mutex<Vec<String>>,
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_direct(&self, chat_id: &ChatId, text: &str) -> bool {
        self.direct.lock().push((chat_id.clone(), text.to_string()));
        true
    }

    async fn send_broadcast(&self, text: &str) -> bool {
        self.broadcasts.lock().push(text.to_string());
        true
    }
}

fn seeded_directory() -> Arc<InMemoryRecipientDirectory> {
    let directory = InMemoryRecipientDirectory::new();
    directory
        .upsert(Recipient::new(Role::Drafter, ChatId::new("100")).with_identity("Kim", "Sales"));
    directory.upsert(Recipient::new(Role::Admin, ChatId::new("200")).with_identity("Park", ""));
    directory
        .upsert(Recipient::new(Role::Chairman, ChatId::new("300")).with_identity("Choi", ""));
    Arc::new(directory)
}

fn document(id: i64, title: &str) -> Document {
    Document {
        id: DocumentId::new(id),
        title: title.to_string(),
        requester_name: "Kim".to_string(),
        requester_department: "Sales".to_string(),
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn normal_route_runs_to_completion_with_broadcasts() {
    let directory = seeded_directory();
    let engine = RouteEngine::new(directory.clone());
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = NotificationDispatcher::new(directory, sender.clone());

    let doc = document(1, "Purchase request");
    let route = engine.build_route(&doc, TemplateCode::Normal).unwrap();

    // The drafter's own submission counts as their approval.
    assert_eq!(route.step(1).unwrap().state, StepState::Approved);
    assert_eq!(route.current_order, 2);
    assert_eq!(engine.current_role(doc.id).unwrap(), Some(Role::Admin));

    // Submit notifications: admin DM plus the forced group echo.
    for event in engine.drain_events() {
        let route = engine.route(doc.id).unwrap();
        let text = compose_event_text(&route, event.kind, event.actor_role, "https://gw.example.com");
        let summary = dispatcher.dispatch_event(&event, &text).await;
        assert_eq!(event.kind, EventKind::Submit);
        assert_eq!(summary.dm.len(), 1);
        assert_eq!(summary.dm[0].chat_id.as_str(), "200");
        assert_eq!(summary.broadcast, Some(true));
    }

    // Admin approves: route advances, stays in progress.
    engine
        .approve(doc.id, &ActionContext::new("10.0.0.1", "web", "a1"))
        .unwrap();
    let route = engine.route(doc.id).unwrap();
    assert_eq!(route.status, RouteStatus::InProgress);
    assert_eq!(route.current_order, 3);

    for event in engine.drain_events() {
        assert_eq!(event.kind, EventKind::Approve);
        assert_eq!(event.actor_role, Some(Role::Admin));
        let summary = dispatcher.dispatch_event(&event, "admin approved").await;
        // NORMAL approve broadcasts both by table and by override.
        assert_eq!(summary.broadcast, Some(true));
        assert!(summary.dm.is_empty());
    }

    // Chairman approves the final step: route completes, pointer frozen.
    engine.approve(doc.id, &ActionContext::default()).unwrap();
    let route = engine.route(doc.id).unwrap();
    assert_eq!(route.status, RouteStatus::Completed);
    assert!(route.completed_at.is_some());
    assert_eq!(route.current_order, 3);

    for event in engine.drain_events() {
        assert_eq!(event.actor_role, Some(Role::Chairman));
        let summary = dispatcher.dispatch_event(&event, "chairman approved").await;
        assert_eq!(summary.broadcast, Some(true));
    }

    // One DM (submit) and three broadcasts (one per lifecycle event).
    assert_eq!(sender.direct.lock().len(), 1);
    assert_eq!(sender.broadcasts.lock().len(), 3);
}

#[tokio::test]
async fn admin_to_chair_route_rejected_by_chairman() {
    let directory = seeded_directory();
    let engine = RouteEngine::new(directory.clone());
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = NotificationDispatcher::new(directory, sender.clone());

    let doc = document(2, "Office lease renewal");
    let route = engine.build_route(&doc, TemplateCode::AdminToChair).unwrap();

    // Admin is the filer: no auto-approval.
    assert_eq!(route.step(1).unwrap().state, StepState::Pending);
    assert_eq!(route.current_order, 1);

    // The web layer approves the filer's own step on submission.
    engine.approve(doc.id, &ActionContext::default()).unwrap();
    assert_eq!(engine.route(doc.id).unwrap().current_order, 2);

    engine
        .reject(doc.id, "budget", &ActionContext::new("10.0.0.2", "mobile", "c9"))
        .unwrap();

    let route = engine.route(doc.id).unwrap();
    assert_eq!(route.status, RouteStatus::Rejected);
    assert!(route.rejected_at.is_some());
    let step = route.step(2).unwrap();
    assert_eq!(step.state, StepState::Rejected);
    assert_eq!(step.reject_reason, "budget");

    let events = engine.drain_events();
    assert_eq!(events.len(), 3);
    let reject_event = &events[2];
    assert_eq!(reject_event.kind, EventKind::Reject);
    assert_eq!(reject_event.actor_role, Some(Role::Chairman));

    // Chairman rejection goes to the group, not back to the filer.
    let summary = dispatcher.dispatch_event(reject_event, "rejected: budget").await;
    assert!(summary.dm.is_empty());
    assert_eq!(summary.broadcast, Some(true));
    assert_eq!(sender.broadcasts.lock().as_slice(), ["rejected: budget"]);
}

#[tokio::test]
async fn mid_chain_rejection_notifies_the_requester_directly() {
    let directory = seeded_directory();
    let engine = RouteEngine::new(directory.clone());
    let sender = Arc::new(RecordingSender::default());
    let dispatcher = NotificationDispatcher::new(directory, sender.clone());

    let doc = document(3, "Travel expense");
    engine.build_route(&doc, TemplateCode::Normal).unwrap();
    engine.drain_events();

    // Admin (not chairman) rejects at step 2.
    engine
        .reject(doc.id, "missing receipts", &ActionContext::default())
        .unwrap();
    let events = engine.drain_events();
    assert_eq!(events.len(), 1);

    let summary = dispatcher
        .dispatch_event(&events[0], "rejected: missing receipts")
        .await;

    // The requester gets a DM resolved through the drafter directory
    // entry for Kim/Sales; the group still hears about it.
    assert_eq!(summary.dm.len(), 1);
    assert_eq!(summary.dm[0].role, Role::Drafter);
    assert_eq!(summary.dm[0].chat_id.as_str(), "100");
    assert_eq!(summary.broadcast, Some(true));
}

#[test]
fn build_route_rejects_unknown_template_strings_at_the_boundary() {
    // The web layer hands over raw strings; parsing is the only way in.
    let err = "SELF_APPROVE".parse::<TemplateCode>().unwrap_err();
    assert_eq!(err.to_string(), "unknown template code: SELF_APPROVE");
}
