//! Notification services built on top of the route engine

pub mod message_text;
pub mod notification_dispatcher;
pub mod notification_router;

pub use message_text::compose_event_text;
pub use notification_dispatcher::{DispatchSummary, DmOutcome, NotificationDispatcher};
pub use notification_router::{decide, RoutingDecision};
