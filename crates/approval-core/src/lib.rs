//! Approval Core Library
//!
//! Business logic for the document approval system: the route state
//! machine, the notification routing policy, and the dispatch layer that
//! resolves decisions into Telegram sends. The surrounding web
//! application (forms, listings, uploads, rendering) lives elsewhere and
//! talks to this crate through the types re-exported here.

pub mod clients;
pub mod config;
pub mod directory;
pub mod error;
pub mod services;
pub mod types;
pub mod workflow;

// Re-export main types for easy access
pub use config::{ApprovalConfig, PortalConfig, TelegramConfig};
pub use error::{ApprovalError, Result};

pub use types::{ChatId, Document, DocumentId, Recipient};

pub use directory::InMemoryRecipientDirectory;

// Re-export workflow types
pub use workflow::{
    ActionContext,
    ApproverStamp,
    MessageSender,
    RecipientDirectory,
    RequesterSnapshot,
    RouteEngine,
    RouteEvent,
    RouteId,
    RouteInstance,
    StepInstance,
};

// Re-export notification services
pub use services::{
    compose_event_text,
    decide,
    DispatchSummary,
    DmOutcome,
    NotificationDispatcher,
    RoutingDecision,
};

pub use clients::TelegramSender;

// The shared vocabulary crate is part of the public API surface.
pub use approval_types::{EventKind, Role, RouteStatus, StepState, TemplateCode};
