//! Strongly typed route and step instances
//! No string-based state management - everything is strongly typed

use crate::types::DocumentId;
use approval_types::{EventKind, Role, RouteStatus, StepState, TemplateCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly typed RouteId
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteId(String);

impl RouteId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|_| Self(s.to_string()))
            .map_err(|e| format!("Invalid RouteId format: {}", e))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RouteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request context captured when a step is acted on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionContext {
    pub ip: String,
    pub device: String,
    pub anon_id: String,
}

impl ActionContext {
    pub fn new(
        ip: impl Into<String>,
        device: impl Into<String>,
        anon_id: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            device: device.into(),
            anon_id: anon_id.into(),
        }
    }
}

/// Identity snapshot of the recipient that (auto-)approved a step.
///
/// Captured at decision time so later directory edits cannot rewrite
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverStamp {
    pub name: String,
    pub department: String,
}

/// One stage of a route, owned by exactly one role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepInstance {
    pub order: u32,
    pub role: Role,
    pub state: StepState,
    pub acted_at: Option<DateTime<Utc>>,
    pub acted_ip: Option<String>,
    pub acted_device: String,
    pub acted_anon_id: String,
    pub reject_reason: String,
    pub stamp: Option<ApproverStamp>,
}

impl StepInstance {
    pub fn new(order: u32, role: Role) -> Self {
        Self {
            order,
            role,
            state: StepState::Pending,
            acted_at: None,
            acted_ip: None,
            acted_device: String::new(),
            acted_anon_id: String::new(),
            reject_reason: String::new(),
            stamp: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == StepState::Pending
    }

    /// Record the acting request context. Empty ip is stored as absent.
    pub(crate) fn record_context(&mut self, ctx: &ActionContext) {
        self.acted_ip = if ctx.ip.is_empty() {
            None
        } else {
            Some(ctx.ip.clone())
        };
        self.acted_device = ctx.device.clone();
        self.acted_anon_id = ctx.anon_id.clone();
    }
}

/// Requester snapshot embedded in a route at build time.
///
/// The route outlives edits to the document listing fields, and event
/// records need the requester identity without another storage round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequesterSnapshot {
    pub name: String,
    pub department: String,
    pub title: String,
}

/// One document's instantiated approval workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteInstance {
    pub id: RouteId,
    pub document_id: DocumentId,
    pub template: TemplateCode,
    pub status: RouteStatus,
    /// Pointer into `steps` while in progress; frozen in terminal states.
    pub current_order: u32,
    pub requester: RequesterSnapshot,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub steps: Vec<StepInstance>,
}

impl RouteInstance {
    pub fn step(&self, order: u32) -> Option<&StepInstance> {
        self.steps.iter().find(|s| s.order == order)
    }

    pub(crate) fn step_mut(&mut self, order: u32) -> Option<&mut StepInstance> {
        self.steps.iter_mut().find(|s| s.order == order)
    }

    /// The step the route is currently waiting on, if any.
    pub fn current_step(&self) -> Option<&StepInstance> {
        self.step(self.current_order)
    }

    /// Role of the step at `current_order`, defensive empty when missing.
    pub fn current_role(&self) -> Option<Role> {
        self.current_step().map(|s| s.role)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Record of an effective route transition, consumed by the dispatcher.
///
/// Emitted only when state actually changed - idempotent replays of an
/// already-decided step produce no event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEvent {
    pub route_id: RouteId,
    pub document_id: DocumentId,
    pub template: TemplateCode,
    pub kind: EventKind,
    /// Role that acted; absent for the submit event.
    pub actor_role: Option<Role>,
    pub requester_name: String,
    pub requester_department: String,
    pub occurred_at: DateTime<Utc>,
}
