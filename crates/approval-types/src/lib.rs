//! Shared vocabulary for the approval route engine
//!
//! Roles, template codes and lifecycle states are closed enumerations.
//! Strings coming from the web layer are parsed at this boundary; an
//! unknown code is an error, never a silently carried value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when a role string does not name a known approval role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role code: {0}")]
pub struct UnknownRole(pub String);

/// Raised when a template string does not name a registered route template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown template code: {0}")]
pub struct UnknownTemplate(pub String);

/// Approval role owning a route step.
///
/// Admin, auditor and chairman are effectively singletons in a deployed
/// recipient set; drafters are many. Cardinality is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Drafter,
    Admin,
    Auditor,
    Chairman,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drafter => "drafter",
            Self::Admin => "admin",
            Self::Auditor => "auditor",
            Self::Chairman => "chairman",
        }
    }

    /// Human-readable label used in notification texts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Drafter => "Drafter",
            Self::Admin => "Administrator",
            Self::Auditor => "Auditor",
            Self::Chairman => "Chairman",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drafter" => Ok(Self::Drafter),
            "admin" => Ok(Self::Admin),
            "auditor" => Ok(Self::Auditor),
            "chairman" => Ok(Self::Chairman),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Registered route template codes.
///
/// The catalogue is fixed; adding a template means adding a variant and
/// its step sequence in the registry, which the compiler then enforces
/// across the routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateCode {
    /// Drafter files, admin makes the final call.
    AdminFinal,
    /// Three-stage chain: drafter, admin, chairman.
    Normal,
    /// Admin is the filer, chairman decides.
    AdminToChair,
    /// Admin is the filer, auditor inserted before the chairman.
    AdminToAuditorChair,
}

impl TemplateCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminFinal => "ADMIN_FINAL",
            Self::Normal => "NORMAL",
            Self::AdminToChair => "ADMIN_TO_CHAIR",
            Self::AdminToAuditorChair => "ADMIN_TO_AUDITOR_CHAIR",
        }
    }

    pub fn all() -> [TemplateCode; 4] {
        [
            Self::AdminFinal,
            Self::Normal,
            Self::AdminToChair,
            Self::AdminToAuditorChair,
        ]
    }
}

impl fmt::Display for TemplateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemplateCode {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN_FINAL" => Ok(Self::AdminFinal),
            "NORMAL" => Ok(Self::Normal),
            "ADMIN_TO_CHAIR" => Ok(Self::AdminToChair),
            "ADMIN_TO_AUDITOR_CHAIR" => Ok(Self::AdminToAuditorChair),
            other => Err(UnknownTemplate(other.to_string())),
        }
    }
}

/// Route lifecycle status.
///
/// `Draft` exists only between nothing and `InProgress`; `build_route`
/// creates routes already in progress. `Completed` and `Rejected` are
/// terminal: no transition ever leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Draft,
    InProgress,
    Rejected,
    Completed,
}

impl RouteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProgress => "in_progress",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Step outcome state. `Pending` is initial; both others are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Pending,
    Approved,
    Rejected,
}

impl StepState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle events a route emits and the notification policy branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Submit,
    Approve,
    Reject,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
