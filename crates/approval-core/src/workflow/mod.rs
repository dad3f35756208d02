//! Route workflow module

pub mod engine;
pub mod route_types;
pub mod templates;
pub mod traits;

pub use engine::RouteEngine;
pub use route_types::{
    ActionContext, ApproverStamp, RequesterSnapshot, RouteEvent, RouteId, RouteInstance,
    StepInstance,
};
pub use templates::{approver_roles, filer_role, template_steps};
pub use traits::{MessageSender, RecipientDirectory};
