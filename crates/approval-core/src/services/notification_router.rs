//! Notification routing policy
//!
//! Pure decision logic: given a template, a lifecycle event and the acting
//! role, decide who gets a direct message and whether the group channel is
//! used. No lookups, no sends - the dispatcher resolves the decision.

use approval_types::{EventKind, Role, TemplateCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who must be notified for one lifecycle event.
///
/// A closed record rather than an open map, so every policy branch has to
/// fill in all three answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Roles whose active recipients each get a direct message.
    pub dm_roles: BTreeSet<Role>,
    /// Whether the original requester gets a direct message.
    pub dm_requester: bool,
    /// Whether one message goes to the shared group channel.
    pub broadcast: bool,
}

impl RoutingDecision {
    fn none() -> Self {
        Self {
            dm_roles: BTreeSet::new(),
            dm_requester: false,
            broadcast: false,
        }
    }

    fn dm_role(role: Role) -> Self {
        Self {
            dm_roles: BTreeSet::from([role]),
            dm_requester: false,
            broadcast: false,
        }
    }

    fn dm_requester() -> Self {
        Self {
            dm_roles: BTreeSet::new(),
            dm_requester: true,
            broadcast: false,
        }
    }

    fn broadcast() -> Self {
        Self {
            dm_roles: BTreeSet::new(),
            dm_requester: false,
            broadcast: true,
        }
    }
}

/// Decide the notification targets for a template/event/actor combination.
///
/// Every submit, approve and reject is additionally echoed to the group
/// channel: the broadcast flag is OR-ed over the per-template table after
/// the lookup, while the DM answers stay exactly what the table says.
pub fn decide(
    template: TemplateCode,
    event: EventKind,
    actor_role: Option<Role>,
) -> RoutingDecision {
    let mut decision = table_decision(template, event, actor_role);
    decision.broadcast |= matches!(
        event,
        EventKind::Submit | EventKind::Approve | EventKind::Reject
    );
    decision
}

fn table_decision(
    template: TemplateCode,
    event: EventKind,
    actor_role: Option<Role>,
) -> RoutingDecision {
    match template {
        TemplateCode::AdminFinal => match event {
            EventKind::Submit => RoutingDecision::dm_role(Role::Admin),
            EventKind::Approve | EventKind::Reject => RoutingDecision::dm_requester(),
        },
        TemplateCode::Normal => match event {
            EventKind::Submit => RoutingDecision::dm_role(Role::Admin),
            EventKind::Approve => RoutingDecision::broadcast(),
            EventKind::Reject => {
                if actor_role == Some(Role::Chairman) {
                    RoutingDecision::broadcast()
                } else {
                    RoutingDecision::dm_requester()
                }
            }
        },
        TemplateCode::AdminToChair | TemplateCode::AdminToAuditorChair => match event {
            EventKind::Submit | EventKind::Approve => RoutingDecision::broadcast(),
            EventKind::Reject => {
                if actor_role == Some(Role::Chairman) {
                    RoutingDecision::broadcast()
                } else {
                    RoutingDecision::dm_requester()
                }
            }
        },
    }
}
