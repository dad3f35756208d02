//! Outgoing notification texts
//!
//! One composer shared by every caller so the web layer cannot drift from
//! the notification wording. Approver lines accumulate as a route moves:
//! an intermediate decision shows one line, the final decision repeats the
//! intermediate outcome above its own.

use crate::workflow::route_types::RouteInstance;
use crate::workflow::templates::{approver_roles, filer_role};
use approval_types::{EventKind, Role, StepState};

/// Compose the text for a route lifecycle event.
///
/// `portal_base_url` is the approval portal root; the last line links the
/// recipient straight to the document.
pub fn compose_event_text(
    route: &RouteInstance,
    kind: EventKind,
    actor_role: Option<Role>,
    portal_base_url: &str,
) -> String {
    let mut lines = Vec::new();
    lines.push("Electronic approval".to_string());
    lines.push(format!(
        "Submitted : {}",
        route.submitted_at.format("%Y-%m-%d")
    ));
    lines.push(format!("Title : {}", route.requester.title));
    lines.push(format!(
        "Filer : {}",
        filer_role(route.template).display_name()
    ));

    if matches!(kind, EventKind::Approve | EventKind::Reject) {
        let action = match kind {
            EventKind::Approve => "approved",
            _ => "rejected",
        };
        lines.extend(approver_lines(route, actor_role, action));
    }

    lines.push(format!(
        "Link : {}/approvals/{}/",
        portal_base_url.trim_end_matches('/'),
        route.document_id
    ));
    lines.join("\n")
}

fn approver_lines(route: &RouteInstance, actor_role: Option<Role>, action: &str) -> Vec<String> {
    let approvers = approver_roles(route.template);
    let Some(actor) = actor_role else {
        return Vec::new();
    };

    match approvers.as_slice() {
        [] => vec![format!("Handled by : {}[{}]", actor.display_name(), action)],
        [final_role] => vec![format!(
            "Final approver : {}[{}]",
            final_role.display_name(),
            action
        )],
        [middle_role, .., final_role] => {
            if actor == *middle_role {
                vec![format!(
                    "Intermediate approver : {}[{}]",
                    middle_role.display_name(),
                    action
                )]
            } else if actor == *final_role {
                let mut lines = Vec::new();
                // Repeat the intermediate outcome only once it is decided.
                match step_state_by_role(route, *middle_role) {
                    Some(StepState::Approved) => lines.push(format!(
                        "Intermediate approver : {}[approved]",
                        middle_role.display_name()
                    )),
                    Some(StepState::Rejected) => lines.push(format!(
                        "Intermediate approver : {}[rejected]",
                        middle_role.display_name()
                    )),
                    _ => {}
                }
                lines.push(format!(
                    "Final approver : {}[{}]",
                    final_role.display_name(),
                    action
                ));
                lines
            } else {
                vec![format!("Approver : {}[{}]", actor.display_name(), action)]
            }
        }
    }
}

fn step_state_by_role(route: &RouteInstance, role: Role) -> Option<StepState> {
    route.steps.iter().find(|s| s.role == role).map(|s| s.state)
}
