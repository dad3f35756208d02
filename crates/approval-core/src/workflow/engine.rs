//! Route engine: instantiates routes from templates and drives the
//! approval state machine
//!
//! Every route is guarded by its own lock; approve/reject hold it across
//! the read-check-write so two concurrent requests can never both observe
//! a pending step and double-advance the route. Routes are independent -
//! there is no cross-route locking.

use crate::error::{ApprovalError, Result};
use crate::types::{Document, DocumentId};
use crate::workflow::route_types::{
    ActionContext, ApproverStamp, RequesterSnapshot, RouteEvent, RouteId, RouteInstance,
    StepInstance,
};
use crate::workflow::templates::template_steps;
use crate::workflow::traits::RecipientDirectory;
use approval_types::{EventKind, Role, RouteStatus, StepState, TemplateCode};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// The approval-route state machine.
///
/// Holds one instance per document (one-to-one, enforced at build time)
/// and an outbox of transition events for the notification layer to
/// consume in a separate step.
pub struct RouteEngine {
    routes: RwLock<HashMap<DocumentId, Arc<Mutex<RouteInstance>>>>,
    directory: Arc<dyn RecipientDirectory>,
    outbox: Mutex<Vec<RouteEvent>>,
}

impl RouteEngine {
    pub fn new(directory: Arc<dyn RecipientDirectory>) -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            directory,
            outbox: Mutex::new(Vec::new()),
        }
    }

    /// Build the route instance for a document from a template.
    ///
    /// Fails with `RouteAlreadyExists` when the document already has one;
    /// a route is created exactly once and never recreated. Creation is
    /// all-or-nothing: steps are materialized before the route becomes
    /// observable.
    ///
    /// When the template starts with a drafter step, the filer's own
    /// submission counts as their approval: step 1 is approved on the
    /// spot, stamped with the matching directory entry if any, and the
    /// route advances to order 2. Admin-start templates get no
    /// auto-approval.
    pub fn build_route(&self, document: &Document, template: TemplateCode) -> Result<RouteInstance> {
        let mut routes = self.routes.write();
        if routes.contains_key(&document.id) {
            return Err(ApprovalError::RouteAlreadyExists {
                document_id: document.id.value(),
            });
        }

        let now = Utc::now();
        let steps: Vec<StepInstance> = template_steps(template)
            .iter()
            .enumerate()
            .map(|(i, role)| StepInstance::new(i as u32 + 1, *role))
            .collect();

        let mut route = RouteInstance {
            id: RouteId::new(),
            document_id: document.id,
            template,
            status: RouteStatus::InProgress,
            current_order: 1,
            requester: RequesterSnapshot {
                name: document.requester_name.clone(),
                department: document.requester_department.clone(),
                title: document.title.clone(),
            },
            submitted_at: now,
            completed_at: None,
            rejected_at: None,
            updated_at: now,
            steps,
        };

        self.auto_approve_drafter_step(&mut route);

        log::info!(
            "Built {} route {} for document {}",
            template,
            route.id,
            document.id
        );

        let snapshot = route.clone();
        routes.insert(document.id, Arc::new(Mutex::new(route)));
        // Emitted before the map lock is released so the submit event
        // always precedes any event from a racing approve.
        self.emit(&snapshot, EventKind::Submit, None);
        Ok(snapshot)
    }

    /// Submission-time auto-approval of an order-1 drafter step.
    fn auto_approve_drafter_step(&self, route: &mut RouteInstance) {
        if route.current_order != 1 {
            return;
        }
        let has_next = route.step(2).is_some();
        let stamp = self.requester_stamp(route);

        let Some(first) = route.step_mut(1) else {
            return;
        };
        if first.role != Role::Drafter || !first.is_pending() {
            return;
        }

        first.state = StepState::Approved;
        first.acted_at = Some(Utc::now());
        first.stamp = stamp;
        if has_next {
            route.current_order = 2;
        }
    }

    /// Directory stamp for the route's requester, best-effort.
    fn requester_stamp(&self, route: &RouteInstance) -> Option<ApproverStamp> {
        self.directory
            .match_requester(&route.requester.name, &route.requester.department)
            .into_iter()
            .next()
            .map(|r| ApproverStamp {
                name: r.name,
                department: r.department,
            })
    }

    /// Snapshot of the route for a document.
    pub fn route(&self, document_id: DocumentId) -> Result<RouteInstance> {
        let handle = self.handle(document_id)?;
        let route = handle.lock();
        Ok(route.clone())
    }

    /// Role of the step the route is currently waiting on.
    pub fn current_role(&self, document_id: DocumentId) -> Result<Option<Role>> {
        let handle = self.handle(document_id)?;
        let route = handle.lock();
        Ok(route.current_role())
    }

    /// Approve the current step and advance the route.
    ///
    /// Idempotent: a duplicate request on an already-decided step returns
    /// the step unchanged and emits no event. Approving the last step
    /// completes the route and freezes `current_order`.
    pub fn approve(&self, document_id: DocumentId, ctx: &ActionContext) -> Result<StepInstance> {
        let handle = self.handle(document_id)?;
        let mut route = handle.lock();

        let order = route.current_order;
        let Some(idx) = route.steps.iter().position(|s| s.order == order) else {
            return Err(ApprovalError::StepNotFound {
                route_id: route.id.to_string(),
                order,
            });
        };
        if !route.steps[idx].is_pending() {
            log::warn!(
                "Duplicate approve on route {} step {} ignored",
                route.id,
                order
            );
            return Ok(route.steps[idx].clone());
        }

        let role = route.steps[idx].role;
        let stamp = self.approver_stamp(&route, role);
        let now = Utc::now();

        let step = &mut route.steps[idx];
        step.state = StepState::Approved;
        step.acted_at = Some(now);
        step.record_context(ctx);
        step.stamp = stamp;

        if route.step(order + 1).is_some() {
            route.current_order = order + 1;
            log::info!(
                "Route {} step {} approved by {}, now at step {}",
                route.id,
                order,
                role,
                route.current_order
            );
        } else {
            route.status = RouteStatus::Completed;
            route.completed_at = Some(now);
            log::info!("Route {} completed at step {} by {}", route.id, order, role);
        }
        route.updated_at = now;

        let snapshot = route.clone();
        self.emit(&snapshot, EventKind::Approve, Some(role));
        Ok(snapshot.steps[idx].clone())
    }

    /// Reject the current step.
    ///
    /// Rejection is fatal to the whole route regardless of which step
    /// rejects: the route moves to `rejected` immediately and the
    /// remaining tail stays pending forever. Same idempotency rule as
    /// approve. An empty reason is accepted here; requiring one is the
    /// caller's validation concern.
    pub fn reject(
        &self,
        document_id: DocumentId,
        reason: &str,
        ctx: &ActionContext,
    ) -> Result<StepInstance> {
        let handle = self.handle(document_id)?;
        let mut route = handle.lock();

        let order = route.current_order;
        let Some(idx) = route.steps.iter().position(|s| s.order == order) else {
            return Err(ApprovalError::StepNotFound {
                route_id: route.id.to_string(),
                order,
            });
        };
        if !route.steps[idx].is_pending() {
            log::warn!(
                "Duplicate reject on route {} step {} ignored",
                route.id,
                order
            );
            return Ok(route.steps[idx].clone());
        }

        let role = route.steps[idx].role;
        let now = Utc::now();

        let step = &mut route.steps[idx];
        step.state = StepState::Rejected;
        step.reject_reason = reason.to_string();
        step.acted_at = Some(now);
        step.record_context(ctx);

        route.status = RouteStatus::Rejected;
        route.rejected_at = Some(now);
        route.updated_at = now;
        log::info!("Route {} rejected at step {} by {}", route.id, order, role);

        let snapshot = route.clone();
        self.emit(&snapshot, EventKind::Reject, Some(role));
        Ok(snapshot.steps[idx].clone())
    }

    /// Snapshots of every route in the given status, for listing pages.
    pub fn routes_by_status(&self, status: RouteStatus) -> Vec<RouteInstance> {
        self.routes
            .read()
            .values()
            .map(|handle| handle.lock().clone())
            .filter(|route| route.status == status)
            .collect()
    }

    /// Take the accumulated transition events.
    ///
    /// The caller hands these to the notification dispatcher in a step
    /// strictly downstream of the state change, so delivery failures can
    /// never roll back or block an approval.
    pub fn drain_events(&self) -> Vec<RouteEvent> {
        std::mem::take(&mut *self.outbox.lock())
    }

    fn handle(&self, document_id: DocumentId) -> Result<Arc<Mutex<RouteInstance>>> {
        self.routes
            .read()
            .get(&document_id)
            .cloned()
            .ok_or(ApprovalError::RouteNotFound {
                document_id: document_id.value(),
            })
    }

    /// Best-effort approver identity for a step decision.
    fn approver_stamp(&self, route: &RouteInstance, role: Role) -> Option<ApproverStamp> {
        if role == Role::Drafter {
            return self.requester_stamp(route);
        }
        self.directory
            .active_by_role(role)
            .into_iter()
            .next()
            .map(|r| ApproverStamp {
                name: r.name,
                department: r.department,
            })
    }

    fn emit(&self, route: &RouteInstance, kind: EventKind, actor_role: Option<Role>) {
        self.outbox.lock().push(RouteEvent {
            route_id: route.id.clone(),
            document_id: route.document_id,
            template: route.template,
            kind,
            actor_role,
            requester_name: route.requester.name.clone(),
            requester_department: route.requester.department.clone(),
            occurred_at: Utc::now(),
        });
    }
}
