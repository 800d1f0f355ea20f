//! Handoff: move a visit to its next stage

use tracing::{info, warn};

use crate::api::VisitApi;
use crate::domain::{
    can_act_on, get_allowed_transitions, prepare_handoff, requires_staff_selection, resolve_destination,
    role_for_stage, validate_route, HandoffDraft, ValidationContext,
};
use crate::errors::{CareQueueError, Result};
use crate::schemas::{Invoice, Role, Session, Stage, Staff, Visit};

use super::{VisitEvent, VisitEvents, VisitWorkflow};

impl<A: VisitApi> VisitWorkflow<A> {
    /// Hand `visit` off according to `draft`.
    ///
    /// The request is sent only if every local check passes. On success a
    /// [`VisitEvent::HandedOff`] is published and the updated visit returned;
    /// on failure the caller must assume nothing changed.
    pub async fn handoff(
        &self,
        session: &Session,
        visit: &Visit,
        draft: &HandoffDraft,
    ) -> Result<Visit> {
        can_act_on(visit, session.role()).into_result()?;

        // Everything decidable from the visit alone runs before the invoice
        // lookup, so a bad draft never reaches the network.
        let current = draft.current_stage.unwrap_or(visit.current_stage);
        let target = resolve_destination(current, draft.target_stage)?;
        validate_route(visit, current, target, draft.staff_id.as_deref(), session.role())
            .into_result()?;

        let mut ctx = ValidationContext::for_role(session.role());
        let has_local_invoice = visit
            .record(Stage::Billing)
            .and_then(|r| r.invoice.as_ref())
            .is_some();
        if current == Stage::Billing && !has_local_invoice {
            ctx.invoice = self.billing_invoice(&visit.id).await?;
        }

        let request = match prepare_handoff(visit, draft, &ctx).into_result() {
            Ok(request) => request,
            Err(e) => {
                warn!(visit = %visit.id, "Handoff rejected locally: {}", e);
                return Err(e);
            }
        };

        info!(
            visit = %request.visit_id,
            from = %request.current_stage,
            to = %request.target_stage,
            staff = session.staff.id.as_str(),
            "Requesting handoff"
        );

        let updated = self.api.handoff(&request).await.map_err(|e| {
            warn!(visit = %request.visit_id, "Handoff failed: {}", e);
            e
        })?;

        publish_handoff(&self.events, &request.visit_id, request.current_stage, request.target_stage);
        Ok(updated)
    }

    /// The visit's invoice, or `None` when none has been raised yet.
    async fn billing_invoice(&self, visit_id: &str) -> Result<Option<Invoice>> {
        match self.api.get_invoice(visit_id).await {
            Ok(invoice) => Ok(Some(invoice)),
            Err(CareQueueError::Remote { status: 404, .. }) => Ok(None),
            Err(e) => {
                warn!(visit = visit_id, "Invoice lookup failed: {}", e);
                Err(e)
            }
        }
    }

    /// Staff who can receive a visit at `stage`, for the selection step.
    ///
    /// Empty when the stage doesn't take a specific receiver.
    pub async fn receivers_for(&self, stage: Stage) -> Result<Vec<Staff>> {
        if !requires_staff_selection(stage) && stage != Stage::Doctor {
            return Ok(Vec::new());
        }
        match role_for_stage(stage) {
            Some(Role::Doctor) => self.api.list_doctors().await,
            Some(role) => self.api.list_staff(role).await,
            None => Ok(Vec::new()),
        }
    }

    /// Destinations offered for `visit`, in display order.
    pub fn destinations(&self, visit: &Visit) -> Vec<Stage> {
        get_allowed_transitions(visit.current_stage)
    }
}

fn publish_handoff(events: &VisitEvents, visit_id: &str, from: Stage, to: Stage) {
    events.publish(VisitEvent::HandedOff {
        visit_id: visit_id.to_string(),
        from,
        to,
    });
}
