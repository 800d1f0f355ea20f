//! Registration, clock-in and department data entry

use serde_json::json;
use tracing::info;

use crate::api::VisitApi;
use crate::domain::{
    can_access_stage, validate_clock_in, validate_consultation, validate_dispense,
    validate_lab_results, validate_payment, validate_stage_work, validate_vitals,
};
use crate::errors::{CareQueueError, Result};
use crate::schemas::{
    Consultation, DispensedItem, Invoice, LabResult, NewVisit, Payment, Session, Stage, Visit,
    Vitals,
};

use super::{VisitEvent, VisitWorkflow};

impl<A: VisitApi> VisitWorkflow<A> {
    /// Register a new visit at the front desk.
    pub async fn register_visit(
        &self,
        session: &Session,
        patient_id: &str,
        notes: Option<String>,
    ) -> Result<Visit> {
        if !can_access_stage(session.role(), Stage::FrontDesk) {
            return Err(CareQueueError::Unauthorized(format!(
                "{} staff cannot register visits",
                session.role()
            )));
        }
        if patient_id.trim().is_empty() {
            return Err(CareQueueError::Validation("patient is required".to_string()));
        }

        let visit = self
            .api
            .create_visit(&NewVisit {
                patient_id: patient_id.trim().to_string(),
                notes,
            })
            .await?;
        info!(visit = %visit.id, patient = patient_id, "Registered visit");
        Ok(visit)
    }

    /// Clock in to the visit's current stage.
    pub async fn clock_in(&self, session: &Session, visit: &Visit) -> Result<Visit> {
        validate_clock_in(visit, session.role()).into_result()?;

        let stage = visit.current_stage;
        let updated = self.api.clock_in(&visit.id, stage).await?;
        info!(visit = %visit.id, %stage, staff = session.staff.id.as_str(), "Clocked in");

        self.events.publish(VisitEvent::ClockedIn {
            visit_id: visit.id.clone(),
            stage,
        });
        Ok(updated)
    }

    pub async fn record_vitals(
        &self,
        session: &Session,
        visit: &Visit,
        vitals: &Vitals,
    ) -> Result<Visit> {
        validate_vitals(vitals).into_result()?;
        self.record(session, visit, Stage::Nurse, json!({ "vitals": vitals }))
            .await
    }

    pub async fn record_consultation(
        &self,
        session: &Session,
        visit: &Visit,
        consultation: &Consultation,
    ) -> Result<Visit> {
        validate_consultation(consultation).into_result()?;
        self.record(
            session,
            visit,
            Stage::Doctor,
            json!({ "consultation": consultation }),
        )
        .await
    }

    pub async fn record_lab_results(
        &self,
        session: &Session,
        visit: &Visit,
        results: &[LabResult],
    ) -> Result<Visit> {
        validate_lab_results(results).into_result()?;
        self.record(session, visit, Stage::Lab, json!({ "results": results }))
            .await
    }

    pub async fn record_dispense(
        &self,
        session: &Session,
        visit: &Visit,
        items: &[DispensedItem],
    ) -> Result<Visit> {
        validate_dispense(items).into_result()?;
        self.record(session, visit, Stage::Pharmacy, json!({ "dispensed": items }))
            .await
    }

    /// Record a payment against the visit's invoice.
    pub async fn record_payment(
        &self,
        session: &Session,
        visit: &Visit,
        payment: &Payment,
    ) -> Result<Invoice> {
        validate_stage_work(visit, Stage::Billing, session.role()).into_result()?;

        let invoice = self.api.get_invoice(&visit.id).await?;
        validate_payment(&invoice, payment).into_result()?;

        let updated = self.api.record_payment(&invoice.id, payment).await?;
        info!(
            visit = %visit.id,
            invoice = %updated.id,
            amount = payment.amount,
            balance = updated.balance(),
            "Recorded payment"
        );
        self.events.publish(VisitEvent::StageDataRecorded {
            visit_id: visit.id.clone(),
            stage: Stage::Billing,
        });
        Ok(updated)
    }

    async fn record(
        &self,
        session: &Session,
        visit: &Visit,
        stage: Stage,
        payload: serde_json::Value,
    ) -> Result<Visit> {
        validate_stage_work(visit, stage, session.role()).into_result()?;

        let updated = self.api.record_stage(&visit.id, stage, payload).await?;
        info!(visit = %visit.id, %stage, "Recorded stage data");

        self.events.publish(VisitEvent::StageDataRecorded {
            visit_id: visit.id.clone(),
            stage,
        });
        Ok(updated)
    }
}
