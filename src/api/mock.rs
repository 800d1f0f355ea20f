//! In-memory visit service for tests.
//!
//! Applies requests to stored visits the way the real service does and
//! records every call so tests can assert on what was (or was not) sent.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{CareQueueError, Result};
use crate::schemas::{
    HandoffRequest, Invoice, InvoiceStatus, LoginResponse, NewVisit, PatientRef, Payment,
    QueuePage, Role, Stage, Staff, StaffRef, Visit,
};

use super::VisitApi;

pub struct MockVisitApi {
    visits: Mutex<HashMap<String, Visit>>,
    invoices: Mutex<HashMap<String, Invoice>>,
    staff: Vec<Staff>,
    acting: StaffRef,
    calls: Mutex<Vec<String>>,
    reject_next: Mutex<Option<(u16, String)>>,
}

impl MockVisitApi {
    pub fn new() -> Self {
        Self {
            visits: Mutex::new(HashMap::new()),
            invoices: Mutex::new(HashMap::new()),
            staff: Vec::new(),
            acting: StaffRef::id("mock-staff"),
            calls: Mutex::new(Vec::new()),
            reject_next: Mutex::new(None),
        }
    }

    pub fn with_visit(self, visit: Visit) -> Self {
        self.visits.lock().unwrap().insert(visit.id.clone(), visit);
        self
    }

    pub fn with_invoice(self, visit_id: &str, invoice: Invoice) -> Self {
        self.invoices
            .lock()
            .unwrap()
            .insert(visit_id.to_string(), invoice);
        self
    }

    pub fn with_staff(mut self, staff: Vec<Staff>) -> Self {
        self.staff = staff;
        self
    }

    /// Make the next call fail with `status`.
    pub fn reject_next(&self, status: u16, message: &str) {
        *self.reject_next.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn visit(&self, id: &str) -> Option<Visit> {
        self.visits.lock().unwrap().get(id).cloned()
    }

    fn record_call(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.reject_next.lock().unwrap().take() {
            Some((status, message)) => Err(CareQueueError::from_status(status, message)),
            None => Ok(()),
        }
    }

    fn update<F: FnOnce(Visit) -> Visit>(&self, id: &str, f: F) -> Result<Visit> {
        let mut visits = self.visits.lock().unwrap();
        let visit = visits
            .remove(id)
            .ok_or_else(|| CareQueueError::Remote {
                status: 404,
                message: format!("Visit {} not found", id),
            })?;
        let updated = f(visit);
        visits.insert(id.to_string(), updated.clone());
        Ok(updated)
    }
}

pub fn patient(id: &str) -> PatientRef {
    PatientRef {
        id: id.to_string(),
        name: format!("Patient {}", id),
        hospital_number: None,
    }
}

#[async_trait]
impl VisitApi for MockVisitApi {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse> {
        self.record_call(format!("login {}", email))?;
        let user = self
            .staff
            .first()
            .cloned()
            .unwrap_or_else(|| Staff::new("u1", email, Role::FrontDesk));
        Ok(LoginResponse {
            token: "mock-token".to_string(),
            user,
        })
    }

    async fn queue(&self, stage: Stage, page: u32, limit: u32) -> Result<QueuePage> {
        self.record_call(format!("queue {} {} {}", stage, page, limit))?;
        let mut visits: Vec<Visit> = self
            .visits
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.current_stage == stage)
            .cloned()
            .collect();
        visits.sort_by(|a, b| a.id.cmp(&b.id));
        let total = visits.len() as u32;
        let pages = total.div_ceil(limit.max(1)).max(1);
        let start = ((page.max(1) - 1) * limit) as usize;
        let visits = visits.into_iter().skip(start).take(limit as usize).collect();
        Ok(QueuePage {
            visits,
            total,
            page,
            pages,
        })
    }

    async fn get_visit(&self, visit_id: &str) -> Result<Visit> {
        self.record_call(format!("get_visit {}", visit_id))?;
        self.visit(visit_id).ok_or_else(|| CareQueueError::Remote {
            status: 404,
            message: format!("Visit {} not found", visit_id),
        })
    }

    async fn create_visit(&self, new_visit: &NewVisit) -> Result<Visit> {
        self.record_call(format!("create_visit {}", new_visit.patient_id))?;
        let id = format!("v-{}", self.visits.lock().unwrap().len() + 1);
        let visit = Visit::new(id.clone(), patient(&new_visit.patient_id));
        self.visits.lock().unwrap().insert(id, visit.clone());
        Ok(visit)
    }

    async fn update_visit(&self, visit_id: &str, fields: serde_json::Value) -> Result<Visit> {
        self.record_call(format!("update_visit {} {}", visit_id, fields))?;
        self.update(visit_id, |visit| {
            let mut json = serde_json::to_value(&visit).unwrap();
            if let (Some(target), Some(source)) = (json.as_object_mut(), fields.as_object()) {
                for (k, v) in source {
                    target.insert(k.clone(), v.clone());
                }
            }
            serde_json::from_value(json).unwrap()
        })
    }

    async fn clock_in(&self, visit_id: &str, stage: Stage) -> Result<Visit> {
        self.record_call(format!("clock_in {} {}", visit_id, stage))?;
        let by = self.acting.clone();
        self.update(visit_id, |visit| visit.with_clock_in(stage, by))
    }

    async fn record_stage(
        &self,
        visit_id: &str,
        stage: Stage,
        payload: serde_json::Value,
    ) -> Result<Visit> {
        self.record_call(format!("record_stage {} {}", visit_id, stage))?;
        self.update(visit_id, |visit| {
            let mut record = visit.record(stage).cloned().unwrap_or_default();
            let mut json = serde_json::to_value(&record).unwrap();
            if let (Some(target), Some(source)) = (json.as_object_mut(), payload.as_object()) {
                for (k, v) in source {
                    target.insert(k.clone(), v.clone());
                }
            }
            record = serde_json::from_value(json).unwrap();
            visit.with_record(stage, record)
        })
    }

    async fn handoff(&self, request: &HandoffRequest) -> Result<Visit> {
        self.record_call(format!(
            "handoff {} {} {}",
            request.visit_id, request.current_stage, request.target_stage
        ))?;
        let by = self.acting.clone();
        let assigned = request.assigned_to.clone().map(StaffRef::id);
        let target = request.target_stage;
        let current = request.current_stage;
        self.update(&request.visit_id, move |visit| {
            let mut visit = visit.with_clock_out(current, by).with_current_stage(target);
            match target {
                Stage::Nurse => visit.assigned_nurse = assigned,
                Stage::Lab => visit.assigned_lab = assigned,
                Stage::Pharmacy => visit.assigned_pharmacy = assigned,
                _ => {}
            }
            visit
        })
    }

    async fn list_staff(&self, role: Role) -> Result<Vec<Staff>> {
        self.record_call(format!("list_staff {}", role))?;
        Ok(self.staff.iter().filter(|s| s.role == role).cloned().collect())
    }

    async fn list_doctors(&self) -> Result<Vec<Staff>> {
        self.list_staff(Role::Doctor).await
    }

    async fn get_invoice(&self, visit_id: &str) -> Result<Invoice> {
        self.record_call(format!("get_invoice {}", visit_id))?;
        self.invoices
            .lock()
            .unwrap()
            .get(visit_id)
            .cloned()
            .ok_or_else(|| CareQueueError::Remote {
                status: 404,
                message: format!("No invoice for visit {}", visit_id),
            })
    }

    async fn record_payment(&self, invoice_id: &str, payment: &Payment) -> Result<Invoice> {
        self.record_call(format!("record_payment {} {}", invoice_id, payment.amount))?;
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = invoices
            .values_mut()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| CareQueueError::Remote {
                status: 404,
                message: format!("Invoice {} not found", invoice_id),
            })?;
        invoice.amount_paid += payment.amount;
        invoice.status = if invoice.balance() <= f64::EPSILON {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        Ok(invoice.clone())
    }
}
