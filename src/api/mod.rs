//! Visit API access
//!
//! The visit service owns all visit state. [`VisitApi`] is the seam every
//! workflow talks through; [`HttpVisitApi`] is the real client.

mod client;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::errors::Result;
use crate::schemas::{
    HandoffRequest, Invoice, LoginResponse, NewVisit, Payment, QueuePage, Role, Stage, Staff,
    Visit,
};

pub use client::HttpVisitApi;

/// Operations offered by the visit service
#[async_trait]
pub trait VisitApi: Send + Sync {
    /// Exchange credentials for a token and the staff profile
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// One page of the queue for `stage`
    async fn queue(&self, stage: Stage, page: u32, limit: u32) -> Result<QueuePage>;

    async fn get_visit(&self, visit_id: &str) -> Result<Visit>;

    /// Register a visit at the front desk
    async fn create_visit(&self, new_visit: &NewVisit) -> Result<Visit>;

    /// Plain field update on the visit record
    async fn update_visit(&self, visit_id: &str, fields: serde_json::Value) -> Result<Visit>;

    /// Department-specific clock-in
    async fn clock_in(&self, visit_id: &str, stage: Stage) -> Result<Visit>;

    /// Save the stage-specific payload
    async fn record_stage(
        &self,
        visit_id: &str,
        stage: Stage,
        payload: serde_json::Value,
    ) -> Result<Visit>;

    /// Request a stage transition
    async fn handoff(&self, request: &HandoffRequest) -> Result<Visit>;

    async fn list_staff(&self, role: Role) -> Result<Vec<Staff>>;

    async fn list_doctors(&self) -> Result<Vec<Staff>>;

    async fn get_invoice(&self, visit_id: &str) -> Result<Invoice>;

    async fn record_payment(&self, invoice_id: &str, payment: &Payment) -> Result<Invoice>;
}
