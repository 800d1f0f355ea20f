//! Schema types for carequeue
//!
//! All types mirror the JSON shapes of the visit API (camelCase fields,
//! snake_case stages, SCREAMING_SNAKE_CASE roles).

mod config;
mod payload;
mod staff;
mod stage;
mod visit;

pub use config::Config;
pub use payload::{
    Consultation, DispensedItem, Invoice, InvoiceItem, InvoiceStatus, LabOrder, LabPriority,
    LabResult, Payment, PaymentMethod, Prescription, ResultFlag, Vitals,
};
pub use staff::{LoginResponse, Session, Staff, StaffRef};
pub use stage::{Role, Stage};
pub use visit::{HandoffRequest, NewVisit, PatientRef, QueuePage, StageRecord, Visit};
