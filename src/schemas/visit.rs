//! Visit schema - one patient's journey through the facility

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payload::{Consultation, DispensedItem, Invoice, LabResult, Vitals};
use super::staff::StaffRef;
use super::stage::Stage;

/// The patient a visit belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRef {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Hospital/medical record number
    #[serde(default, alias = "mrn", skip_serializing_if = "Option::is_none")]
    pub hospital_number: Option<String>,
}

/// Per-stage record: who worked the stage, when, and what they recorded
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_in_by: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_in_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_out_by: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clocked_out_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // Stage-specific payloads; at most one group is populated per stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitals: Option<Vitals>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultation: Option<Consultation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<LabResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dispensed: Vec<DispensedItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice: Option<Invoice>,
}

impl StageRecord {
    /// Clocked in and not yet clocked out
    pub fn is_active(&self) -> bool {
        self.clocked_in_at.is_some() && self.clocked_out_at.is_none()
    }

    pub fn is_clocked_out(&self) -> bool {
        self.clocked_out_at.is_some()
    }
}

/// A patient visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    #[serde(alias = "_id")]
    pub id: String,

    pub patient: PatientRef,

    /// The stage currently awaiting action
    pub current_stage: Stage,

    #[serde(default)]
    pub stages: BTreeMap<Stage, StageRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_doctor: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_nurse: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_lab: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_pharmacy: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_billing: Option<StaffRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Visit {
    /// A freshly registered visit waiting at the front desk
    pub fn new(id: impl Into<String>, patient: PatientRef) -> Self {
        let now = Utc::now();
        Visit {
            id: id.into(),
            patient,
            current_stage: Stage::FrontDesk,
            stages: BTreeMap::new(),
            assigned_doctor: None,
            assigned_nurse: None,
            assigned_lab: None,
            assigned_pharmacy: None,
            assigned_billing: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Visit at the given stage
    pub fn with_current_stage(mut self, stage: Stage) -> Self {
        self.current_stage = stage;
        self.touch_returning()
    }

    /// Return a new Visit with `stage` clocked in by `by`
    pub fn with_clock_in(mut self, stage: Stage, by: StaffRef) -> Self {
        let record = self.stages.entry(stage).or_default();
        record.clocked_in_by = Some(by);
        record.clocked_in_at = Some(Utc::now());
        record.clocked_out_by = None;
        record.clocked_out_at = None;
        self.touch_returning()
    }

    /// Return a new Visit with `stage` clocked out by `by`
    pub fn with_clock_out(mut self, stage: Stage, by: StaffRef) -> Self {
        let record = self.stages.entry(stage).or_default();
        record.clocked_out_by = Some(by);
        record.clocked_out_at = Some(Utc::now());
        self.touch_returning()
    }

    /// Return a new Visit with the stage record replaced
    pub fn with_record(mut self, stage: Stage, record: StageRecord) -> Self {
        self.stages.insert(stage, record);
        self.touch_returning()
    }

    fn touch_returning(mut self) -> Self {
        self.updated_at = Some(Utc::now());
        self
    }

    // ===== QUERIES =====

    pub fn record(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.get(&stage)
    }

    /// Stages that are clocked in and not clocked out
    pub fn active_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|(_, record)| record.is_active())
            .map(|(stage, _)| *stage)
            .collect()
    }

    pub fn is_clocked_in(&self, stage: Stage) -> bool {
        self.record(stage).map(StageRecord::is_active).unwrap_or(false)
    }
}

/// One page of a department queue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuePage {
    #[serde(default)]
    pub visits: Vec<Visit>,

    #[serde(default)]
    pub total: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_page")]
    pub pages: u32,
}

fn default_page() -> u32 {
    1
}

/// Body of `POST /visits`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub patient_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /visits/{id}/handoff`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRequest {
    /// Not serialized; it is part of the path
    #[serde(skip)]
    pub visit_id: String,

    pub current_stage: Stage,

    pub target_stage: Stage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientRef {
        PatientRef {
            id: "p1".to_string(),
            name: "Chidi Okafor".to_string(),
            hospital_number: Some("HN-0001".to_string()),
        }
    }

    #[test]
    fn test_new_visit_starts_at_front_desk() {
        let visit = Visit::new("v1", patient());
        assert_eq!(visit.current_stage, Stage::FrontDesk);
        assert!(visit.stages.is_empty());
        assert!(visit.active_stages().is_empty());
    }

    #[test]
    fn test_visit_deserializes_api_shape() {
        let json = r#"{
            "_id": "v42",
            "patient": {"_id": "p9", "name": "Amaka Eze", "mrn": "HN-77"},
            "currentStage": "doctor",
            "stages": {
                "nurse": {
                    "clockedInBy": "n1",
                    "clockedInAt": "2024-03-01T09:00:00Z",
                    "clockedOutBy": {"_id": "n1", "name": "Ada"},
                    "clockedOutAt": "2024-03-01T09:20:00Z",
                    "vitals": {"bloodPressure": "130/85", "pulse": 80}
                },
                "doctor": {
                    "clockedInBy": {"_id": "d1", "name": "Dr. Bello"},
                    "clockedInAt": "2024-03-01T09:30:00Z"
                }
            },
            "assignedDoctor": {"_id": "d1", "name": "Dr. Bello"}
        }"#;

        let visit: Visit = serde_json::from_str(json).unwrap();
        assert_eq!(visit.id, "v42");
        assert_eq!(visit.patient.hospital_number.as_deref(), Some("HN-77"));
        assert_eq!(visit.current_stage, Stage::Doctor);
        assert!(visit.is_clocked_in(Stage::Doctor));
        assert!(!visit.is_clocked_in(Stage::Nurse));
        assert_eq!(visit.active_stages(), vec![Stage::Doctor]);
        assert_eq!(
            visit.record(Stage::Nurse).unwrap().vitals.as_ref().unwrap().pulse,
            Some(80)
        );
        assert_eq!(visit.assigned_doctor.as_ref().unwrap().id, "d1");
    }

    #[test]
    fn test_clock_in_and_out_builders() {
        let visit = Visit::new("v1", patient()).with_current_stage(Stage::Nurse);
        let clocked = visit.clone().with_clock_in(Stage::Nurse, StaffRef::id("n1"));
        assert!(clocked.is_clocked_in(Stage::Nurse));
        assert!(!visit.is_clocked_in(Stage::Nurse)); // Original unchanged

        let out = clocked.with_clock_out(Stage::Nurse, StaffRef::id("n1"));
        assert!(!out.is_clocked_in(Stage::Nurse));
        assert!(out.record(Stage::Nurse).unwrap().is_clocked_out());
    }

    #[test]
    fn test_handoff_request_body_omits_visit_id() {
        let req = HandoffRequest {
            visit_id: "v1".to_string(),
            current_stage: Stage::Doctor,
            target_stage: Stage::Billing,
            assigned_to: None,
            notes: Some("Consultation done".to_string()),
            next_action: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["currentStage"], "doctor");
        assert_eq!(json["targetStage"], "billing");
        assert_eq!(json["notes"], "Consultation done");
        assert!(json.get("visitId").is_none());
        assert!(json.get("assignedTo").is_none());
    }

    #[test]
    fn test_queue_page_defaults() {
        let page: QueuePage = serde_json::from_str(r#"{"visits": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.pages, 1);
        assert_eq!(page.total, 0);
    }
}
