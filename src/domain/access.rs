//! Role-based queue access and per-stage assignment fields

use crate::schemas::{Role, Stage, StaffRef, Visit};

use super::stages::STAGES;

/// Whether `role` may open and act on the queue for `stage`.
///
/// Gates views, not transitions; the API decides whether a handoff goes
/// through.
pub fn can_access_stage(role: Role, stage: Stage) -> bool {
    match role {
        Role::Admin => true,
        Role::FrontDesk => matches!(
            stage,
            Stage::FrontDesk | Stage::ReturnedToFrontDesk | Stage::Completed
        ),
        Role::Nurse => stage == Stage::Nurse,
        Role::Doctor => stage == Stage::Doctor,
        Role::Lab => stage == Stage::Lab,
        Role::Pharmacy => stage == Stage::Pharmacy,
        Role::Billing => stage == Stage::Billing,
    }
}

/// All stages `role` may access, in table order.
pub fn accessible_stages(role: Role) -> Vec<Stage> {
    STAGES
        .iter()
        .copied()
        .filter(|&stage| can_access_stage(role, stage))
        .collect()
}

/// The queue a role lands on by default.
pub fn home_stage(role: Role) -> Stage {
    match role {
        Role::Admin | Role::FrontDesk => Stage::FrontDesk,
        Role::Nurse => Stage::Nurse,
        Role::Doctor => Stage::Doctor,
        Role::Lab => Stage::Lab,
        Role::Pharmacy => Stage::Pharmacy,
        Role::Billing => Stage::Billing,
    }
}

/// Name of the visit field holding the staff assignment for `stage`.
pub fn assignment_field(stage: Stage) -> Option<&'static str> {
    match stage {
        Stage::Nurse => Some("assignedNurse"),
        Stage::Doctor => Some("assignedDoctor"),
        Stage::Lab => Some("assignedLab"),
        Stage::Pharmacy => Some("assignedPharmacy"),
        Stage::Billing => Some("assignedBilling"),
        _ => None,
    }
}

/// Current assignment on `visit` for `stage`.
pub fn get_assignment(visit: &Visit, stage: Stage) -> Option<&StaffRef> {
    match stage {
        Stage::Nurse => visit.assigned_nurse.as_ref(),
        Stage::Doctor => visit.assigned_doctor.as_ref(),
        Stage::Lab => visit.assigned_lab.as_ref(),
        Stage::Pharmacy => visit.assigned_pharmacy.as_ref(),
        Stage::Billing => visit.assigned_billing.as_ref(),
        _ => None,
    }
}
