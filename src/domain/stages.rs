//! Stage transition table
//!
//! A visit moves through department stages along an ordered but branching
//! table. The API enforces the same rules; this copy drives what staff are
//! offered and rejects obvious mistakes before a request is sent.

use crate::schemas::{Role, Stage};

/// Every stage, in the order a typical visit passes through them.
pub const STAGES: &[Stage] = &[
    Stage::FrontDesk,
    Stage::Nurse,
    Stage::Doctor,
    Stage::Lab,
    Stage::Pharmacy,
    Stage::Billing,
    Stage::ReturnedToFrontDesk,
    Stage::Completed,
];

/// Allowed destinations per stage. Order is the order offered to staff; the
/// first entry is the default selection.
///
/// IMPORTANT: This is the single source of the transition rules.
const TRANSITIONS: &[(Stage, &[Stage])] = &[
    (Stage::FrontDesk, &[Stage::Nurse, Stage::Lab, Stage::Pharmacy]),
    (
        Stage::Nurse,
        &[Stage::Doctor, Stage::Lab, Stage::Pharmacy, Stage::Billing],
    ),
    (
        Stage::Doctor,
        &[Stage::Nurse, Stage::Lab, Stage::Pharmacy, Stage::Billing],
    ),
    (
        Stage::Lab,
        &[Stage::Doctor, Stage::Nurse, Stage::Pharmacy, Stage::Billing],
    ),
    (Stage::Pharmacy, &[Stage::Billing, Stage::Doctor]),
    (Stage::Billing, &[Stage::ReturnedToFrontDesk]),
    (
        Stage::ReturnedToFrontDesk,
        &[Stage::Completed, Stage::Nurse, Stage::Lab, Stage::Pharmacy],
    ),
    (Stage::Completed, &[]),
];

/// Returns the ordered destinations reachable from `current`.
pub fn get_allowed_transitions(current: Stage) -> Vec<Stage> {
    TRANSITIONS
        .iter()
        .find(|(from, _)| *from == current)
        .map(|(_, to)| to.to_vec())
        .unwrap_or_default()
}

/// Same as [`get_allowed_transitions`] for a raw stage identifier.
///
/// An unrecognized identifier allows nothing.
pub fn get_allowed_transitions_for(raw: &str) -> Vec<Stage> {
    match raw.parse::<Stage>() {
        Ok(stage) => get_allowed_transitions(stage),
        Err(_) => Vec::new(),
    }
}

/// Check whether `target` is in the table for `current`.
pub fn is_allowed_transition(current: Stage, target: Stage) -> bool {
    get_allowed_transitions(current).contains(&target)
}

/// Human-readable label for a stage.
pub fn get_stage_label(stage: Stage) -> &'static str {
    match stage {
        Stage::FrontDesk => "Front Desk",
        Stage::Nurse => "Nurse",
        Stage::Doctor => "Doctor",
        Stage::Lab => "Laboratory",
        Stage::Pharmacy => "Pharmacy",
        Stage::Billing => "Billing",
        Stage::ReturnedToFrontDesk => "Returned to Front Desk",
        Stage::Completed => "Completed",
    }
}

/// Label for a raw stage identifier, falling back to the identifier itself.
pub fn get_stage_label_for(raw: &str) -> String {
    match raw.parse::<Stage>() {
        Ok(stage) => get_stage_label(stage).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// The destination pre-selected when handing off from `current`.
///
/// For `returned_to_front_desk` this is `completed`.
pub fn default_destination(current: Stage) -> Option<Stage> {
    get_allowed_transitions(current).first().copied()
}

/// Whether staff have to pick a destination, or the single legal one can be
/// used directly.
pub fn needs_destination_choice(current: Stage) -> bool {
    get_allowed_transitions(current).len() > 1
}

/// Targets that need a specific receiving staff member before confirming.
pub fn requires_staff_selection(target: Stage) -> bool {
    matches!(target, Stage::Nurse | Stage::Lab | Stage::Pharmacy)
}

/// Stages worked by a department with clock-in/clock-out.
pub fn is_department_stage(stage: Stage) -> bool {
    matches!(
        stage,
        Stage::Nurse | Stage::Doctor | Stage::Lab | Stage::Pharmacy | Stage::Billing
    )
}

/// The role that staffs a department stage.
pub fn role_for_stage(stage: Stage) -> Option<Role> {
    match stage {
        Stage::FrontDesk | Stage::ReturnedToFrontDesk => Some(Role::FrontDesk),
        Stage::Nurse => Some(Role::Nurse),
        Stage::Doctor => Some(Role::Doctor),
        Stage::Lab => Some(Role::Lab),
        Stage::Pharmacy => Some(Role::Pharmacy),
        Stage::Billing => Some(Role::Billing),
        Stage::Completed => None,
    }
}

/// Check if a stage is terminal.
pub fn is_terminal_stage(stage: Stage) -> bool {
    stage == Stage::Completed
}
