//! Domain logic for visit stages and handoffs

mod access;
mod stages;
mod transitions;
mod validation;


pub use access::{accessible_stages, assignment_field, can_access_stage, get_assignment, home_stage};
pub use stages::{
    default_destination, get_allowed_transitions, get_allowed_transitions_for,
    get_stage_label, get_stage_label_for, is_allowed_transition, is_department_stage,
    is_terminal_stage, needs_destination_choice, requires_staff_selection, role_for_stage, STAGES,
};
pub use transitions::{prepare_handoff, resolve_destination, HandoffDraft, TransitionResult};
pub use validation::{
    can_act_on, can_leave_stage, parse_blood_pressure, validate_clock_in, validate_consultation,
    validate_dispense, validate_handoff, validate_lab_results, validate_payment,
    validate_reassignment, validate_route, validate_stage_work, validate_vitals, ValidationContext,
    ValidationResult,
};
