//! Handoff preparation
//!
//! Pure functions that turn what staff selected into a handoff request, or
//! explain why it cannot be sent.

use crate::errors::{CareQueueError, Result};
use crate::schemas::{HandoffRequest, Stage, Visit};

use super::stages::{
    default_destination, get_allowed_transitions, get_stage_label, needs_destination_choice,
};
use super::validation::{validate_handoff, ValidationContext};

/// What staff selected in the handoff dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandoffDraft {
    /// Stage the visit was at when the view was loaded
    pub current_stage: Option<Stage>,

    /// Chosen destination; may be left empty when there is only one choice
    pub target_stage: Option<Stage>,

    /// Receiving staff member
    pub staff_id: Option<String>,

    pub notes: Option<String>,

    pub next_action: Option<String>,
}

/// Result of preparing a handoff
#[derive(Debug)]
pub enum TransitionResult {
    /// The request may be sent
    Success {
        /// Request body for the handoff call
        request: HandoffRequest,
    },
    /// The request must not be sent
    Error {
        /// Why the handoff was rejected
        error: CareQueueError,
    },
}

impl TransitionResult {
    /// Check if the handoff is ready to send
    pub fn is_success(&self) -> bool {
        matches!(self, TransitionResult::Success { .. })
    }

    /// Check if the handoff was rejected
    pub fn is_error(&self) -> bool {
        matches!(self, TransitionResult::Error { .. })
    }

    /// Get the request if the handoff is ready
    pub fn request(self) -> Option<HandoffRequest> {
        match self {
            TransitionResult::Success { request } => Some(request),
            TransitionResult::Error { .. } => None,
        }
    }

    /// Get the error if the handoff was rejected
    pub fn error(self) -> Option<CareQueueError> {
        match self {
            TransitionResult::Success { .. } => None,
            TransitionResult::Error { error } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<HandoffRequest> {
        match self {
            TransitionResult::Success { request } => Ok(request),
            TransitionResult::Error { error } => Err(error),
        }
    }
}

/// Pick the destination for a handoff from `current`.
///
/// An explicit choice wins. Without one, the default is used only when the
/// choice step can be skipped: a single legal destination, or checkout from
/// `returned_to_front_desk`, which defaults to completion.
pub fn resolve_destination(current: Stage, chosen: Option<Stage>) -> Result<Stage> {
    if let Some(target) = chosen {
        return Ok(target);
    }

    let skip_choice =
        !needs_destination_choice(current) || current == Stage::ReturnedToFrontDesk;
    match default_destination(current) {
        Some(target) if skip_choice => Ok(target),
        Some(_) => {
            let options: Vec<String> = get_allowed_transitions(current)
                .iter()
                .map(|s| s.to_string())
                .collect();
            Err(CareQueueError::Validation(format!(
                "choose a destination from {}: {}",
                get_stage_label(current),
                options.join(", ")
            )))
        }
        None => Err(CareQueueError::Validation(format!(
            "no transitions allowed from {}",
            get_stage_label(current)
        ))),
    }
}

/// Pure function that prepares a handoff request for `visit`.
///
/// This function:
/// - Never mutates the visit
/// - Resolves the destination
/// - Runs every client-side check before anything is sent
pub fn prepare_handoff(
    visit: &Visit,
    draft: &HandoffDraft,
    ctx: &ValidationContext,
) -> TransitionResult {
    let current = draft.current_stage.unwrap_or(visit.current_stage);

    let target = match resolve_destination(current, draft.target_stage) {
        Ok(target) => target,
        Err(error) => return TransitionResult::Error { error },
    };

    let staff_id = draft
        .staff_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let validation = validate_handoff(visit, current, target, staff_id, ctx);
    if let Err(error) = validation.into_result() {
        return TransitionResult::Error { error };
    }

    let clean = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    TransitionResult::Success {
        request: HandoffRequest {
            visit_id: visit.id.clone(),
            current_stage: current,
            target_stage: target,
            assigned_to: staff_id.map(str::to_string),
            notes: clean(&draft.notes),
            next_action: clean(&draft.next_action),
        },
    }
}
