//! Local visit events
//!
//! Published after the visit service confirms a change, so other open views
//! can react without waiting for their next poll.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::schemas::Stage;

const DEFAULT_CAPACITY: usize = 64;

/// A confirmed change to a visit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VisitEvent {
    /// The visit moved to another stage
    HandedOff {
        visit_id: String,
        from: Stage,
        to: Stage,
    },
    /// The current stage's assignment changed
    Reassigned {
        visit_id: String,
        stage: Stage,
        staff_id: String,
    },
    /// Someone clocked in to the visit's current stage
    ClockedIn { visit_id: String, stage: Stage },
    /// Stage payload saved
    StageDataRecorded { visit_id: String, stage: Stage },
}

impl VisitEvent {
    pub fn visit_id(&self) -> &str {
        match self {
            VisitEvent::HandedOff { visit_id, .. }
            | VisitEvent::Reassigned { visit_id, .. }
            | VisitEvent::ClockedIn { visit_id, .. }
            | VisitEvent::StageDataRecorded { visit_id, .. } => visit_id,
        }
    }
}

/// Broadcast bus for [`VisitEvent`]s. Cheap to clone; clones share the bus.
#[derive(Debug, Clone)]
pub struct VisitEvents {
    sender: broadcast::Sender<VisitEvent>,
}

impl VisitEvents {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VisitEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns how many subscribers received it.
    pub fn publish(&self, event: VisitEvent) -> usize {
        tracing::debug!(?event, "Publishing visit event");
        // No subscribers is fine; nobody has that queue open.
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for VisitEvents {
    fn default() -> Self {
        Self::new()
    }
}
