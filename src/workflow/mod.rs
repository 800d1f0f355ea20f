//! Visit workflows
//!
//! Each operation validates locally, calls the visit service once, and
//! publishes a [`VisitEvent`] only after the service confirms. Nothing is
//! retried; a failed call leaves local state untouched.

mod events;
mod handoff;
mod queue;
mod reassign;
mod records;

use crate::api::VisitApi;

pub use events::{VisitEvent, VisitEvents};
pub use queue::QueueView;

/// Entry point for acting on visits through a [`VisitApi`]
pub struct VisitWorkflow<A> {
    api: A,
    events: VisitEvents,
}

impl<A: VisitApi> VisitWorkflow<A> {
    pub fn new(api: A, events: VisitEvents) -> Self {
        Self { api, events }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn events(&self) -> &VisitEvents {
        &self.events
    }
}
