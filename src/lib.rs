//! carequeue - Patient visit handoffs between clinic departments
//!
//! This library provides the core functionality for the carequeue CLI, including:
//! - Schema definitions for visits, staff, stage payloads and config
//! - Domain logic for stages, transitions, access and handoff validation
//! - File system utilities for the config and stored session
//! - The visit API client
//! - Workflows for handoff, reassignment, clock-in, data entry and queues

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;
pub mod workflow;

// Re-export commonly used types
pub use errors::{CareQueueError, Result};
pub use schemas::{Config, Role, Session, Stage, Visit};
pub use workflow::{QueueView, VisitEvent, VisitEvents, VisitWorkflow};
