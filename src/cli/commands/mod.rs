//! CLI command implementations

pub mod auth;
pub mod handoff;
pub mod pay;
pub mod queue;
pub mod reassign;
pub mod record;
pub mod register;
pub mod stages;
pub mod staff;
pub mod visit;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::{HttpVisitApi, VisitApi};
use crate::config::load_config;
use crate::domain::get_stage_label;
use crate::errors::{CareQueueError, Result};
use crate::fs::{read_session, resolve_home};
use crate::schemas::{Config, Session, Visit};
use crate::workflow::{VisitEvents, VisitWorkflow};

/// Resolved home directory and configuration for one invocation
pub struct Context {
    pub home: PathBuf,
    pub config: Config,
}

impl Context {
    pub fn load(home: Option<&Path>) -> Result<Self> {
        let home = resolve_home(home)?;
        let config = load_config(&home)?;
        Ok(Self { home, config })
    }

    /// Restore the stored session and build an authenticated workflow.
    pub fn connect(&self) -> Result<(Session, VisitWorkflow<HttpVisitApi>)> {
        let session = read_session(&self.home)?;
        let api = HttpVisitApi::from_config(&self.config)?.with_token(session.token.clone());
        Ok((session, VisitWorkflow::new(api, VisitEvents::new())))
    }
}

/// Fetch a visit, naming it in the error if it can't be loaded.
pub async fn fetch_visit<A: VisitApi + ?Sized>(api: &A, visit_id: &str) -> Result<Visit> {
    api.get_visit(visit_id)
        .await
        .map_err(|e| match e {
            CareQueueError::Remote { status: 404, .. } => {
                CareQueueError::Remote {
                    status: 404,
                    message: format!("Visit {} not found", visit_id),
                }
            }
            other => other,
        })
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| CareQueueError::InvalidJson(e.to_string()))?;
    println!("{}", output);
    Ok(())
}

/// One-line summary used by list-style output.
pub fn visit_line(visit: &Visit) -> String {
    let mut line = format!(
        "{:<12} {:<24} {}",
        visit.id,
        visit.patient.name,
        get_stage_label(visit.current_stage)
    );
    let active = visit.active_stages();
    if !active.is_empty() {
        let labels: Vec<&str> = active.iter().map(|s| get_stage_label(*s)).collect();
        line.push_str(&format!("  [in: {}]", labels.join(", ")));
    }
    line
}
