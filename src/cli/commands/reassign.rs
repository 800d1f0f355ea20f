//! Reassign command

use std::path::Path;

use crate::domain::get_assignment;
use crate::errors::Result;

use super::{fetch_visit, print_json, Context};

pub async fn run(home: Option<&Path>, json: bool, visit_id: &str, staff_id: &str) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow.reassign(&session, &visit, staff_id).await?;

    if json {
        return print_json(&updated);
    }
    let assignee = get_assignment(&updated, updated.current_stage)
        .map(|s| s.display_name().to_string())
        .unwrap_or_else(|| staff_id.to_string());
    println!("{} at {} is now assigned to {}", updated.id, updated.current_stage, assignee);
    Ok(())
}
