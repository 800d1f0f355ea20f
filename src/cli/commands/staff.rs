//! Staff command - list who can receive a visit at a stage

use std::path::Path;

use crate::errors::Result;
use crate::schemas::Stage;

use super::{print_json, Context};

pub async fn run(home: Option<&Path>, json: bool, stage: Stage) -> Result<()> {
    let ctx = Context::load(home)?;
    let (_session, workflow) = ctx.connect()?;
    let staff = workflow.receivers_for(stage).await?;

    if json {
        return print_json(&staff);
    }
    if staff.is_empty() {
        println!("No staff selection at {}", stage);
        return Ok(());
    }
    for member in &staff {
        println!(
            "{:<12} {:<24} {}",
            member.id,
            member.name,
            member.department.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
