//! Register command - open a visit at the front desk

use std::path::Path;

use crate::errors::Result;

use super::{print_json, visit_line, Context};

pub async fn run(
    home: Option<&Path>,
    json: bool,
    patient_id: &str,
    notes: Option<String>,
) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = workflow.register_visit(&session, patient_id, notes).await?;

    if json {
        print_json(&visit)
    } else {
        println!("Registered {}", visit_line(&visit));
        Ok(())
    }
}
