//! Handoff and complete commands

use std::path::Path;

use crate::domain::{get_stage_label, HandoffDraft};
use crate::errors::Result;
use crate::schemas::{Stage, Visit};

use super::{fetch_visit, print_json, Context};

/// Options collected from the command line for one handoff
#[derive(Debug, Default)]
pub struct HandoffArgs {
    pub to: Option<Stage>,
    pub staff: Option<String>,
    pub notes: Option<String>,
    pub next_action: Option<String>,
}

pub async fn run(home: Option<&Path>, json: bool, visit_id: &str, args: HandoffArgs) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;

    let draft = draft_for(&visit, args);
    let updated = workflow.handoff(&session, &visit, &draft).await?;
    report(&visit, &updated, json)
}

/// Close out a visit that is back at the front desk
pub async fn complete(
    home: Option<&Path>,
    json: bool,
    visit_id: &str,
    notes: Option<String>,
) -> Result<()> {
    run(
        home,
        json,
        visit_id,
        HandoffArgs {
            to: Some(Stage::Completed),
            notes,
            ..Default::default()
        },
    )
    .await
}

/// Pin the draft to the stage we fetched, so a concurrent move is caught
/// as stale instead of being applied from the wrong stage.
fn draft_for(visit: &Visit, args: HandoffArgs) -> HandoffDraft {
    HandoffDraft {
        current_stage: Some(visit.current_stage),
        target_stage: args.to,
        staff_id: args.staff,
        notes: args.notes,
        next_action: args.next_action,
    }
}

fn report(before: &Visit, after: &Visit, json: bool) -> Result<()> {
    if json {
        return print_json(after);
    }
    println!(
        "{}: {} -> {}",
        after.id,
        get_stage_label(before.current_stage),
        get_stage_label(after.current_stage)
    );
    Ok(())
}
