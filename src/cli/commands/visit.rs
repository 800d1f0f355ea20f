//! Visit commands - show, transitions and clock-in

use std::path::Path;

use serde_json::json;

use crate::domain::{
    default_destination, get_assignment, get_stage_label, needs_destination_choice,
    requires_staff_selection,
};
use crate::errors::Result;
use crate::schemas::{Stage, Visit};

use super::{fetch_visit, print_json, visit_line, Context};

/// Show a visit and its per-stage records
pub async fn show(home: Option<&Path>, json: bool, visit_id: &str) -> Result<()> {
    let ctx = Context::load(home)?;
    let (_session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;

    if json {
        return print_json(&visit);
    }
    print!("{}", describe(&visit));
    Ok(())
}

/// List the stages a visit may move to next
pub async fn transitions(home: Option<&Path>, json: bool, visit_id: &str) -> Result<()> {
    let ctx = Context::load(home)?;
    let (_session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let targets = workflow.destinations(&visit);

    if json {
        return print_json(&json!({
            "visitId": visit.id,
            "currentStage": visit.current_stage,
            "transitions": targets,
            "default": default_destination(visit.current_stage),
            "needsChoice": needs_destination_choice(visit.current_stage),
        }));
    }

    if targets.is_empty() {
        println!("{} is {}; no further handoffs", visit.id, get_stage_label(visit.current_stage));
        return Ok(());
    }
    println!("{} at {} can move to:", visit.id, get_stage_label(visit.current_stage));
    for target in targets {
        let mut line = format!("  {:<24} {}", target, get_stage_label(target));
        if requires_staff_selection(target) {
            line.push_str("  (select staff)");
        }
        if Some(target) == default_destination(visit.current_stage) {
            line.push_str("  (default)");
        }
        println!("{}", line);
    }
    Ok(())
}

/// Clock in to the visit's current stage
pub async fn clock_in(home: Option<&Path>, json: bool, visit_id: &str) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow.clock_in(&session, &visit).await?;

    if json {
        print_json(&updated)
    } else {
        println!("Clocked in to {} for {}", get_stage_label(updated.current_stage), updated.id);
        Ok(())
    }
}

fn describe(visit: &Visit) -> String {
    let mut out = format!("{}\n", visit_line(visit));
    if let Some(mrn) = &visit.patient.hospital_number {
        out.push_str(&format!("  Hospital number: {}\n", mrn));
    }

    for stage in [
        Stage::Nurse,
        Stage::Doctor,
        Stage::Lab,
        Stage::Pharmacy,
        Stage::Billing,
    ] {
        if let Some(staff) = get_assignment(visit, stage) {
            out.push_str(&format!(
                "  {} assigned: {}\n",
                get_stage_label(stage),
                staff.display_name()
            ));
        }
    }

    for (stage, record) in &visit.stages {
        out.push_str(&format!("  [{}]\n", get_stage_label(*stage)));
        if let (Some(by), Some(at)) = (&record.clocked_in_by, record.clocked_in_at) {
            out.push_str(&format!("    in:  {} at {}\n", by.display_name(), at.format("%Y-%m-%d %H:%M")));
        }
        if let (Some(by), Some(at)) = (&record.clocked_out_by, record.clocked_out_at) {
            out.push_str(&format!("    out: {} at {}\n", by.display_name(), at.format("%Y-%m-%d %H:%M")));
        }
        if let Some(vitals) = &record.vitals {
            if let Some(bp) = &vitals.blood_pressure {
                out.push_str(&format!("    BP {}\n", bp));
            }
            if let Some(t) = vitals.temperature {
                out.push_str(&format!("    Temp {:.1}°C\n", t));
            }
        }
        if let Some(consultation) = &record.consultation {
            out.push_str(&format!("    Diagnosis: {}\n", consultation.diagnosis));
            for rx in &consultation.prescriptions {
                out.push_str(&format!("    Rx {} {}\n", rx.drug, rx.dosage));
            }
        }
        for result in &record.results {
            out.push_str(&format!("    {} = {}\n", result.test_name, result.value));
        }
        for item in &record.dispensed {
            out.push_str(&format!("    Dispensed {} x{}\n", item.drug, item.quantity));
        }
        if let Some(invoice) = &record.invoice {
            out.push_str(&format!(
                "    Invoice {}: {:.2} / {:.2}\n",
                invoice.id, invoice.amount_paid, invoice.total
            ));
        }
        if let Some(notes) = &record.notes {
            out.push_str(&format!("    Notes: {}\n", notes));
        }
    }
    out
}
