//! Record commands - department data entry

use std::path::Path;

use crate::domain::get_stage_label;
use crate::errors::{CareQueueError, Result};
use crate::schemas::{
    Consultation, DispensedItem, LabOrder, LabPriority, LabResult, Prescription, Visit, Vitals,
};

use super::{fetch_visit, print_json, Context};

pub async fn vitals(home: Option<&Path>, json: bool, visit_id: &str, vitals: Vitals) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow.record_vitals(&session, &visit, &vitals).await?;
    report(&updated, json)
}

pub async fn diagnosis(
    home: Option<&Path>,
    json: bool,
    visit_id: &str,
    diagnosis: &str,
    prescriptions: &[String],
    lab_orders: &[String],
    notes: Option<String>,
) -> Result<()> {
    let consultation = Consultation {
        diagnosis: diagnosis.trim().to_string(),
        prescriptions: prescriptions
            .iter()
            .map(|p| parse_prescription(p))
            .collect::<Result<_>>()?,
        lab_orders: lab_orders
            .iter()
            .map(|o| parse_lab_order(o))
            .collect::<Result<_>>()?,
        notes,
    };

    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow
        .record_consultation(&session, &visit, &consultation)
        .await?;
    report(&updated, json)
}

pub async fn lab(home: Option<&Path>, json: bool, visit_id: &str, results: &[String]) -> Result<()> {
    let results = results
        .iter()
        .map(|r| parse_lab_result(r))
        .collect::<Result<Vec<_>>>()?;

    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow.record_lab_results(&session, &visit, &results).await?;
    report(&updated, json)
}

pub async fn dispense(home: Option<&Path>, json: bool, visit_id: &str, items: &[String]) -> Result<()> {
    let items = items
        .iter()
        .map(|i| parse_dispensed(i))
        .collect::<Result<Vec<_>>>()?;

    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let visit = fetch_visit(workflow.api(), visit_id).await?;
    let updated = workflow.record_dispense(&session, &visit, &items).await?;
    report(&updated, json)
}

fn report(visit: &Visit, json: bool) -> Result<()> {
    if json {
        return print_json(visit);
    }
    println!("Saved {} data for {}", get_stage_label(visit.current_stage), visit.id);
    Ok(())
}

/// Parse `drug:dosage[:frequency[:duration]]`.
pub fn parse_prescription(raw: &str) -> Result<Prescription> {
    let mut parts = raw.split(':').map(str::trim);
    let drug = parts.next().unwrap_or_default();
    let dosage = parts.next().unwrap_or_default();
    if drug.is_empty() || dosage.is_empty() {
        return Err(CareQueueError::Validation(format!(
            "prescription '{}' must be drug:dosage[:frequency[:duration]]",
            raw
        )));
    }
    Ok(Prescription {
        drug: drug.to_string(),
        dosage: dosage.to_string(),
        frequency: parts.next().unwrap_or_default().to_string(),
        duration: parts.next().unwrap_or_default().to_string(),
    })
}

/// Parse a test name with an optional `!urgent` or `!stat` suffix.
pub fn parse_lab_order(raw: &str) -> Result<LabOrder> {
    let (name, priority) = match raw.rsplit_once('!') {
        Some((name, "urgent")) => (name, LabPriority::Urgent),
        Some((name, "stat")) => (name, LabPriority::Stat),
        Some((_, other)) => {
            return Err(CareQueueError::Validation(format!(
                "unknown lab priority '{}'",
                other
            )))
        }
        None => (raw, LabPriority::Routine),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(CareQueueError::Validation("lab order needs a test name".into()));
    }
    Ok(LabOrder {
        test_name: name.to_string(),
        priority,
    })
}

/// Parse `test=value[ unit]`.
pub fn parse_lab_result(raw: &str) -> Result<LabResult> {
    let (test, reading) = raw.split_once('=').ok_or_else(|| {
        CareQueueError::Validation(format!("lab result '{}' must be test=value", raw))
    })?;
    let reading = reading.trim();
    let (value, unit) = match reading.split_once(char::is_whitespace) {
        Some((value, unit)) => (value, Some(unit.trim().to_string())),
        None => (reading, None),
    };
    Ok(LabResult {
        test_name: test.trim().to_string(),
        value: value.to_string(),
        unit,
        reference_range: None,
        flag: None,
    })
}

/// Parse `drug:quantity`. The drug name may itself contain colons.
pub fn parse_dispensed(raw: &str) -> Result<DispensedItem> {
    let invalid = || CareQueueError::Validation(format!("dispense item '{}' must be drug:quantity", raw));
    let (drug, quantity) = raw.rsplit_once(':').ok_or_else(invalid)?;
    let quantity = quantity.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(DispensedItem {
        drug: drug.trim().to_string(),
        quantity,
        instructions: None,
    })
}
