//! Stages command - print the stage table

use serde_json::json;

use crate::domain::{get_allowed_transitions, get_stage_label, requires_staff_selection, STAGES};
use crate::errors::Result;

use super::print_json;

pub async fn run(json: bool) -> Result<()> {
    if json {
        let table: Vec<_> = STAGES
            .iter()
            .map(|&stage| {
                json!({
                    "stage": stage,
                    "label": get_stage_label(stage),
                    "transitions": get_allowed_transitions(stage),
                })
            })
            .collect();
        return print_json(&table);
    }

    for &stage in STAGES {
        let targets: Vec<String> = get_allowed_transitions(stage)
            .into_iter()
            .map(|t| {
                if requires_staff_selection(t) {
                    format!("{}*", t)
                } else {
                    t.to_string()
                }
            })
            .collect();
        let targets = if targets.is_empty() {
            "-".to_string()
        } else {
            targets.join(", ")
        };
        println!("{:<24} {:<24} -> {}", stage, get_stage_label(stage), targets);
    }
    println!();
    println!("* receiving staff must be selected");
    Ok(())
}
