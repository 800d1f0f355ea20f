//! Queue command - list or watch a stage queue

use std::path::Path;
use std::time::Duration;

use serde_json::json;

use crate::domain::{get_stage_label, home_stage};
use crate::errors::Result;
use crate::schemas::Stage;
use crate::workflow::QueueView;

use super::{print_json, visit_line, Context};

pub async fn run(
    home: Option<&Path>,
    json: bool,
    stage: Option<Stage>,
    page: u32,
    watch: bool,
) -> Result<()> {
    let ctx = Context::load(home)?;
    let (session, workflow) = ctx.connect()?;
    let stage = stage.unwrap_or_else(|| home_stage(session.role()));

    let mut view = QueueView::new(&session, stage, ctx.config.page_size)?;
    for _ in 1..page {
        // Page count is unknown until the first load; probe forward.
        view.refresh(workflow.api()).await?;
        if !view.next_page() {
            break;
        }
    }

    if !watch {
        view.refresh(workflow.api()).await?;
        return print_view(&view, json);
    }

    let interval = Duration::from_secs(ctx.config.poll_interval_seconds as u64);
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    view.watch(
        workflow.api(),
        workflow.events().subscribe(),
        interval,
        shutdown,
        |view| {
            if let Err(e) = print_view(view, json) {
                tracing::warn!("Failed to print queue: {}", e);
            }
        },
    )
    .await
}

fn print_view(view: &QueueView, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "stage": view.stage(),
            "page": view.page(),
            "pages": view.pages(),
            "total": view.total(),
            "visits": view.visits(),
            "refreshedAt": view.last_refreshed(),
        }));
    }

    println!(
        "{} queue: {} waiting (page {}/{})",
        get_stage_label(view.stage()),
        view.total(),
        view.page(),
        view.pages()
    );
    for visit in view.visits() {
        println!("  {}", visit_line(visit));
    }
    Ok(())
}
