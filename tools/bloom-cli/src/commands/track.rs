//! Render a tracking response.

use anyhow::Result;
use bloom_commerce::checkout::TrackingData;

use super::{read_json, TrackArgs};
use crate::context::Context;
use crate::output::{status_badge, step_marker};

/// Run the track command.
pub async fn run(args: TrackArgs, ctx: &Context) -> Result<()> {
    let data: TrackingData = read_json(ctx, &args.file).await?;
    let view = data.view();

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    ctx.output.header(&view.title);
    ctx.output.kv("status", &status_badge(&view.status_label));
    ctx.output.kv("total", &view.total);
    ctx.output.kv(view.date_caption, &view.date);
    if let Some(note) = &view.points_note {
        ctx.output.success(note);
    }

    println!();
    for step in &view.timeline {
        let badge = step.state.badge().map(|b| format!(" [{}]", b)).unwrap_or_default();
        println!("  {} {}{}", step_marker(step.state), step.label, badge);
        for line in &step.history {
            println!("      {}", line.when);
        }
    }

    if !view.history.is_empty() {
        ctx.output.header("History");
        for line in &view.history {
            let notes = line.notes.as_deref().map(|n| format!(" - {}", n)).unwrap_or_default();
            ctx.output.list_item(&format!("{}  {}{}", line.when, status_badge(&line.status), notes));
        }
    }

    if view.can_cancel {
        println!();
        ctx.output.info("This order can still be cancelled.");
    }
    Ok(())
}
