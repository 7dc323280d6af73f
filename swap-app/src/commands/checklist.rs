use std::io::Write;

use anyhow::{Context, Result, bail};
use swap_core::checklist::{Checklist, ChecklistItem, ChecklistProgress};
use swap_data::builtin_checklist;

use crate::cli::ChecklistArgs;
use crate::state::AppState;

fn write_item(
    out: &mut dyn Write,
    progress: &ChecklistProgress,
    item: &ChecklistItem,
) -> Result<()> {
    let mark = if progress.is_completed(&item.id) { "x" } else { " " };
    let urgent = if item.urgent { " !" } else { "" };
    writeln!(out, "  [{mark}] {} ({}){urgent}  #{}", item.text, item.timeframe, item.id)?;
    Ok(())
}

/// Flips each id, rejecting the whole batch if any id is unknown.
pub fn toggle_items(
    checklist: &Checklist,
    progress: &mut ChecklistProgress,
    ids: &[String],
) -> Result<Vec<(String, bool)>> {
    if let Some(unknown) = ids.iter().find(|id| checklist.item(id).is_none()) {
        bail!("Unknown checklist item '{unknown}'");
    }
    Ok(ids
        .iter()
        .map(|id| (id.clone(), progress.toggle(id)))
        .collect())
}

pub fn run(
    state: &mut AppState,
    args: &ChecklistArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let checklist = builtin_checklist().context("Built-in checklist is invalid")?;

    for (id, done) in toggle_items(&checklist, &mut state.checklist, &args.toggle)? {
        writeln!(out, "{id}: {}", if done { "done" } else { "not done" })?;
    }
    let progress = &state.checklist;

    if args.urgent || args.timeframe.is_some() {
        let mut items = match &args.timeframe {
            Some(timeframe) => checklist.items_by_timeframe(timeframe),
            None => checklist.items().collect(),
        };
        if args.urgent {
            items.retain(|i| i.urgent);
        }
        for item in items {
            write_item(out, progress, item)?;
        }
        return Ok(());
    }

    writeln!(
        out,
        "Overall: {:.0}% ({} of {} urgent items done)",
        progress.overall_progress(&checklist),
        progress.urgent_completed(&checklist),
        checklist.urgent_items().len()
    )?;
    for section in &checklist.sections {
        writeln!(
            out,
            "\n{} [{} priority] {:.0}%",
            section.title,
            section.urgency,
            progress.section_progress(&checklist, &section.title)
        )?;
        for item in &section.items {
            write_item(out, progress, item)?;
        }
    }
    Ok(())
}
