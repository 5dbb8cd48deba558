use crate::models::ChartInput;
use crate::source::EntryKind;
use crate::state::LegendState;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

/// Read a chart description (traces, hidden labels, canvas, legend options).
pub fn load_chart<P: AsRef<Path>>(path: P) -> Result<ChartInput> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let chart = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(chart)
}

/// Write a chart description back as pretty JSON.
pub fn save_chart<P: AsRef<Path>>(chart: &ChartInput, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(chart)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save the computed legend state as pretty JSON.
pub fn save_layout_json<P: AsRef<Path>>(state: &LegendState, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(state)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Spreadsheet apps evaluate cells starting with these characters.
fn neutralize_formula(cell: &str) -> String {
    if cell.starts_with(['=', '+', '-', '@']) {
        format!("'{cell}")
    } else {
        cell.to_string()
    }
}

/// Save one row per placed entry with panel-relative positions.
pub fn save_entries_csv<P: AsRef<Path>>(state: &LegendState, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "index", "group", "label", "kind", "trace", "hidden", "x", "y", "width", "height",
    ))?;
    let mut index = 0usize;
    for g in &state.layout.groups {
        for e in &g.entries {
            let origin = g.offset.offset(e.offset);
            let kind = match e.entry.kind {
                EntryKind::Trace => "trace",
                EntryKind::Category => "category",
            };
            wtr.serialize((
                index,
                neutralize_formula(&g.id),
                neutralize_formula(&e.entry.label),
                kind,
                e.entry.owner.0,
                e.entry.is_hidden,
                origin.x,
                origin.y,
                e.entry.width,
                e.entry.height,
            ))?;
            index += 1;
        }
    }
    wtr.flush()?;
    Ok(())
}
