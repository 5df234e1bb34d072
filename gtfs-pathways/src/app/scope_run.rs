use super::PathwaysAppError;
use crate::{
    feed::{read_feed, FeedLocation},
    model::{GtfsRecord, Table},
    reconcile::{scope_feed, ReconcileConfig, ScopedTable},
};
use itertools::Itertools;

const STOP_COLUMNS: [&str; 4] = ["stop_id", "stop_name", "location_type", "parent_station"];
const PATHWAY_COLUMNS: [&str; 5] = [
    "pathway_id",
    "from_stop_id",
    "to_stop_id",
    "pathway_mode",
    "is_bidirectional",
];
const LEVEL_COLUMNS: [&str; 3] = ["level_id", "level_index", "level_name"];

/// prints the part of the source feed that a merge with this configuration
/// would carry over.
pub fn run(source: &FeedLocation, config: &ReconcileConfig) -> Result<(), PathwaysAppError> {
    let feed = read_feed(source)?;
    let scoped = scope_feed(&feed, config)?;
    for warning in scoped.warnings.iter() {
        log::warn!("{warning}");
    }

    println!(
        "root stops: {}",
        config.root_stop_ids.iter().join(", ")
    );
    println!(
        "{}",
        render_section(&scoped.stops, feed.stops.len(), &STOP_COLUMNS)
    );
    println!(
        "{}",
        render_secondary(&scoped.pathways, feed.pathways.as_ref(), &PATHWAY_COLUMNS)
    );
    println!(
        "{}",
        render_secondary(&scoped.levels, feed.levels.as_ref(), &LEVEL_COLUMNS)
    );
    Ok(())
}

fn render_secondary<R: GtfsRecord>(
    scoped: &ScopedTable<R>,
    source: Option<&Table<R>>,
    columns: &[&str],
) -> String {
    match scoped {
        ScopedTable::NoData => format!("{}: no data in source feed", R::KIND.filename()),
        ScopedTable::Present(table) => render_section(
            table,
            source.map(|t| t.len()).unwrap_or_default(),
            columns,
        ),
    }
}

/// a heading with the scope counts followed by the rows, limited to the
/// listed columns the table actually has.
fn render_section<R: GtfsRecord>(table: &Table<R>, total: usize, columns: &[&str]) -> String {
    let heading = format!(
        "{}: {} in scope (out of {} total)",
        R::KIND.filename(),
        table.len(),
        total
    );
    if table.is_empty() {
        return heading;
    }
    let columns = columns
        .iter()
        .copied()
        .filter(|c| table.has_column(c))
        .collect_vec();
    let rows = table
        .iter()
        .map(|row| columns.iter().map(|c| Table::<R>::value(row, c)).collect_vec())
        .collect_vec();
    let widths = columns
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            rows.iter()
                .map(|r| r[idx].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or_default()
        })
        .collect_vec();

    let format_line = |values: &[&str]| {
        values
            .iter()
            .zip(widths.iter())
            .map(|(v, w)| format!("{v:<width$}", width = *w))
            .join("  ")
            .trim_end()
            .to_string()
    };
    let mut lines = vec![heading, format!("  {}", format_line(columns.as_slice()))];
    for row in rows.iter() {
        lines.push(format!("  {}", format_line(row.as_slice())));
    }
    lines.join("\n")
}
