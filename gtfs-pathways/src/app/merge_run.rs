use super::PathwaysAppError;
use crate::{
    feed::{read_feed, write_feed, FeedLocation},
    reconcile::{reconcile, ReconcileConfig, ReconcileReport},
};
use std::path::Path;

/// reads both feeds, merges the station pathways of `source` into `target`
/// and writes the merged feed to `output` unless this is a dry run.
pub fn run(
    source: &FeedLocation,
    target: &FeedLocation,
    output: &FeedLocation,
    config: &ReconcileConfig,
    report_file: Option<&Path>,
    dry_run: bool,
) -> Result<(), PathwaysAppError> {
    let source_feed = read_feed(source)?;
    let target_feed = read_feed(target)?;
    let result = reconcile(&source_feed, &target_feed, config)?;

    println!(
        "merged {} stops in scope of {} root(s)",
        result.report.scope_size,
        result.report.root_stop_ids.len()
    );
    for table in result.report.tables.iter() {
        println!("  {table}");
    }

    if let Some(path) = report_file {
        write_report(path, &result.report)?;
    }

    if dry_run {
        log::info!("dry run, {output} was not written");
        return Ok(());
    }
    write_feed(target, output, &result)?;
    Ok(())
}

fn write_report(path: &Path, report: &ReconcileReport) -> Result<(), PathwaysAppError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    log::info!("wrote merge report to {}", path.display());
    Ok(())
}
