use super::{
    closure_ops::{find_parent_cycles, resolve_closure},
    merge_ops::{merge_upsert, replace_or_skip, ColumnPolicy, SecondaryOutcome},
    reconcile_error::DanglingEndpoint,
    scope_ops::{extract_scoped_levels, extract_scoped_pathways, extract_scoped_stops, ScopedTable},
    ReconcileConfig, ReconcileError, ReconcileReport, ReconcileWarning, TableAction, TableCounts,
    TableReport,
};
use crate::model::{
    FeedTables, GtfsRecord, LevelRecord, PathwayRecord, StopRecord, Table, TableKind,
};
use std::collections::HashSet;

/// the in-scope slice of a source feed.
#[derive(Debug, Clone)]
pub struct ScopedFeed {
    /// the resolved closure, including roots absent from the stops table.
    pub scope: HashSet<String>,
    pub stops: Table<StopRecord>,
    pub pathways: ScopedTable<PathwayRecord>,
    pub levels: ScopedTable<LevelRecord>,
    pub warnings: Vec<ReconcileWarning>,
}

/// the tables that result from a reconciliation along with its report.
/// secondary tables that were skipped are the target's tables, unchanged.
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    pub tables: FeedTables,
    pub report: ReconcileReport,
}

/// resolves the closure of the configured roots over the source stops and
/// extracts the stops, pathways and levels within it. nothing is merged.
pub fn scope_feed(
    source: &FeedTables,
    config: &ReconcileConfig,
) -> Result<ScopedFeed, ReconcileError> {
    source.stops.require_columns()?;
    if let Some(pathways) = &source.pathways {
        pathways.require_columns()?;
    }
    if let Some(levels) = &source.levels {
        levels.require_columns()?;
    }

    let mut warnings = vec![];
    for root in config.root_stop_ids.iter() {
        if source.stops.find_by_key(root).is_none() {
            warnings.push(ReconcileWarning::UnknownRoot {
                stop_id: root.clone(),
            });
        }
    }

    let scope = resolve_closure(&config.root_stop_ids, &source.stops);
    if config.detect_parent_cycles {
        for stop_ids in find_parent_cycles(&source.stops, &scope) {
            warnings.push(ReconcileWarning::ParentCycle { stop_ids });
        }
    }

    let stops = extract_scoped_stops(&source.stops, &scope);
    if stops.is_empty() {
        warnings.push(ReconcileWarning::EmptyScope {
            root_stop_ids: config.root_stop_ids.clone(),
        });
    }
    let pathways = extract_scoped_pathways(source.pathways.as_ref(), &scope);
    let levels = extract_scoped_levels(source.levels.as_ref(), &stops);

    log::info!(
        "found {} stops in scope (out of {} total)",
        stops.len(),
        source.stops.len()
    );
    if let (Some(scoped), Some(all)) = (pathways.as_table(), &source.pathways) {
        log::info!(
            "found {} pathways in scope (out of {} total)",
            scoped.len(),
            all.len()
        );
    }
    if let (Some(scoped), Some(all)) = (levels.as_table(), &source.levels) {
        log::info!(
            "found {} levels in scope (out of {} total)",
            scoped.len(),
            all.len()
        );
    }

    Ok(ScopedFeed {
        scope,
        stops,
        pathways,
        levels,
        warnings,
    })
}

/// merges the station-scoped sub-graph of `source` into `target`.
///
/// stops in scope are upserted into the target stops table. pathways and
/// levels in scope replace the target's tables, unless the source had no such
/// data, in which case the target's table is kept and a warning is reported.
/// fails without producing any tables if the target stops table has no
/// stop_id column, or if a scoped pathway touches a stop that is missing
/// after the stops merge.
pub fn reconcile(
    source: &FeedTables,
    target: &FeedTables,
    config: &ReconcileConfig,
) -> Result<ReconcileOutput, ReconcileError> {
    target.stops.require_key_column()?;
    let ScopedFeed {
        scope,
        stops: scoped_stops,
        pathways: scoped_pathways,
        levels: scoped_levels,
        mut warnings,
    } = scope_feed(source, config)?;

    let policy = ColumnPolicy::from(config);
    let stops = merge_upsert(&target.stops, &scoped_stops, &policy)?;

    if let Some(pathways) = scoped_pathways.as_table() {
        check_pathway_endpoints(pathways, &stops.table)?;
    }

    let mut tables = vec![TableReport {
        kind: TableKind::Stops,
        action: TableAction::Upserted,
        counts: stops.counts,
    }];
    let (pathways, pathways_report) = finish_secondary(target.pathways.as_ref(), scoped_pathways);
    let (levels, levels_report) = finish_secondary(target.levels.as_ref(), scoped_levels);
    for report in [pathways_report, levels_report] {
        if report.action == TableAction::Skipped {
            warnings.push(ReconcileWarning::NoSecondaryData { kind: report.kind });
        }
        tables.push(report);
    }

    for warning in warnings.iter() {
        log::warn!("{warning}");
    }

    let report = ReconcileReport {
        run_at: chrono::Utc::now().to_rfc3339(),
        root_stop_ids: config.root_stop_ids.clone(),
        scope_size: scope.len(),
        tables,
        warnings,
    };
    Ok(ReconcileOutput {
        tables: FeedTables::new(stops.table, pathways, levels),
        report,
    })
}

/// every endpoint of every scoped pathway must name a merged stop.
fn check_pathway_endpoints(
    pathways: &Table<PathwayRecord>,
    merged_stops: &Table<StopRecord>,
) -> Result<(), ReconcileError> {
    let stop_ids: HashSet<&str> = merged_stops.keys().collect();
    let mut references = vec![];
    for pathway in pathways.iter() {
        for stop_id in [&pathway.from_stop_id, &pathway.to_stop_id] {
            if !stop_ids.contains(stop_id.as_str()) {
                references.push(DanglingEndpoint {
                    pathway_id: pathway.pathway_id.clone(),
                    stop_id: stop_id.clone(),
                });
            }
        }
    }
    if references.is_empty() {
        Ok(())
    } else {
        Err(ReconcileError::DanglingReference { references })
    }
}

fn finish_secondary<R: GtfsRecord>(
    target: Option<&Table<R>>,
    scoped: ScopedTable<R>,
) -> (Option<Table<R>>, TableReport) {
    match replace_or_skip(target, scoped) {
        SecondaryOutcome::Skipped => {
            let counts = TableCounts {
                total: target.map(|t| t.len()).unwrap_or_default(),
                ..Default::default()
            };
            let report = TableReport {
                kind: R::KIND,
                action: TableAction::Skipped,
                counts,
            };
            (target.cloned(), report)
        }
        SecondaryOutcome::Replaced(outcome) => {
            let report = TableReport {
                kind: R::KIND,
                action: TableAction::Replaced,
                counts: outcome.counts,
            };
            (Some(outcome.table), report)
        }
    }
}
