use super::{
    reconcile_report::TableCounts, scope_ops::ScopedTable, ReconcileConfig, ReconcileError,
};
use crate::model::{GtfsRecord, Table};
use std::collections::{HashMap, HashSet};

/// schema rules applied when scoped rows are upserted into a target table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnPolicy<'a> {
    /// column that always ends up last, wherever it came from.
    pub display_order_column: Option<&'a str>,
    /// columns added to the merged schema even if neither side has them.
    pub ensure_columns: &'a [String],
}

impl<'a> From<&'a ReconcileConfig> for ColumnPolicy<'a> {
    fn from(config: &'a ReconcileConfig) -> Self {
        Self {
            display_order_column: config.display_order_column.as_deref(),
            ensure_columns: &config.ensure_stop_columns,
        }
    }
}

/// a merged table and the counts of what the merge did.
#[derive(Debug, Clone)]
pub struct MergeOutcome<R> {
    pub table: Table<R>,
    pub counts: TableCounts,
}

/// what became of a secondary table.
#[derive(Debug, Clone)]
pub enum SecondaryOutcome<R> {
    /// the source had no data, the target table stands as it was.
    Skipped,
    /// the scoped table is now the whole deliverable for this kind.
    Replaced(MergeOutcome<R>),
}

/// the merged schema: target columns in target order, then the ensured columns
/// and then scoped-only columns in the order they first appear. the display
/// ordering column, if present anywhere, is moved to the end.
pub fn union_columns(
    target_columns: &[String],
    scoped_columns: &[String],
    policy: &ColumnPolicy,
) -> Vec<String> {
    let mut columns = target_columns.to_vec();
    let mut seen: HashSet<String> = columns.iter().cloned().collect();
    for column in policy.ensure_columns.iter().chain(scoped_columns) {
        if seen.insert(column.clone()) {
            columns.push(column.clone());
        }
    }
    if let Some(last) = policy.display_order_column {
        if let Some(pos) = columns.iter().position(|c| c == last) {
            let column = columns.remove(pos);
            columns.push(column);
        }
    }
    columns
}

/// upserts the scoped rows into the target by key, building a new table.
///
/// for a key found in the target, every column of the scoped schema
/// overwrites the target value, empty values included; columns the scoped
/// schema lacks keep the target's value. unmatched keys are appended after
/// all target rows, in scoped order. target rows outside the scope are
/// copied unchanged.
pub fn merge_upsert<R: GtfsRecord>(
    target: &Table<R>,
    scoped: &Table<R>,
    policy: &ColumnPolicy,
) -> Result<MergeOutcome<R>, ReconcileError> {
    target.require_key_column()?;
    scoped.require_key_column()?;

    // schema union happens before any row is written
    let columns = union_columns(target.columns(), scoped.columns(), policy);

    let mut rows: Vec<R> = target.rows().to_vec();
    let mut positions: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        positions.entry(row.key().to_string()).or_default().push(idx);
    }

    let mut updated: HashSet<String> = HashSet::new();
    let mut appended: HashSet<String> = HashSet::new();
    for scoped_row in scoped.iter() {
        let key = scoped_row.key();
        match positions.get(key) {
            Some(matches) => {
                for &idx in matches {
                    for column in scoped.columns() {
                        let value = Table::value(scoped_row, column).to_string();
                        rows[idx].set(column, value);
                    }
                }
                if !appended.contains(key) {
                    updated.insert(key.to_string());
                }
            }
            None => {
                positions.insert(key.to_string(), vec![rows.len()]);
                appended.insert(key.to_string());
                rows.push(scoped_row.clone());
            }
        }
    }

    let table = Table::with_rows(columns, rows);
    let counts = TableCounts {
        examined: scoped.len(),
        updated: updated.len(),
        appended: appended.len(),
        total: table.len(),
    };
    Ok(MergeOutcome { table, counts })
}

/// secondary tables are never upserted: a present scoped table replaces the
/// target table (even when empty), and `NoData` leaves the target alone.
pub fn replace_or_skip<R: GtfsRecord>(
    target: Option<&Table<R>>,
    scoped: ScopedTable<R>,
) -> SecondaryOutcome<R> {
    match scoped {
        ScopedTable::NoData => SecondaryOutcome::Skipped,
        ScopedTable::Present(table) => {
            let prior: HashSet<&str> = target.map(|t| t.keys().collect()).unwrap_or_default();
            let updated = table.keys().filter(|k| prior.contains(k)).count();
            let counts = TableCounts {
                examined: table.len(),
                updated,
                appended: table.len() - updated,
                total: table.len(),
            };
            SecondaryOutcome::Replaced(MergeOutcome { table, counts })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LevelRecord, StopRecord};
    use itertools::Itertools;
    use proptest::prelude::*;

    fn no_policy() -> ColumnPolicy<'static> {
        ColumnPolicy::default()
    }

    fn values(table: &Table<StopRecord>, key: &str) -> Vec<String> {
        let row = table.find_by_key(key).unwrap();
        table
            .row_values(row)
            .into_iter()
            .map(String::from)
            .collect_vec()
    }

    #[test]
    fn test_new_scoped_column_is_added() {
        let target = Table::<StopRecord>::from_str_rows(&[
            &["stop_id", "stop_name"],
            &["S1", "Old Station"],
            &["Z1", "Elsewhere"],
        ])
        .unwrap();
        let scoped = Table::<StopRecord>::from_str_rows(&[
            &["stop_id", "stop_name", "level_id"],
            &["S1", "Station", "L1"],
            &["P1", "Platform", "L2"],
        ])
        .unwrap();
        let outcome = merge_upsert(&target, &scoped, &no_policy()).unwrap();
        let merged = &outcome.table;
        assert_eq!(merged.columns(), &["stop_id", "stop_name", "level_id"]);
        assert_eq!(values(merged, "S1"), vec!["S1", "Station", "L1"]);
        assert_eq!(values(merged, "Z1"), vec!["Z1", "Elsewhere", ""]);
        assert_eq!(values(merged, "P1"), vec!["P1", "Platform", "L2"]);
        assert_eq!(merged.keys().collect_vec(), vec!["S1", "Z1", "P1"]);
        assert_eq!(
            outcome.counts,
            TableCounts {
                examined: 2,
                updated: 1,
                appended: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_target_only_columns_are_kept() {
        let target = Table::<StopRecord>::from_str_rows(&[
            &["stop_id", "stop_name", "stop_url", "zone_id"],
            &["S1", "Old Station", "http://s1", "Z"],
        ])
        .unwrap();
        let scoped = Table::<StopRecord>::from_str_rows(&[
            &["stop_id", "stop_name", "zone_id"],
            &["S1", "Station", ""],
            &["P1", "Platform", "Z"],
        ])
        .unwrap();
        let merged = merge_upsert(&target, &scoped, &no_policy()).unwrap().table;
        assert_eq!(merged.columns(), target.columns());
        // explicit empty values overwrite, absent columns are preserved
        assert_eq!(values(&merged, "S1"), vec!["S1", "Station", "http://s1", ""]);
        assert_eq!(values(&merged, "P1"), vec!["P1", "Platform", "", "Z"]);
    }

    #[test]
    fn test_display_order_column_moves_last() {
        let policy_columns = vec![String::from("wheelchair_boarding")];
        let policy = ColumnPolicy {
            display_order_column: Some("tpis_name"),
            ensure_columns: &policy_columns,
        };
        let target = ["stop_id", "tpis_name", "stop_name"]
            .map(String::from)
            .to_vec();
        let scoped = ["stop_id", "level_id"].map(String::from).to_vec();
        assert_eq!(
            union_columns(&target, &scoped, &policy),
            vec![
                "stop_id",
                "stop_name",
                "wheelchair_boarding",
                "level_id",
                "tpis_name"
            ]
        );
        let scoped_display = ["stop_id", "tpis_name", "level_id"]
            .map(String::from)
            .to_vec();
        let target_plain = ["stop_id", "stop_name"].map(String::from).to_vec();
        assert_eq!(
            union_columns(&target_plain, &scoped_display, &policy),
            vec![
                "stop_id",
                "stop_name",
                "wheelchair_boarding",
                "level_id",
                "tpis_name"
            ]
        );
    }

    #[test]
    fn test_target_without_key_column_fails() {
        let target = Table::<StopRecord>::new(vec![String::from("stop_name")]);
        let scoped = Table::<StopRecord>::from_str_rows(&[&["stop_id"], &["S1"]]).unwrap();
        let result = merge_upsert(&target, &scoped, &no_policy());
        assert!(matches!(
            result,
            Err(ReconcileError::MissingKeyColumn { .. })
        ));
    }

    #[test]
    fn test_replace_or_skip() {
        let target = Table::<LevelRecord>::from_str_rows(&[
            &["level_id", "level_index"],
            &["L1", "0"],
            &["L9", "3"],
        ])
        .unwrap();
        let scoped = Table::<LevelRecord>::from_str_rows(&[
            &["level_id", "level_index", "level_name"],
            &["L1", "1", "Street"],
            &["L2", "-1", "Platform"],
        ])
        .unwrap();

        match replace_or_skip(Some(&target), ScopedTable::Present(scoped.clone())) {
            SecondaryOutcome::Replaced(outcome) => {
                assert_eq!(outcome.table, scoped);
                assert_eq!(outcome.counts.updated, 1);
                assert_eq!(outcome.counts.appended, 1);
                assert_eq!(outcome.counts.total, 2);
            }
            SecondaryOutcome::Skipped => panic!("expected replacement"),
        }
        assert!(matches!(
            replace_or_skip(Some(&target), ScopedTable::NoData),
            SecondaryOutcome::Skipped
        ));
        let empty = Table::<LevelRecord>::new(vec![String::from("level_id")]);
        match replace_or_skip(Some(&target), ScopedTable::Present(empty)) {
            SecondaryOutcome::Replaced(outcome) => assert!(outcome.table.is_empty()),
            SecondaryOutcome::Skipped => panic!("empty scoped levels must replace the target"),
        }
    }

    fn arb_stop_table(
        columns: &'static [&'static str],
        keys: std::ops::Range<usize>,
    ) -> impl Strategy<Value = Table<StopRecord>> {
        prop::collection::btree_map(
            keys,
            prop::collection::vec("[a-z]{0,3}", columns.len() - 1),
            0..8,
        )
        .prop_map(move |rows| {
            let header = columns.iter().map(|c| c.to_string()).collect_vec();
            let body = rows
                .into_iter()
                .map(|(key, vals)| {
                    std::iter::once(format!("s{key}"))
                        .chain(vals)
                        .collect_vec()
                })
                .collect_vec();
            Table::from_string_rows(header, body).unwrap()
        })
    }

    proptest! {
        #[test]
        fn merge_keeps_untouched_rows_and_columns(
            target in arb_stop_table(&["stop_id", "stop_name", "stop_url"], 0..10),
            scoped in arb_stop_table(&["stop_id", "stop_name", "level_id"], 5..15),
        ) {
            let merged = merge_upsert(&target, &scoped, &ColumnPolicy::default()).unwrap().table;
            for column in target.columns() {
                prop_assert!(merged.has_column(column));
            }
            let scoped_keys: HashSet<&str> = scoped.keys().collect();
            for row in target.iter().filter(|r| !scoped_keys.contains(r.key())) {
                let merged_row = merged.find_by_key(row.key()).unwrap();
                prop_assert_eq!(merged_row, row);
                for column in target.columns() {
                    prop_assert_eq!(Table::value(merged_row, column), Table::value(row, column));
                }
            }
        }

        #[test]
        fn merge_overwrites_scoped_columns(
            target in arb_stop_table(&["stop_id", "stop_name", "stop_url"], 0..10),
            scoped in arb_stop_table(&["stop_id", "stop_name", "level_id"], 5..15),
        ) {
            let merged = merge_upsert(&target, &scoped, &ColumnPolicy::default()).unwrap().table;
            prop_assert_eq!(merged.len(), target.keys().chain(scoped.keys()).unique().count());
            for row in scoped.iter() {
                let merged_row = merged.find_by_key(row.key()).unwrap();
                for column in scoped.columns() {
                    prop_assert_eq!(Table::value(merged_row, column), Table::value(row, column));
                }
                if let Some(prior) = target.find_by_key(row.key()) {
                    prop_assert_eq!(Table::value(merged_row, "stop_url"), Table::value(prior, "stop_url"));
                }
            }
        }
    }
}
