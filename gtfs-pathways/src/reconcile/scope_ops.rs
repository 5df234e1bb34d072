use crate::model::{GtfsRecord, LevelRecord, PathwayRecord, StopRecord, Table};
use std::collections::HashSet;

/// the result of scoping a secondary table. `NoData` means the source feed
/// had nothing to scope, which is different from a table that is empty after
/// filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopedTable<R> {
    NoData,
    Present(Table<R>),
}

impl<R: GtfsRecord> ScopedTable<R> {
    pub fn as_table(&self) -> Option<&Table<R>> {
        match self {
            ScopedTable::NoData => None,
            ScopedTable::Present(table) => Some(table),
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ScopedTable::NoData)
    }
}

/// copies the schema of a table along with the rows accepted by `in_scope`.
pub fn extract_scoped<R, F>(table: &Table<R>, in_scope: F) -> Table<R>
where
    R: GtfsRecord,
    F: Fn(&R) -> bool,
{
    let rows = table.iter().filter(|r| in_scope(r)).cloned().collect();
    Table::with_rows(table.columns().to_vec(), rows)
}

/// stops whose stop_id is in scope.
pub fn extract_scoped_stops(
    stops: &Table<StopRecord>,
    scope: &HashSet<String>,
) -> Table<StopRecord> {
    extract_scoped(stops, |stop| scope.contains(&stop.stop_id))
}

/// pathways with both endpoints in scope. a pathway leaving the scope is
/// dropped entirely.
pub fn extract_scoped_pathways(
    pathways: Option<&Table<PathwayRecord>>,
    scope: &HashSet<String>,
) -> ScopedTable<PathwayRecord> {
    match pathways {
        Some(table) if !table.is_empty() => ScopedTable::Present(extract_scoped(table, |p| {
            scope.contains(&p.from_stop_id) && scope.contains(&p.to_stop_id)
        })),
        _ => ScopedTable::NoData,
    }
}

/// levels referenced by the scoped stops. levels are scoped through the
/// stops that sit on them, never directly through the roots.
pub fn extract_scoped_levels(
    levels: Option<&Table<LevelRecord>>,
    scoped_stops: &Table<StopRecord>,
) -> ScopedTable<LevelRecord> {
    match levels {
        Some(table) if !table.is_empty() => {
            let level_ids: HashSet<&str> = scoped_stops
                .iter()
                .filter_map(|s| s.level_id.as_deref())
                .collect();
            ScopedTable::Present(extract_scoped(table, |l| {
                level_ids.contains(l.level_id.as_str())
            }))
        }
        _ => ScopedTable::NoData,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GtfsRecord;
    use proptest::prelude::*;

    fn scope(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pathways_need_both_endpoints() {
        let pathways = Table::<PathwayRecord>::from_str_rows(&[
            &["pathway_id", "from_stop_id", "to_stop_id", "pathway_mode"],
            &["pw1", "P1", "P2", "1"],
            &["pw2", "P1", "X9", "2"],
            &["pw3", "X9", "P2", "2"],
        ])
        .unwrap();
        let scoped = extract_scoped_pathways(Some(&pathways), &scope(&["S1", "P1", "P2"]));
        let table = scoped.as_table().unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["pw1"]);
        assert_eq!(table.columns(), pathways.columns());
    }

    #[test]
    fn test_pathways_empty_after_filtering_is_present() {
        let pathways = Table::<PathwayRecord>::from_str_rows(&[
            &["pathway_id", "from_stop_id", "to_stop_id"],
            &["pw2", "P1", "X9"],
        ])
        .unwrap();
        let scoped = extract_scoped_pathways(Some(&pathways), &scope(&["P1"]));
        assert!(matches!(scoped, ScopedTable::Present(ref t) if t.is_empty()));
    }

    #[test]
    fn test_absent_or_empty_source_is_no_data() {
        let empty =
            Table::<PathwayRecord>::from_str_rows(&[&["pathway_id", "from_stop_id", "to_stop_id"]])
                .unwrap();
        assert!(extract_scoped_pathways(None, &scope(&["P1"])).is_no_data());
        assert!(extract_scoped_pathways(Some(&empty), &scope(&["P1"])).is_no_data());
        assert!(extract_scoped_levels(None, &Table::new(vec!["stop_id".into()])).is_no_data());
    }

    #[test]
    fn test_levels_follow_scoped_stops() {
        let stops = Table::<StopRecord>::from_str_rows(&[
            &["stop_id", "parent_station", "level_id"],
            &["S1", "", ""],
            &["P1", "S1", "L1"],
            &["P2", "P1", "L2"],
            &["Q1", "S2", "L3"],
        ])
        .unwrap();
        let levels = Table::<LevelRecord>::from_str_rows(&[
            &["level_id", "level_index", "level_name"],
            &["L1", "0", "Street"],
            &["L2", "-1", "Mezzanine"],
            &["L3", "-2", "Platform"],
        ])
        .unwrap();
        let scoped_stops = extract_scoped_stops(&stops, &scope(&["S1", "P1", "P2"]));
        assert_eq!(scoped_stops.len(), 3);
        let scoped = extract_scoped_levels(Some(&levels), &scoped_stops);
        let table = scoped.as_table().unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["L1", "L2"]);
    }

    fn pathway(idx: usize, from: usize, to: usize) -> PathwayRecord {
        PathwayRecord::from_fields([
            ("pathway_id", format!("pw{idx}")),
            ("from_stop_id", format!("s{from}")),
            ("to_stop_id", format!("s{to}")),
        ])
    }

    proptest! {
        #[test]
        fn pathway_scoping_is_conjunctive(
            endpoints in prop::collection::vec((0usize..10, 0usize..10), 1..20),
            in_scope in prop::collection::hash_set(0usize..10, 0..10),
        ) {
            let mut table = Table::new(vec![
                "pathway_id".into(),
                "from_stop_id".into(),
                "to_stop_id".into(),
            ]);
            for (idx, (from, to)) in endpoints.iter().enumerate() {
                table.push(pathway(idx, *from, *to));
            }
            let scope: HashSet<String> = in_scope.iter().map(|s| format!("s{s}")).collect();
            let scoped = extract_scoped_pathways(Some(&table), &scope);
            let scoped = scoped.as_table().unwrap();
            for (idx, (from, to)) in endpoints.iter().enumerate() {
                let expected = in_scope.contains(from) && in_scope.contains(to);
                let found = scoped.find_by_key(&format!("pw{idx}")).is_some();
                prop_assert_eq!(expected, found);
            }
        }
    }
}
