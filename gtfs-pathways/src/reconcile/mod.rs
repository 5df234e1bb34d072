//! station-scoped reconciliation of stops, pathways and levels.
//!
//! the scope of a merge is the set of root stations plus every stop nested
//! beneath them. stops in scope are upserted into the target feed, while the
//! pathways and levels within scope replace the target's tables outright.
mod closure_ops;
mod merge_ops;
mod reconcile_config;
mod reconcile_error;
mod reconcile_ops;
mod reconcile_report;
mod reconcile_warning;
mod scope_ops;

pub use closure_ops::{find_parent_cycles, resolve_closure};
pub use merge_ops::{
    merge_upsert, replace_or_skip, union_columns, ColumnPolicy, MergeOutcome, SecondaryOutcome,
};
pub use reconcile_config::ReconcileConfig;
pub use reconcile_error::{DanglingEndpoint, ReconcileError};
pub use reconcile_ops::{reconcile, scope_feed, ReconcileOutput, ScopedFeed};
pub use reconcile_report::{ReconcileReport, TableAction, TableCounts, TableReport};
pub use reconcile_warning::ReconcileWarning;
pub use scope_ops::{
    extract_scoped, extract_scoped_levels, extract_scoped_pathways, extract_scoped_stops,
    ScopedTable,
};
