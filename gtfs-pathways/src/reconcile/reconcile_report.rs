use super::ReconcileWarning;
use crate::model::TableKind;
use serde::Serialize;
use std::fmt::Display;

/// row counts for one table of a reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// scoped rows considered for this table.
    pub examined: usize,
    /// scoped rows whose key already existed in the target.
    pub updated: usize,
    /// scoped rows whose key was new to the target.
    pub appended: usize,
    /// rows in the resulting table.
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableAction {
    Upserted,
    Replaced,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub kind: TableKind,
    pub action: TableAction,
    #[serde(flatten)]
    pub counts: TableCounts,
}

impl Display for TableReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filename = self.kind.filename();
        let c = &self.counts;
        match self.action {
            TableAction::Upserted => write!(
                f,
                "{filename} - examined {} rows, updated {}, appended {}, wrote {} total rows.",
                c.examined, c.updated, c.appended, c.total
            ),
            TableAction::Replaced => write!(
                f,
                "{filename} - wrote {} rows ({} replaced, {} new).",
                c.total, c.updated, c.appended
            ),
            TableAction::Skipped => write!(f, "{filename} - no source data; skipped."),
        }
    }
}

/// the structured result of a reconciliation run, handed to the caller for
/// rendering or logging.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// RFC 3339 timestamp of the run.
    pub run_at: String,
    pub root_stop_ids: Vec<String>,
    /// number of stop ids in the resolved closure, roots included.
    pub scope_size: usize,
    pub tables: Vec<TableReport>,
    pub warnings: Vec<ReconcileWarning>,
}

impl ReconcileReport {
    pub fn table(&self, kind: TableKind) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.kind == kind)
    }

    /// true if the run replaced or upserted the given table.
    pub fn is_written(&self, kind: TableKind) -> bool {
        self.table(kind)
            .map(|t| t.action != TableAction::Skipped)
            .unwrap_or_default()
    }
}
