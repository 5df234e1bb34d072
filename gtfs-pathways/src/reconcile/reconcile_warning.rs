use crate::model::TableKind;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

/// non-fatal conditions found during a reconciliation. these are reported
/// back to the caller and never stop the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReconcileWarning {
    /// the source feed has no data for a secondary table, so the target's
    /// table was passed through untouched.
    NoSecondaryData { kind: TableKind },
    /// the root stops resolved to zero stops in the source feed.
    EmptyScope { root_stop_ids: Vec<String> },
    /// a configured root does not appear in the source stops table.
    UnknownRoot { stop_id: String },
    /// the parent_station chain of the listed stops loops back on itself.
    ParentCycle { stop_ids: Vec<String> },
}

impl Display for ReconcileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileWarning::NoSecondaryData { kind } => write!(
                f,
                "no {} data found in pathways source, target {} left unchanged",
                kind,
                kind.filename()
            ),
            ReconcileWarning::EmptyScope { root_stop_ids } => write!(
                f,
                "root stops [{}] matched no stops in the pathways source",
                root_stop_ids.join(", ")
            ),
            ReconcileWarning::UnknownRoot { stop_id } => {
                write!(f, "root stop '{stop_id}' not found in pathways source")
            }
            ReconcileWarning::ParentCycle { stop_ids } => write!(
                f,
                "parent_station cycle between stops: {}",
                stop_ids.iter().join(" -> ")
            ),
        }
    }
}
