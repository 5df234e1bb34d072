use crate::model::TableKind;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

#[derive(thiserror::Error, Debug)]
pub enum ReconcileError {
    #[error("{kind} table is missing key column '{column}'")]
    MissingKeyColumn { kind: TableKind, column: String },
    #[error("{kind} table is missing required column '{column}'")]
    MissingColumn { kind: TableKind, column: String },
    #[error("{kind} row {row} has {found} values but the header has {expected} columns")]
    MalformedRow {
        kind: TableKind,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "{} scoped pathway endpoint(s) reference stops missing from the merged stops table: {}",
        .references.len(),
        .references.iter().join(", ")
    )]
    DanglingReference { references: Vec<DanglingEndpoint> },
}

/// a pathway endpoint that names a stop not present after merging stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingEndpoint {
    pub pathway_id: String,
    pub stop_id: String,
}

impl Display for DanglingEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.pathway_id, self.stop_id)
    }
}
