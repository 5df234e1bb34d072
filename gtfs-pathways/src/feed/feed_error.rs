use crate::{model::TableKind, reconcile::ReconcileError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("GTFS feed not found: {0}")]
    MissingFeed(String),
    #[error("GTFS feed {location} has no {filename}")]
    MissingRequiredFile { location: String, filename: String },
    #[error("failure reading or writing {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },
    #[error("failure parsing {path}: {source}")]
    CsvError { path: String, source: csv::Error },
    #[error("failure accessing zip archive {path}: {source}")]
    ZipError {
        path: String,
        source: zip::result::ZipError,
    },
    #[error("invalid {kind} table in {location}: {source}")]
    InvalidTable {
        location: String,
        kind: TableKind,
        source: ReconcileError,
    },
    #[error("failure writing GTFS feed: {0}")]
    WriteError(String),
}
