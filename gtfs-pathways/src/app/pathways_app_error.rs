use crate::{feed::FeedError, reconcile::ReconcileError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathwaysAppError {
    #[error("failure reading run configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reconciling pathways: {source}")]
    ReconcileError {
        #[from]
        source: ReconcileError,
    },
    #[error(transparent)]
    FeedError {
        #[from]
        source: FeedError,
    },
    #[error("failure writing report: {source}")]
    StdIoError {
        #[from]
        source: std::io::Error,
    },
    #[error("failure encoding JSON: {source}")]
    SerdeJsonError {
        #[from]
        source: serde_json::Error,
    },
}
