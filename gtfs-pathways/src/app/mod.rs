mod merge_run;
mod pathways_app;
mod pathways_app_error;
mod scope_run;

pub use pathways_app::{PathwaysApp, PathwaysOperation};
pub use pathways_app_error::PathwaysAppError;
