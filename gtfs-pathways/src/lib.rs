pub mod app;
pub mod config;
pub mod feed;
pub mod model;
pub mod reconcile;
