use super::{merge_run, scope_run, PathwaysAppError};
use crate::{config::PathwaysMergeConfig, feed::FeedLocation, reconcile::ReconcileConfig};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// command line tool that carries station pathways, levels and stops from
/// one GTFS feed into another
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct PathwaysApp {
    /// select the pathways operation to run
    #[command(subcommand)]
    pub op: PathwaysOperation,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum PathwaysOperation {
    /// lists the stops, pathways and levels of a feed that fall under the
    /// root stations. nothing is written.
    Scope {
        /// GTFS feed with the pathways data, a directory or .zip archive
        #[arg(long)]
        pathways_source: String,
        /// TOML or JSON file with a [pathways] section
        #[arg(long)]
        config: Option<String>,
        /// root station stop_id. replaces the configured included_stops,
        /// may be repeated.
        #[arg(long = "root-stop")]
        root_stops: Vec<String>,
    },
    /// merges the station pathways sub-graph of one feed into another.
    Merge {
        /// GTFS feed with the pathways data, a directory or .zip archive
        #[arg(long)]
        pathways_source: String,
        /// GTFS feed receiving the pathways data, a directory or .zip archive
        #[arg(long)]
        gtfs_target: String,
        /// where to write the merged feed. defaults to replacing the target.
        #[arg(long)]
        output: Option<String>,
        /// TOML or JSON file with a [pathways] section
        #[arg(long)]
        config: Option<String>,
        /// root station stop_id. replaces the configured included_stops,
        /// may be repeated.
        #[arg(long = "root-stop")]
        root_stops: Vec<String>,
        /// write the merge report to this JSON file
        #[arg(long)]
        report_file: Option<String>,
        /// run and report the merge without writing any feed
        #[arg(long)]
        dry_run: bool,
    },
}

impl PathwaysOperation {
    pub fn run(&self) -> Result<(), PathwaysAppError> {
        match self {
            PathwaysOperation::Scope {
                pathways_source,
                config,
                root_stops,
            } => {
                let config = load_config(config.as_deref(), root_stops)?;
                scope_run::run(&FeedLocation::from_path(pathways_source), &config)
            }
            PathwaysOperation::Merge {
                pathways_source,
                gtfs_target,
                output,
                config,
                root_stops,
                report_file,
                dry_run,
            } => {
                let config = load_config(config.as_deref(), root_stops)?;
                let target = FeedLocation::from_path(gtfs_target).resolve()?;
                let output = match output {
                    Some(output) => FeedLocation::from_path(output).resolve()?,
                    None => target.clone(),
                };
                merge_run::run(
                    &FeedLocation::from_path(pathways_source),
                    &target,
                    &output,
                    &config,
                    report_file.as_deref().map(Path::new),
                    *dry_run,
                )
            }
        }
    }
}

/// reads the config file when one is given, then applies command line roots.
fn load_config(
    config_file: Option<&str>,
    root_stops: &[String],
) -> Result<ReconcileConfig, PathwaysAppError> {
    let file_config = match config_file {
        Some(f) => PathwaysMergeConfig::try_from(Path::new(f))?,
        None => PathwaysMergeConfig::default(),
    };
    file_config.into_reconcile_config(root_stops)
}
