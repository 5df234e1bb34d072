use crate::{app::PathwaysAppError, reconcile::ReconcileConfig};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// prefix for environment variables that override file settings, for example
/// `GTFS_PATHWAYS_PATHWAYS__INCLUDED_STOPS=place-north,place-sstat`.
pub const ENV_PREFIX: &str = "GTFS_PATHWAYS";

/// feed metadata file describing which stations a pathways merge carries.
/// other tables in the file (download permalinks and so on) are ignored.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct PathwaysMergeConfig {
    #[serde(default)]
    pub pathways: PathwaysSection,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct PathwaysSection {
    /// parent station stop_ids whose sub-graph is merged
    #[serde(default)]
    pub included_stops: Vec<String>,
    #[serde(default)]
    pub display_order_column: Option<String>,
    #[serde(default)]
    pub ensure_stop_columns: Vec<String>,
    #[serde(default = "default_detect_parent_cycles")]
    pub detect_parent_cycles: bool,
}

fn default_detect_parent_cycles() -> bool {
    true
}

impl Default for PathwaysSection {
    fn default() -> Self {
        Self {
            included_stops: vec![],
            display_order_column: None,
            ensure_stop_columns: vec![],
            detect_parent_cycles: default_detect_parent_cycles(),
        }
    }
}

impl PathwaysMergeConfig {
    /// builds the run configuration. roots given on the command line take the
    /// place of `included_stops`; one of the two must name at least one stop.
    pub fn into_reconcile_config(
        self,
        root_overrides: &[String],
    ) -> Result<ReconcileConfig, PathwaysAppError> {
        let section = self.pathways;
        let roots = if root_overrides.is_empty() {
            section.included_stops
        } else {
            root_overrides.to_vec()
        };
        if roots.is_empty() {
            return Err(PathwaysAppError::ConfigurationError(String::from(
                "no root stops given, set [pathways] included_stops or pass --root-stop",
            )));
        }
        Ok(ReconcileConfig {
            root_stop_ids: roots,
            display_order_column: section.display_order_column,
            ensure_stop_columns: section.ensure_stop_columns,
            detect_parent_cycles: section.detect_parent_cycles,
        })
    }
}

impl TryFrom<&Path> for PathwaysMergeConfig {
    type Error = PathwaysAppError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let f = path.to_str().ok_or_else(|| {
            PathwaysAppError::ConfigurationError(format!("invalid path: {}", path.display()))
        })?;
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => FileFormat::Toml,
            Some("json") => FileFormat::Json,
            _ => {
                return Err(PathwaysAppError::ConfigurationError(format!(
                    "unsupported file type: {f}"
                )))
            }
        };
        let conf = Config::builder()
            .add_source(File::new(f, format).required(true))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("pathways.included_stops")
                    .with_list_parse_key("pathways.ensure_stop_columns"),
            )
            .build()
            .map_err(|e| PathwaysAppError::ConfigurationError(format!("failure reading {f}: {e}")))?;
        conf.try_deserialize().map_err(|e| {
            PathwaysAppError::ConfigurationError(format!("failure decoding {f}: {e}"))
        })
    }
}
