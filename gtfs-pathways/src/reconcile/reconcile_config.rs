use serde::{Deserialize, Serialize};

/// parameters of a single reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// parent stations whose sub-graph is carried over from the source feed.
    pub root_stop_ids: Vec<String>,
    /// a stops column that is always moved to the end of the merged schema.
    #[serde(default)]
    pub display_order_column: Option<String>,
    /// columns added (empty) to the merged stops schema when missing.
    #[serde(default)]
    pub ensure_stop_columns: Vec<String>,
    /// walk the parent_station chains in scope and warn on cycles.
    #[serde(default = "default_detect_parent_cycles")]
    pub detect_parent_cycles: bool,
}

fn default_detect_parent_cycles() -> bool {
    true
}

impl ReconcileConfig {
    pub fn new<I, S>(root_stop_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root_stop_ids: root_stop_ids.into_iter().map(Into::into).collect(),
            display_order_column: None,
            ensure_stop_columns: vec![],
            detect_parent_cycles: default_detect_parent_cycles(),
        }
    }

    pub fn with_display_order_column(mut self, column: &str) -> Self {
        self.display_order_column = Some(column.to_string());
        self
    }

    pub fn with_ensure_stop_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_stop_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}
