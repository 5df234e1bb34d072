use super::{GtfsRecord, TableKind};
use std::collections::HashMap;

/// a row of pathways.txt, a walkable connection between two stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathwayRecord {
    pub pathway_id: String,
    pub from_stop_id: String,
    pub to_stop_id: String,
    /// pathway_mode, is_bidirectional, traversal_time...
    pub attributes: HashMap<String, String>,
}

impl PathwayRecord {
    pub const PATHWAY_ID: &'static str = "pathway_id";
    pub const FROM_STOP_ID: &'static str = "from_stop_id";
    pub const TO_STOP_ID: &'static str = "to_stop_id";
}

impl GtfsRecord for PathwayRecord {
    const KIND: TableKind = TableKind::Pathways;

    fn key(&self) -> &str {
        &self.pathway_id
    }

    fn get(&self, column: &str) -> Option<&str> {
        match column {
            Self::PATHWAY_ID => Some(&self.pathway_id),
            Self::FROM_STOP_ID => Some(&self.from_stop_id),
            Self::TO_STOP_ID => Some(&self.to_stop_id),
            _ => self.attributes.get(column).map(String::as_str),
        }
    }

    fn set(&mut self, column: &str, value: String) {
        match column {
            Self::PATHWAY_ID => self.pathway_id = value,
            Self::FROM_STOP_ID => self.from_stop_id = value,
            Self::TO_STOP_ID => self.to_stop_id = value,
            _ => {
                self.attributes.insert(column.to_string(), value);
            }
        }
    }
}
