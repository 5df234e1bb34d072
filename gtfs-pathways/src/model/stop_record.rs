use super::{gtfs_record::non_empty, GtfsRecord, TableKind};
use std::collections::HashMap;

/// a row of stops.txt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopRecord {
    pub stop_id: String,
    /// the enclosing station, or `None` for a root stop.
    pub parent_station: Option<String>,
    pub level_id: Option<String>,
    /// all other columns (stop_name, location_type, coordinates...)
    pub attributes: HashMap<String, String>,
}

impl StopRecord {
    pub const STOP_ID: &'static str = "stop_id";
    pub const PARENT_STATION: &'static str = "parent_station";
    pub const LEVEL_ID: &'static str = "level_id";
}

impl GtfsRecord for StopRecord {
    const KIND: TableKind = TableKind::Stops;

    fn key(&self) -> &str {
        &self.stop_id
    }

    fn get(&self, column: &str) -> Option<&str> {
        match column {
            Self::STOP_ID => Some(&self.stop_id),
            Self::PARENT_STATION => Some(self.parent_station.as_deref().unwrap_or_default()),
            Self::LEVEL_ID => Some(self.level_id.as_deref().unwrap_or_default()),
            _ => self.attributes.get(column).map(String::as_str),
        }
    }

    fn set(&mut self, column: &str, value: String) {
        match column {
            Self::STOP_ID => self.stop_id = value,
            Self::PARENT_STATION => self.parent_station = non_empty(value),
            Self::LEVEL_ID => self.level_id = non_empty(value),
            _ => {
                self.attributes.insert(column.to_string(), value);
            }
        }
    }
}
