use super::{GtfsRecord, TableKind};
use std::collections::HashMap;

/// a row of levels.txt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelRecord {
    pub level_id: String,
    pub attributes: HashMap<String, String>,
}

impl LevelRecord {
    pub const LEVEL_ID: &'static str = "level_id";
}

impl GtfsRecord for LevelRecord {
    const KIND: TableKind = TableKind::Levels;

    fn key(&self) -> &str {
        &self.level_id
    }

    fn get(&self, column: &str) -> Option<&str> {
        match column {
            Self::LEVEL_ID => Some(&self.level_id),
            _ => self.attributes.get(column).map(String::as_str),
        }
    }

    fn set(&mut self, column: &str, value: String) {
        match column {
            Self::LEVEL_ID => self.level_id = value,
            _ => {
                self.attributes.insert(column.to_string(), value);
            }
        }
    }
}
