use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// the GTFS files touched by a pathways reconciliation. the kind selects
/// which scoping and merge policy applies to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Stops,
    Pathways,
    Levels,
}

impl TableKind {
    /// the column that uniquely identifies a row of this kind.
    pub fn key_column(&self) -> &'static str {
        match self {
            TableKind::Stops => "stop_id",
            TableKind::Pathways => "pathway_id",
            TableKind::Levels => "level_id",
        }
    }

    /// columns that must exist in a source table of this kind before
    /// it can be scoped.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            TableKind::Stops => &["stop_id"],
            TableKind::Pathways => &["pathway_id", "from_stop_id", "to_stop_id"],
            TableKind::Levels => &["level_id"],
        }
    }

    /// file name of this table within a GTFS feed.
    pub fn filename(&self) -> &'static str {
        match self {
            TableKind::Stops => "stops.txt",
            TableKind::Pathways => "pathways.txt",
            TableKind::Levels => "levels.txt",
        }
    }

    /// stops are upserted into the target, pathways and levels replace it.
    pub fn is_secondary(&self) -> bool {
        !matches!(self, TableKind::Stops)
    }
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TableKind::Stops => "stops",
            TableKind::Pathways => "pathways",
            TableKind::Levels => "levels",
        };
        write!(f, "{s}")
    }
}
