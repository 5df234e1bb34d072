use super::{LevelRecord, PathwayRecord, StopRecord, Table};

/// the three tables of a GTFS feed that take part in a pathways
/// reconciliation. secondary tables are `None` when the feed has no such file.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedTables {
    pub stops: Table<StopRecord>,
    pub pathways: Option<Table<PathwayRecord>>,
    pub levels: Option<Table<LevelRecord>>,
}

impl FeedTables {
    pub fn new(
        stops: Table<StopRecord>,
        pathways: Option<Table<PathwayRecord>>,
        levels: Option<Table<LevelRecord>>,
    ) -> Self {
        Self {
            stops,
            pathways,
            levels,
        }
    }
}
