mod feed_tables;
mod gtfs_record;
mod level_record;
mod pathway_record;
mod stop_record;
mod table;
mod table_kind;

pub use feed_tables::FeedTables;
pub use gtfs_record::GtfsRecord;
pub use level_record::LevelRecord;
pub use pathway_record::PathwayRecord;
pub use stop_record::StopRecord;
pub use table::Table;
pub use table_kind::TableKind;
