//! reading and writing the GTFS feeds on either side of a pathways merge.
//! a feed is an unzipped directory or a `.zip` archive of GTFS text files.
mod feed_error;
mod feed_location;
mod feed_reader;
mod feed_writer;

pub use feed_error::FeedError;
pub use feed_location::FeedLocation;
pub use feed_reader::{read_feed, read_table};
pub use feed_writer::{table_to_csv, write_feed};
