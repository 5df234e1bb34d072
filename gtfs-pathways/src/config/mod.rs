mod pathways_merge_config;

pub use pathways_merge_config::{PathwaysMergeConfig, PathwaysSection};
