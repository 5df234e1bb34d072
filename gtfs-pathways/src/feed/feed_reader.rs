use super::{FeedError, FeedLocation};
use crate::model::{FeedTables, GtfsRecord, StopRecord, Table, TableKind};
use csv::ReaderBuilder;
use itertools::Itertools;
use kdam::tqdm;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use zip::ZipArchive;

/// reads the stops, pathways and levels tables of a GTFS feed. stops.txt
/// is required, the other two are optional and read as `None` when the
/// feed does not carry them.
pub fn read_feed(location: &FeedLocation) -> Result<FeedTables, FeedError> {
    if !location.exists() {
        return Err(FeedError::MissingFeed(location.to_string()));
    }
    log::info!("reading GTFS feed {location}");
    let tables = match location {
        FeedLocation::Directory(dir) => FeedTables {
            stops: required(read_from_dir(dir, location)?, location)?,
            pathways: read_from_dir(dir, location)?,
            levels: read_from_dir(dir, location)?,
        },
        FeedLocation::Archive(path) => {
            let file = File::open(path).map_err(|source| FeedError::IoError {
                path: location.to_string(),
                source,
            })?;
            let mut archive = ZipArchive::new(file).map_err(|source| FeedError::ZipError {
                path: location.to_string(),
                source,
            })?;
            let entries = archive_entries(&mut archive, location)?;
            FeedTables {
                stops: required(read_from_archive(&mut archive, &entries, location)?, location)?,
                pathways: read_from_archive(&mut archive, &entries, location)?,
                levels: read_from_archive(&mut archive, &entries, location)?,
            }
        }
    };
    log::info!(
        "read {} stops, {} pathways, {} levels from {location}",
        tables.stops.len(),
        count(tables.pathways.as_ref()),
        count(tables.levels.as_ref())
    );
    Ok(tables)
}

/// reads one GTFS table from delimited text. the header row is the schema of
/// the table; rows shorter than the header are padded.
pub fn read_table<R, Rd>(reader: Rd, location: &FeedLocation) -> Result<Table<R>, FeedError>
where
    R: GtfsRecord,
    Rd: Read,
{
    let (reader, columns) = open_table::<R, Rd>(reader, location)?;
    collect_table(reader, columns, location)
}

/// reads a table found in a feed. a pathways or levels file without a header
/// row carries no data and reads as `None`, the same as a missing file.
fn read_optional_table<R, Rd>(
    reader: Rd,
    location: &FeedLocation,
) -> Result<Option<Table<R>>, FeedError>
where
    R: GtfsRecord,
    Rd: Read,
{
    let (reader, columns) = open_table::<R, Rd>(reader, location)?;
    if R::KIND.is_secondary() && columns.iter().all(|c| c.is_empty()) {
        log::warn!(
            "{location} has an empty {}, reading it as absent",
            R::KIND.filename()
        );
        return Ok(None);
    }
    collect_table(reader, columns, location).map(Some)
}

fn open_table<R, Rd>(
    reader: Rd,
    location: &FeedLocation,
) -> Result<(csv::Reader<Rd>, Vec<String>), FeedError>
where
    R: GtfsRecord,
    Rd: Read,
{
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = reader
        .headers()
        .map_err(|source| FeedError::CsvError {
            path: format!("{}:{}", location, R::KIND.filename()),
            source,
        })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect_vec();
    Ok((reader, columns))
}

fn collect_table<R, Rd>(
    reader: csv::Reader<Rd>,
    columns: Vec<String>,
    location: &FeedLocation,
) -> Result<Table<R>, FeedError>
where
    R: GtfsRecord,
    Rd: Read,
{
    let path = format!("{}:{}", location, R::KIND.filename());
    let row_iter = tqdm!(
        reader.into_records(),
        desc = format!("reading {}", R::KIND.filename())
    );
    let mut rows = vec![];
    for record in row_iter {
        let record = record.map_err(|source| FeedError::CsvError {
            path: path.clone(),
            source,
        })?;
        rows.push(record.iter().map(String::from).collect_vec());
    }
    eprintln!();

    Table::from_string_rows(columns, rows).map_err(|source| FeedError::InvalidTable {
        location: location.to_string(),
        kind: R::KIND,
        source,
    })
}

fn required(
    stops: Option<Table<StopRecord>>,
    location: &FeedLocation,
) -> Result<Table<StopRecord>, FeedError> {
    stops.ok_or_else(|| FeedError::MissingRequiredFile {
        location: location.to_string(),
        filename: TableKind::Stops.filename().to_string(),
    })
}

fn count<R: GtfsRecord>(table: Option<&Table<R>>) -> usize {
    table.map(|t| t.len()).unwrap_or_default()
}

fn read_from_dir<R: GtfsRecord>(
    dir: &Path,
    location: &FeedLocation,
) -> Result<Option<Table<R>>, FeedError> {
    let path = dir.join(R::KIND.filename());
    if !path.is_file() {
        log::debug!("{location} has no {}", R::KIND.filename());
        return Ok(None);
    }
    let file = File::open(&path).map_err(|source| FeedError::IoError {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    read_optional_table(file, location)
}

/// maps GTFS file names to entry indices. feeds are sometimes zipped with
/// an enclosing folder, so entries are matched on their file name only.
/// the first matching entry wins.
fn archive_entries(
    archive: &mut ZipArchive<File>,
    location: &FeedLocation,
) -> Result<HashMap<String, usize>, FeedError> {
    let mut entries = HashMap::new();
    for idx in 0..archive.len() {
        let entry = archive.by_index(idx).map_err(|source| FeedError::ZipError {
            path: location.to_string(),
            source,
        })?;
        if entry.is_dir() || entry.name().contains("__MACOSX") {
            continue;
        }
        let filename = Path::new(entry.name())
            .file_name()
            .map(|f| f.to_string_lossy().to_string());
        if let Some(filename) = filename {
            entries.entry(filename).or_insert(idx);
        }
    }
    Ok(entries)
}

fn read_from_archive<R: GtfsRecord>(
    archive: &mut ZipArchive<File>,
    entries: &HashMap<String, usize>,
    location: &FeedLocation,
) -> Result<Option<Table<R>>, FeedError> {
    let idx = match entries.get(R::KIND.filename()) {
        Some(idx) => *idx,
        None => {
            log::debug!("{location} has no {}", R::KIND.filename());
            return Ok(None);
        }
    };
    let entry = archive.by_index(idx).map_err(|source| FeedError::ZipError {
        path: location.to_string(),
        source,
    })?;
    read_optional_table(entry, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{LevelRecord, PathwayRecord},
        reconcile::{reconcile, ReconcileConfig, TableAction},
    };
    use std::io::Write;
    use zip::{write::SimpleFileOptions, ZipWriter};

    const STOPS: &str = "\u{feff}stop_id,stop_name,parent_station,level_id\n\
                         S1,Central,,\n\
                         P1,Platform 1,S1,L1\n\
                         P2,Platform 2,S1\n";
    const PATHWAYS: &str = "pathway_id,from_stop_id,to_stop_id,pathway_mode\npw1,P1,P2,1\n";

    #[test]
    fn test_read_table_strips_bom_and_pads() {
        let location = FeedLocation::Directory("memory".into());
        let table: Table<StopRecord> = read_table(STOPS.as_bytes(), &location).unwrap();
        assert_eq!(
            table.columns(),
            &["stop_id", "stop_name", "parent_station", "level_id"]
        );
        assert_eq!(table.len(), 3);
        let p2 = table.find_by_key("P2").unwrap();
        assert_eq!(p2.parent_station.as_deref(), Some("S1"));
        assert_eq!(p2.level_id, None);
    }

    #[test]
    fn test_read_table_rejects_missing_key() {
        let location = FeedLocation::Directory("memory".into());
        let result: Result<Table<LevelRecord>, _> =
            read_table("level_name\nStreet\n".as_bytes(), &location);
        assert!(matches!(
            result,
            Err(FeedError::InvalidTable {
                kind: TableKind::Levels,
                ..
            })
        ));
    }

    #[test]
    fn test_read_directory_feed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stops.txt"), STOPS).unwrap();
        std::fs::write(dir.path().join("pathways.txt"), PATHWAYS).unwrap();
        let feed = read_feed(&FeedLocation::Directory(dir.path().to_path_buf())).unwrap();
        assert_eq!(feed.stops.len(), 3);
        assert_eq!(feed.pathways.map(|p| p.len()), Some(1));
        assert!(feed.levels.is_none());
    }

    #[test]
    fn test_directory_without_stops() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("pathways.txt"), PATHWAYS).unwrap();
        let result = read_feed(&FeedLocation::Directory(dir.path().to_path_buf()));
        assert!(matches!(
            result,
            Err(FeedError::MissingRequiredFile { ref filename, .. }) if filename == "stops.txt"
        ));
    }

    #[test]
    fn test_empty_source_pathways_file_is_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let stops = "stop_id,parent_station\nS1,\nP1,S1\n";
        std::fs::write(dir.path().join("stops.txt"), stops).unwrap();
        std::fs::write(dir.path().join("pathways.txt"), "").unwrap();
        std::fs::write(dir.path().join("levels.txt"), "").unwrap();
        let source = read_feed(&FeedLocation::Directory(dir.path().to_path_buf())).unwrap();
        assert!(source.pathways.is_none());
        assert!(source.levels.is_none());

        let mut target = source.clone();
        let memory = FeedLocation::Directory("memory".into());
        target.pathways = Some(read_table(PATHWAYS.as_bytes(), &memory).unwrap());
        let output = reconcile(&source, &target, &ReconcileConfig::new(["S1"])).unwrap();
        let pathways = output.report.table(TableKind::Pathways).unwrap();
        assert_eq!(pathways.action, TableAction::Skipped);
        assert_eq!(output.tables.pathways, target.pathways);
    }

    #[test]
    fn test_empty_target_pathways_file_is_replaced() {
        let source_dir = tempfile::tempdir().unwrap();
        std::fs::write(source_dir.path().join("stops.txt"), STOPS).unwrap();
        std::fs::write(source_dir.path().join("pathways.txt"), PATHWAYS).unwrap();
        let target_dir = tempfile::tempdir().unwrap();
        std::fs::write(target_dir.path().join("stops.txt"), "stop_id\nS1\n").unwrap();
        std::fs::write(target_dir.path().join("pathways.txt"), "").unwrap();

        let source = read_feed(&FeedLocation::Directory(source_dir.path().to_path_buf())).unwrap();
        let target = read_feed(&FeedLocation::Directory(target_dir.path().to_path_buf())).unwrap();
        assert!(target.pathways.is_none());
        let output = reconcile(&source, &target, &ReconcileConfig::new(["S1"])).unwrap();
        let pathways = output.report.table(TableKind::Pathways).unwrap();
        assert_eq!(pathways.action, TableAction::Replaced);
        assert_eq!(output.tables.pathways.map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_empty_stops_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stops.txt"), "").unwrap();
        let result = read_feed(&FeedLocation::Directory(dir.path().to_path_buf()));
        assert!(matches!(
            result,
            Err(FeedError::InvalidTable {
                kind: TableKind::Stops,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_feed() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_feed(&FeedLocation::Archive(dir.path().join("nope.zip")));
        assert!(matches!(result, Err(FeedError::MissingFeed(_))));
    }

    #[test]
    fn test_read_archive_with_enclosing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("feed.zip");
        let mut writer = ZipWriter::new(File::create(&zip_path).unwrap());
        let options = SimpleFileOptions::default();
        writer
            .start_file("__MACOSX/rail/._stops.txt", options)
            .unwrap();
        writer.write_all(b"garbage").unwrap();
        writer.start_file("rail/stops.txt", options).unwrap();
        writer.write_all(STOPS.as_bytes()).unwrap();
        writer.start_file("rail/levels.txt", options).unwrap();
        writer
            .write_all(b"level_id,level_index\nL1,0\n")
            .unwrap();
        writer.finish().unwrap();

        let feed = read_feed(&FeedLocation::from_path(&zip_path)).unwrap();
        assert_eq!(feed.stops.len(), 3);
        assert!(feed.pathways.is_none());
        assert_eq!(feed.levels.map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_pathway_record_fields() {
        let location = FeedLocation::Directory("memory".into());
        let table: Table<PathwayRecord> = read_table(PATHWAYS.as_bytes(), &location).unwrap();
        let pw = table.find_by_key("pw1").unwrap();
        assert_eq!(pw.from_stop_id, "P1");
        assert_eq!(pw.to_stop_id, "P2");
        assert_eq!(pw.get("pathway_mode"), Some("1"));
    }
}
