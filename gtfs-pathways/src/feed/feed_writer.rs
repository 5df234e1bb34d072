use super::{FeedError, FeedLocation};
use crate::{
    model::{GtfsRecord, Table, TableKind},
    reconcile::ReconcileOutput,
};
use itertools::Itertools;
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipArchive, ZipWriter};

/// files in a feed that are never carried into the output.
const IGNORED_FILES: [&str; 2] = [".DS_Store", "Thumbs.db"];

/// encodes a table as GTFS delimited text, header first, values in schema
/// order.
pub fn table_to_csv<R: GtfsRecord>(table: &Table<R>) -> Result<Vec<u8>, FeedError> {
    let filename = R::KIND.filename();
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(table.columns())
        .map_err(|source| FeedError::CsvError {
            path: filename.to_string(),
            source,
        })?;
    for row in table.iter() {
        writer
            .write_record(table.row_values(row))
            .map_err(|source| FeedError::CsvError {
                path: filename.to_string(),
                source,
            })?;
    }
    writer
        .into_inner()
        .map_err(|e| FeedError::WriteError(format!("failure encoding {filename}: {e}")))
}

/// writes the merged feed to `output`. every file of the `target` feed is
/// carried over, then stops.txt is replaced along with pathways.txt and
/// levels.txt unless the reconciliation skipped them. `output` may be the
/// same location as `target`.
///
/// the feed is first written beside the destination and only moved into
/// place once complete, so a failed write leaves the destination as it was.
pub fn write_feed(
    target: &FeedLocation,
    output: &FeedLocation,
    result: &ReconcileOutput,
) -> Result<(), FeedError> {
    let mut files = read_feed_files(target)?;
    replace_file(&mut files, TableKind::Stops, table_to_csv(&result.tables.stops)?);
    if result.report.is_written(TableKind::Pathways) {
        if let Some(pathways) = &result.tables.pathways {
            replace_file(&mut files, TableKind::Pathways, table_to_csv(pathways)?);
        }
    }
    if result.report.is_written(TableKind::Levels) {
        if let Some(levels) = &result.tables.levels {
            replace_file(&mut files, TableKind::Levels, table_to_csv(levels)?);
        }
    }

    log::debug!("writing {}", describe_files(&files));
    let staging = sibling_path(output.path(), "staging")?;
    remove_path(&staging)?;
    match output {
        FeedLocation::Directory(_) => write_directory(&staging, &files)?,
        FeedLocation::Archive(_) => write_archive(&staging, &files)?,
    }
    swap_into_place(&staging, output.path())?;
    log::info!("wrote {} files to {output}", files.len());
    Ok(())
}

/// (file name, contents) of every file in a feed, in a stable order.
fn read_feed_files(location: &FeedLocation) -> Result<Vec<(String, Vec<u8>)>, FeedError> {
    let mut files = vec![];
    match location {
        FeedLocation::Directory(dir) => {
            let entries = std::fs::read_dir(dir).map_err(|source| io_error(dir, source))?;
            for entry in entries {
                let path = entry.map_err(|source| io_error(dir, source))?.path();
                if !path.is_file() {
                    continue;
                }
                let name = match path.file_name() {
                    Some(name) => name.to_string_lossy().to_string(),
                    None => continue,
                };
                if IGNORED_FILES.contains(&name.as_str()) {
                    continue;
                }
                let contents = std::fs::read(&path).map_err(|source| io_error(&path, source))?;
                files.push((name, contents));
            }
        }
        FeedLocation::Archive(path) => {
            let file = File::open(path).map_err(|source| io_error(path, source))?;
            let mut archive = ZipArchive::new(file).map_err(|source| zip_error(path, source))?;
            for idx in 0..archive.len() {
                let mut entry = archive
                    .by_index(idx)
                    .map_err(|source| zip_error(path, source))?;
                if entry.is_dir() || entry.name().contains("__MACOSX") {
                    continue;
                }
                let name = match Path::new(entry.name()).file_name() {
                    Some(name) => name.to_string_lossy().to_string(),
                    None => continue,
                };
                if IGNORED_FILES.contains(&name.as_str())
                    || files.iter().any(|(n, _)| n == &name)
                {
                    continue;
                }
                let mut contents = vec![];
                entry
                    .read_to_end(&mut contents)
                    .map_err(|source| io_error(path, source))?;
                files.push((name, contents));
            }
        }
    }
    files.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(files)
}

fn replace_file(files: &mut Vec<(String, Vec<u8>)>, kind: TableKind, contents: Vec<u8>) {
    let filename = kind.filename();
    match files.iter_mut().find(|(name, _)| name == filename) {
        Some((_, existing)) => *existing = contents,
        None => files.push((filename.to_string(), contents)),
    }
}

fn write_directory(dir: &Path, files: &[(String, Vec<u8>)]) -> Result<(), FeedError> {
    std::fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;
    for (name, contents) in files.iter() {
        let path = dir.join(name);
        std::fs::write(&path, contents).map_err(|source| io_error(&path, source))?;
    }
    Ok(())
}

fn write_archive(path: &Path, files: &[(String, Vec<u8>)]) -> Result<(), FeedError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    let file = File::create(path).map_err(|source| io_error(path, source))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, contents) in files.iter() {
        writer
            .start_file(name.as_str(), options)
            .map_err(|source| zip_error(path, source))?;
        writer
            .write_all(contents)
            .map_err(|source| io_error(path, source))?;
    }
    writer.finish().map_err(|source| zip_error(path, source))?;
    Ok(())
}

/// moves the staged output onto the destination. an existing destination
/// is set aside first and restored if the move fails.
fn swap_into_place(staging: &Path, destination: &Path) -> Result<(), FeedError> {
    if !destination.exists() {
        return std::fs::rename(staging, destination)
            .map_err(|source| io_error(destination, source));
    }
    let backup = sibling_path(destination, "backup")?;
    remove_path(&backup)?;
    std::fs::rename(destination, &backup).map_err(|source| io_error(destination, source))?;
    if let Err(source) = std::fs::rename(staging, destination) {
        if let Err(e) = std::fs::rename(&backup, destination) {
            log::error!(
                "unable to restore {} from {}: {e}",
                destination.display(),
                backup.display()
            );
        }
        return Err(io_error(destination, source));
    }
    remove_path(&backup)
}

/// `dir/.name.suffix` for a destination `dir/name`.
fn sibling_path(path: &Path, suffix: &str) -> Result<PathBuf, FeedError> {
    match path.file_name() {
        Some(name) => Ok(path.with_file_name(format!(".{}.{suffix}", name.to_string_lossy()))),
        None => Err(FeedError::WriteError(format!(
            "output location {} has no file name",
            path.display()
        ))),
    }
}

fn remove_path(path: &Path) -> Result<(), FeedError> {
    let result = if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else if path.exists() {
        std::fs::remove_file(path)
    } else {
        return Ok(());
    };
    result.map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: std::io::Error) -> FeedError {
    FeedError::IoError {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

fn zip_error(path: &Path, source: zip::result::ZipError) -> FeedError {
    FeedError::ZipError {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

fn describe_files(files: &[(String, Vec<u8>)]) -> String {
    files.iter().map(|(name, _)| name.as_str()).join(", ")
}
