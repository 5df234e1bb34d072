use super::FeedError;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

/// where a GTFS feed lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    /// an unzipped feed, one .txt file per table
    Directory(PathBuf),
    /// a .zip archive of the same files
    Archive(PathBuf),
}

impl FeedLocation {
    /// paths ending in `.zip` are archives, anything else is a directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let is_zip = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("zip"))
            .unwrap_or_default();
        if is_zip {
            FeedLocation::Archive(path.to_path_buf())
        } else {
            FeedLocation::Directory(path.to_path_buf())
        }
    }

    /// replaces a path without a final file name (`.`, `..`, `rail/..`) with
    /// its canonical form, so that output can be staged beside it. fails if
    /// the path cannot be resolved or is a filesystem root.
    pub fn resolve(self) -> Result<Self, FeedError> {
        if self.path().file_name().is_some() {
            return Ok(self);
        }
        let path = std::fs::canonicalize(self.path()).map_err(|source| FeedError::IoError {
            path: self.to_string(),
            source,
        })?;
        if path.file_name().is_none() {
            return Err(FeedError::WriteError(format!(
                "feed location {} has no file name",
                path.display()
            )));
        }
        Ok(match self {
            FeedLocation::Directory(_) => FeedLocation::Directory(path),
            FeedLocation::Archive(_) => FeedLocation::Archive(path),
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            FeedLocation::Directory(p) => p,
            FeedLocation::Archive(p) => p,
        }
    }

    pub fn exists(&self) -> bool {
        match self {
            FeedLocation::Directory(p) => p.is_dir(),
            FeedLocation::Archive(p) => p.is_file(),
        }
    }
}

impl Display for FeedLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path().display())
    }
}
