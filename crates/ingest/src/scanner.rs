//! Watched-directory scanning.
//!
//! A candidate is a regular file directly inside the watched directory whose
//! extension is exactly `tsv` (case-sensitive, so `A.TSV` is not picked up)
//! and whose name is not in the processed set. Candidates are opened here so
//! that an unreadable file is dropped before parsing starts.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Extension, without the dot, of files the scanner picks up.
pub const TSV_EXTENSION: &str = "tsv";

#[derive(Debug, Error)]
pub enum ScanError {
    /// The watched directory itself could not be listed.
    #[error("failed to read directory '{path}': {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One entry could not be inspected or opened.
    #[error("failed to open '{path}': {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A new file ready to be parsed.
#[derive(Debug)]
pub struct Candidate {
    /// Filename, used as the document id.
    pub name: String,
    pub path: PathBuf,
    pub file: File,
}

/// What one pass over the directory found.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Openable new files, sorted by name.
    pub candidates: Vec<Candidate>,
    /// Entries that looked like candidates but could not be opened.
    pub skipped: Vec<ScanError>,
}

/// Whether a path names a file the scanner would consider.
#[must_use]
pub fn has_tsv_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == TSV_EXTENSION)
}

/// List new TSV files in `dir`.
///
/// # Errors
///
/// Returns [`ScanError::DirectoryAccess`] if `dir` cannot be listed. Problems
/// with individual entries are logged and collected in
/// [`ScanOutcome::skipped`] instead.
pub fn scan(dir: &Path, processed: &HashSet<String>) -> Result<ScanOutcome, ScanError> {
    let entries = fs::read_dir(dir).map_err(|source| ScanError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut outcome = ScanOutcome::default();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                warn!(dir = %dir.display(), error = %source, "Skipping unreadable directory entry");
                outcome.skipped.push(ScanError::FileAccess {
                    path: dir.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        let path = entry.path();
        if !has_tsv_extension(&path) {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(path = %path.display(), "Skipping file with a non UTF-8 name");
            continue;
        };

        if processed.contains(&name) {
            continue;
        }

        match open_regular_file(&path) {
            Ok(Some(file)) => outcome.candidates.push(Candidate { name, path, file }),
            Ok(None) => {}
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Skipping file that cannot be opened");
                outcome.skipped.push(ScanError::FileAccess { path, source });
            }
        }
    }

    outcome.candidates.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(
        dir = %dir.display(),
        candidates = outcome.candidates.len(),
        skipped = outcome.skipped.len(),
        "Directory scanned"
    );
    Ok(outcome)
}

/// Open `path` for reading if it is a regular file; `None` for directories
/// and other non-files.
fn open_regular_file(path: &Path) -> std::io::Result<Option<File>> {
    if !fs::metadata(path)?.is_file() {
        return Ok(None);
    }
    File::open(path).map(Some)
}
