//! Zip archive assembly.
//!
//! Entries are written with deflate compression under their path relative
//! to the staging root. Every entry carries the zip epoch as its
//! modification time so identical inputs give identical archives; on Unix
//! the source file's permission bits are recorded as well, which keeps
//! `update-binary` and the scripts executable once flashed.

use crate::error::{PackagingError, Result};
use crate::manifest::{FileManifest, archive_name};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fs::{self, File};
use std::io;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// Outcome of writing an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Entry names written, in archive order.
    pub added: Vec<String>,
    /// Manifest entries whose file was missing at archive time.
    pub skipped: Vec<Utf8PathBuf>,
}

/// Write every manifest entry under `staging_root` into a new zip at
/// `archive_path`.
///
/// Entries whose backing file no longer exists are skipped with a warning
/// and listed in the returned report; the build carries on.
///
/// # Errors
///
/// Returns [`PackagingError::OutputDir`] if the archive's directory cannot
/// be created, [`PackagingError::Archive`] if the archive file or the zip
/// writer fails, and [`PackagingError::ArchiveEntry`] if a staged file
/// cannot be read.
pub fn create_archive(
    archive_path: &Utf8Path,
    staging_root: &Utf8Path,
    manifest: &FileManifest,
) -> Result<ArchiveReport> {
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent).map_err(|source| PackagingError::OutputDir {
            path: parent.to_owned(),
            source,
        })?;
    }
    let file = File::create(archive_path).map_err(|e| zip_failed(archive_path, e.into()))?;
    let mut writer = ZipWriter::new(file);
    let mut report = ArchiveReport::default();

    for relative in manifest {
        let source = staging_root.join(relative);
        if !source.is_file() {
            warn!("File {source} does not exist, skipping...");
            report.skipped.push(relative.clone());
            continue;
        }

        let name = archive_name(relative);
        let options = entry_options(&source).map_err(|e| entry_failed(&source, e))?;
        writer
            .start_file(name.as_str(), options)
            .map_err(|e| zip_failed(archive_path, e))?;
        File::open(&source)
            .and_then(|mut input| io::copy(&mut input, &mut writer))
            .map_err(|e| entry_failed(&source, e))?;
        debug!("Added {name} to zip");
        report.added.push(name);
    }

    writer.finish().map_err(|e| zip_failed(archive_path, e))?;
    Ok(report)
}

fn zip_failed(path: &Utf8Path, source: zip::result::ZipError) -> PackagingError {
    PackagingError::Archive {
        path: path.to_owned(),
        source,
    }
}

fn entry_failed(path: &Utf8Path, source: io::Error) -> PackagingError {
    PackagingError::ArchiveEntry {
        path: path.to_owned(),
        source,
    }
}

/// Build per-entry options: deflate, fixed timestamp, source permissions.
fn entry_options(source: &Utf8Path) -> io::Result<SimpleFileOptions> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    with_permissions(options, source)
}

#[cfg(unix)]
fn with_permissions(
    options: SimpleFileOptions,
    source: &Utf8Path,
) -> io::Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(source)?.permissions().mode();
    Ok(options.unix_permissions(mode & 0o7777))
}

#[cfg(not(unix))]
fn with_permissions(
    options: SimpleFileOptions,
    _source: &Utf8Path,
) -> io::Result<SimpleFileOptions> {
    Ok(options)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
