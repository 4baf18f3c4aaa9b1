//! Error types for the module packager.
//!
//! [`PackagingError`] names the concern that failed (cleaning, copying,
//! metadata, walking, archive writing, configuration) together with the path
//! involved. [`BuildError`] adds the pipeline stage in which the failure
//! happened so the top-level report says where the build stopped.

use crate::pipeline::BuildStage;
use camino::Utf8PathBuf;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while staging and archiving the module.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// A previous staging directory or archive could not be removed.
    #[error("failed to remove {path}: {source}")]
    CleanFailed {
        /// Path that could not be removed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The static source tree could not be copied into the staging area.
    #[error("failed to copy {from} to {to}: {source}")]
    CopyFailed {
        /// Source path being copied.
        from: Utf8PathBuf,
        /// Destination path inside the staging area.
        to: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The `module.prop` file could not be written.
    #[error("failed to write module metadata to {path}: {source}")]
    MetadataWrite {
        /// Destination path of the metadata file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a directory tree failed part-way.
    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// The zip writer reported a failure.
    #[error("failed to write archive {path}: {source}")]
    Archive {
        /// Path of the archive being written.
        path: Utf8PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// A staged file could not be read into the archive.
    #[error("failed to add {path} to archive: {source}")]
    ArchiveEntry {
        /// Staged file being added.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path encountered while walking is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// A walked path does not sit under the staging root.
    #[error("{path} is not under {root}")]
    OutsideRoot {
        /// The offending path.
        path: Utf8PathBuf,
        /// The staging root it was expected under.
        root: Utf8PathBuf,
    },

    /// The optional `packager.toml` could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path to the configuration file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },
}

/// A packaging failure tagged with the stage in which it occurred.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct BuildError {
    /// The pipeline stage that was running when the failure happened.
    pub stage: BuildStage,
    /// The underlying packaging failure.
    #[source]
    pub source: PackagingError,
}

impl BuildError {
    /// Attach a stage to a packaging failure.
    #[must_use]
    pub fn new(stage: BuildStage, source: PackagingError) -> Self {
        Self { stage, source }
    }
}

/// Result type alias using [`PackagingError`].
pub type Result<T> = std::result::Result<T, PackagingError>;
