//! Build pipeline orchestration.
//!
//! A build walks a fixed sequence of stages: clean prior artefacts, stage the
//! source tree, write `module.prop`, enumerate the payload, write the
//! archive. The first failing stage ends the build; the error records which
//! stage it was. The staging root is passed explicitly to every stage, so the
//! process working directory is never touched.

use crate::archive::{ArchiveReport, create_archive};
use crate::config::PackagerConfig;
use crate::error::{BuildError, PackagingError};
use crate::manifest::{FileManifest, enumerate};
use crate::module_prop::write_module_prop;
use crate::naming::ArchiveName;
use crate::stager::Stager;
use crate::version::ModuleVersion;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fmt;

/// The stages of a single build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Removing the previous staging directory and archive.
    CleaningPriorArtefacts,
    /// Copying the static source tree into the staging area.
    Staging,
    /// Writing `module.prop` into the staging root.
    WritingMetadata,
    /// Listing the files to archive.
    EnumeratingFiles,
    /// Writing the zip archive.
    WritingArchive,
}

impl BuildStage {
    /// Human-readable stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CleaningPriorArtefacts => "cleaning prior artefacts",
            Self::Staging => "staging",
            Self::WritingMetadata => "writing metadata",
            Self::EnumeratingFiles => "enumerating files",
            Self::WritingArchive => "writing archive",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for [`package_module`].
#[derive(Debug, Clone)]
pub struct PackageParams {
    /// Version to stamp into `module.prop` and the archive name.
    pub version: ModuleVersion,
    /// Directory against which the configured source and output
    /// directories are resolved.
    pub project_root: Utf8PathBuf,
    /// Product identity and layout.
    pub config: PackagerConfig,
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Path of the written archive.
    pub archive_path: Utf8PathBuf,
    /// The manifest the archive was built from.
    pub manifest: FileManifest,
    /// Entry names written and manifest entries skipped.
    pub archive: ArchiveReport,
}

/// Stage and archive the module.
///
/// # Errors
///
/// Returns a [`BuildError`] naming the stage that failed. A failed build may
/// leave a partial staging directory or archive behind; the next build's
/// cleaning stage removes them.
pub fn package_module(params: &PackageParams) -> Result<BuildReport, BuildError> {
    let config = &params.config;
    let layout = config.layout(&params.project_root);
    let archive_path = archive_path_for(&params.project_root, config, &params.version);
    let stager = Stager::new(layout.source_dir, layout.output_dir);
    let staging_root = stager.staging_path();

    info!(
        "Creating {} module version {}...",
        config.product_name, params.version
    );

    run_stage(BuildStage::CleaningPriorArtefacts, || {
        stager.clean(&archive_path)
    })?;
    run_stage(BuildStage::Staging, || stager.stage())?;
    run_stage(BuildStage::WritingMetadata, || {
        write_module_prop(staging_root, &config.module, &params.version).map(|path| {
            info!("Created {path} with version {}", params.version);
        })
    })?;
    let manifest = run_stage(BuildStage::EnumeratingFiles, || {
        enumerate(
            staging_root,
            &config.root_entries,
            &config.payload_dirs,
            &config.reserved_names,
        )
    })?;
    let archive = run_stage(BuildStage::WritingArchive, || {
        info!("Building flashable zip...");
        create_archive(&archive_path, staging_root, &manifest)
    })?;

    info!("Successfully created {archive_path}");
    Ok(BuildReport {
        archive_path,
        manifest,
        archive,
    })
}

/// Run one stage, tagging any failure with the stage name.
fn run_stage<T>(
    stage: BuildStage,
    body: impl FnOnce() -> Result<T, PackagingError>,
) -> Result<T, BuildError> {
    debug!("entering stage: {stage}");
    body().map_err(|source| BuildError::new(stage, source))
}

/// Resolve the path the archive for `version` would be written to.
#[must_use]
pub fn archive_path_for(
    project_root: &Utf8Path,
    config: &PackagerConfig,
    version: &ModuleVersion,
) -> Utf8PathBuf {
    let name = ArchiveName::new(config.product_name.as_str(), version.clone());
    config
        .layout(project_root)
        .output_dir
        .join(name.filename())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
