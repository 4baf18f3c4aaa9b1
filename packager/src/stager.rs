//! Staging area preparation.
//!
//! The staging directory is never updated in place: each build removes it
//! (and any previous archive of the same name) and then deep-copies the
//! static module tree into a fresh one.

use crate::error::{PackagingError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use walkdir::WalkDir;

/// Copies the static module tree into a freshly recreated staging area.
#[derive(Debug, Clone)]
pub struct Stager {
    source_dir: Utf8PathBuf,
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager copying `source_dir` into `staging_dir`.
    #[must_use]
    pub fn new(source_dir: Utf8PathBuf, staging_dir: Utf8PathBuf) -> Self {
        Self {
            source_dir,
            staging_dir,
        }
    }

    /// Return the staging root.
    #[must_use]
    pub fn staging_path(&self) -> &Utf8Path {
        &self.staging_dir
    }

    /// Remove the previous staging directory and the previous archive.
    ///
    /// Either may be absent; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::CleanFailed`] if an existing path cannot be
    /// removed.
    pub fn clean(&self, archive_path: &Utf8Path) -> Result<()> {
        if remove_path(&self.staging_dir, fs::remove_dir_all)? {
            info!("Cleaned previous build directory");
        }
        if remove_path(archive_path, fs::remove_file)? {
            info!("Removed previous archive {archive_path}");
        }
        Ok(())
    }

    /// Deep-copy the source tree into the staging area.
    ///
    /// Symbolic links are followed, so a linked directory is copied as a
    /// real directory holding the link target's contents.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::CopyFailed`] if the source tree is missing
    /// or a file cannot be copied, and [`PackagingError::Walk`] if the walk
    /// itself fails, including when a link loops back on an ancestor.
    pub fn stage(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            return Err(PackagingError::CopyFailed {
                from: self.source_dir.clone(),
                to: self.staging_dir.clone(),
                source: std::io::Error::new(ErrorKind::NotFound, "source tree not found"),
            });
        }

        let mut copied = 0_usize;
        for entry in WalkDir::new(&self.source_dir)
            .follow_links(true)
            .sort_by_file_name() {
            let entry = entry?;
            let from = Utf8Path::from_path(entry.path())
                .ok_or_else(|| PackagingError::NonUtf8Path(entry.path().to_path_buf()))?;
            let relative = from
                .strip_prefix(&self.source_dir)
                .map_err(|_| PackagingError::OutsideRoot {
                    path: from.to_owned(),
                    root: self.source_dir.clone(),
                })?;
            let to = self.staging_dir.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&to).map_err(|source| copy_failed(from, &to, source))?;
            } else {
                fs::copy(from, &to).map_err(|source| copy_failed(from, &to, source))?;
                copied += 1;
            }
        }

        debug!("copied {copied} files from {}", self.source_dir);
        info!("Copied base module files");
        Ok(())
    }
}

fn copy_failed(from: &Utf8Path, to: &Utf8Path, source: std::io::Error) -> PackagingError {
    PackagingError::CopyFailed {
        from: from.to_owned(),
        to: to.to_owned(),
        source,
    }
}

/// Remove `path` with `remove`, treating a missing path as already clean.
///
/// Returns whether anything was removed.
fn remove_path<'p>(
    path: &'p Utf8Path,
    remove: impl FnOnce(&'p Utf8Path) -> std::io::Result<()>,
) -> Result<bool> {
    match remove(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(PackagingError::CleanFailed {
            path: path.to_owned(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn stager(&self) -> Stager {
            Stager::new(self.root.join("base"), self.root.join("builds"))
        }
    }

    #[fixture]
    fn project() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        fs::create_dir_all(root.join("base/common")).expect("mkdir");
        fs::write(root.join("base/install.sh"), "#!/sbin/sh\n").expect("write");
        fs::write(root.join("base/common/service.sh"), "echo hi\n").expect("write");
        Fixture { _dir: dir, root }
    }

    #[rstest]
    fn stage_copies_tree_preserving_layout(project: Fixture) {
        let stager = project.stager();

        stager.stage().expect("stage succeeds");

        let staged = stager.staging_path();
        assert_eq!(
            fs::read_to_string(staged.join("install.sh")).expect("read"),
            "#!/sbin/sh\n"
        );
        assert!(staged.join("common/service.sh").is_file());
    }

    #[cfg(unix)]
    #[rstest]
    fn stage_copies_contents_of_linked_directories(project: Fixture) {
        fs::create_dir_all(project.root.join("shared/lib")).expect("mkdir");
        fs::write(project.root.join("shared/lib/a.so"), "elf").expect("write");
        fs::create_dir_all(project.root.join("base/system")).expect("mkdir");
        std::os::unix::fs::symlink(
            project.root.join("shared/lib"),
            project.root.join("base/system/lib"),
        )
        .expect("symlink");
        let stager = project.stager();

        stager.stage().expect("stage succeeds");

        let staged_lib = stager.staging_path().join("system/lib");
        assert!(!staged_lib.is_symlink());
        assert_eq!(
            fs::read_to_string(staged_lib.join("a.so")).expect("read"),
            "elf"
        );
    }

    #[cfg(unix)]
    #[rstest]
    fn stage_reports_link_loops_as_walk_errors(project: Fixture) {
        std::os::unix::fs::symlink(
            project.root.join("base"),
            project.root.join("base/common/loop"),
        )
        .expect("symlink");

        let err = project.stager().stage().expect_err("loop is rejected");

        assert!(matches!(err, PackagingError::Walk(_)), "got: {err:?}");
    }

    #[rstest]
    fn stage_copies_empty_directories(project: Fixture) {
        fs::create_dir_all(project.root.join("base/system/bin")).expect("mkdir");
        let stager = project.stager();

        stager.stage().expect("stage succeeds");

        assert!(stager.staging_path().join("system/bin").is_dir());
    }

    #[rstest]
    fn stage_fails_without_source_tree(project: Fixture) {
        fs::remove_dir_all(project.root.join("base")).expect("remove base");

        let err = project.stager().stage().expect_err("source is missing");
        assert!(matches!(err, PackagingError::CopyFailed { .. }));
    }

    #[rstest]
    fn clean_removes_previous_staging_and_archive(project: Fixture) {
        let stager = project.stager();
        let builds = stager.staging_path().to_owned();
        fs::create_dir_all(builds.join("common")).expect("mkdir");
        fs::write(builds.join("common/stale.sh"), "old").expect("write");
        let archive = project.root.join("MagiskFurtif-1.0.zip");
        fs::write(&archive, "zip").expect("write");

        stager.clean(&archive).expect("clean succeeds");

        assert!(!builds.exists());
        assert!(!archive.exists());
    }

    #[rstest]
    fn clean_tolerates_missing_artefacts(project: Fixture) {
        let stager = project.stager();
        let archive = project.root.join("builds/MagiskFurtif-1.0.zip");

        stager.clean(&archive).expect("nothing to clean is fine");
    }

    #[rstest]
    fn clean_then_stage_drops_stale_files(project: Fixture) {
        let stager = project.stager();
        let builds = stager.staging_path().to_owned();
        fs::create_dir_all(builds.join("common")).expect("mkdir");
        fs::write(builds.join("common/stale.sh"), "old").expect("write");

        stager
            .clean(&builds.join("MagiskFurtif-1.0.zip"))
            .expect("clean");
        stager.stage().expect("stage");

        assert!(!builds.join("common/stale.sh").exists());
        assert!(builds.join("common/service.sh").exists());
    }
}
