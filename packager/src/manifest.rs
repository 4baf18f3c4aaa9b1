//! File manifest construction.
//!
//! The manifest lists every path the archive should contain, relative to the
//! staging root. It opens with the configured root entries and continues
//! with the files found under each payload subdirectory, in configuration
//! order. Siblings are visited in file-name order so two runs over the same
//! tree agree on the sequence.

use crate::error::{PackagingError, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::debug;
use walkdir::WalkDir;

/// An ordered list of paths relative to the staging root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileManifest {
    entries: Vec<Utf8PathBuf>,
}

impl FileManifest {
    /// Start a manifest with the given root-level entries.
    #[must_use]
    pub fn seeded<S: AsRef<str>>(root_entries: &[S]) -> Self {
        Self {
            entries: root_entries
                .iter()
                .map(|e| Utf8PathBuf::from(e.as_ref()))
                .collect(),
        }
    }

    /// Append a relative path.
    pub fn push(&mut self, entry: Utf8PathBuf) {
        self.entries.push(entry);
    }

    /// Return the entries in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[Utf8PathBuf] {
        &self.entries
    }

    /// Return the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the manifest lists nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a FileManifest {
    type Item = &'a Utf8PathBuf;
    type IntoIter = std::slice::Iter<'a, Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build the manifest for a staged module tree.
///
/// Each directory in `subdirs` is walked recursively under `root`; every
/// regular file whose name is not in `skip_names` is appended. A
/// subdirectory that is absent contributes nothing.
///
/// # Errors
///
/// Returns [`PackagingError::Walk`] if a directory cannot be read, or
/// [`PackagingError::NonUtf8Path`] if a discovered path is not UTF-8.
pub fn enumerate<S, T, U>(
    root: &Utf8Path,
    root_entries: &[S],
    subdirs: &[T],
    skip_names: &[U],
) -> Result<FileManifest>
where
    S: AsRef<str>,
    T: AsRef<str>,
    U: AsRef<str>,
{
    let mut manifest = FileManifest::seeded(root_entries);
    for subdir in subdirs {
        collect_files(root, subdir.as_ref(), skip_names, &mut manifest)?;
    }
    debug!("manifest lists {} entries", manifest.len());
    Ok(manifest)
}

/// Walk `root/subdir` and append its files to `manifest`.
fn collect_files<U: AsRef<str>>(
    root: &Utf8Path,
    subdir: &str,
    skip_names: &[U],
    manifest: &mut FileManifest,
) -> Result<()> {
    let dir = root.join(subdir);
    if !dir.is_dir() {
        debug!("payload directory {dir} is absent; skipping");
        return Ok(());
    }

    for entry in WalkDir::new(&dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }
        if is_reserved(&entry.file_name().to_string_lossy(), skip_names) {
            continue;
        }
        let path = Utf8Path::from_path(entry.path())
            .ok_or_else(|| PackagingError::NonUtf8Path(entry.path().to_path_buf()))?;
        let relative = path
            .strip_prefix(root)
            .map_err(|_| PackagingError::OutsideRoot {
                path: path.to_owned(),
                root: root.to_owned(),
            })?;
        manifest.push(relative.to_owned());
    }
    Ok(())
}

fn is_reserved<U: AsRef<str>>(name: &str, skip_names: &[U]) -> bool {
    skip_names.iter().any(|s| s.as_ref() == name)
}

/// Render a relative path as a zip entry name.
///
/// Components are joined with `/` regardless of platform, and `.` components
/// are dropped so an entry never starts with `./`.
#[must_use]
pub fn archive_name(relative: &Utf8Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Utf8Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
