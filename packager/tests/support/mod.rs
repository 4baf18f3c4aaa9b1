//! Test support utilities for packager behavioural tests.
//!
//! Provides scratch project trees and helpers for reading back the archives
//! the packager produces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::{self, File};
use std::io::Read;
use tempfile::TempDir;
use zip::ZipArchive;

/// Entries the reference layout is expected to produce, sorted.
pub const REFERENCE_ENTRIES: [&str; 5] = [
    "META-INF/com/google/android/update-binary",
    "common/x.sh",
    "install.sh",
    "module.prop",
    "system/bin/y",
];

/// A scratch project directory that is removed on drop.
pub struct ScratchProject {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ScratchProject {
    /// Create an empty project directory.
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        Self { _dir: dir, root }
    }

    /// Create a project whose `base/` holds the reference module layout.
    pub fn with_reference_layout() -> Self {
        let project = Self::empty();
        project.write("base/install.sh", "#!/sbin/sh\n");
        project.write(
            "base/META-INF/com/google/android/update-binary",
            "#!/sbin/sh\n",
        );
        project.write("base/common/x.sh", "echo x\n");
        project.write("base/system/bin/y", "binary\n");
        project
    }

    /// Return the project root.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` at `relative`, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, contents).expect("write");
    }
}

/// List the entry names of the zip at `path`, sorted.
pub fn sorted_entries(path: &Utf8Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).expect("open archive")).expect("read zip");
    let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    names.sort();
    names
}

/// Read a single entry of the zip at `path` as text.
pub fn read_entry(path: &Utf8Path, name: &str) -> String {
    let mut archive =
        ZipArchive::new(File::open(path).expect("open archive")).expect("read zip");
    let mut contents = String::new();
    archive
        .by_name(name)
        .expect("entry present")
        .read_to_string(&mut contents)
        .expect("read entry");
    contents
}
