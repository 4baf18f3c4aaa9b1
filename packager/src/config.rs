//! Packager configuration.
//!
//! The built-in defaults describe the MagiskFurtif module exactly, so the
//! packager needs no configuration file to do its job. A `packager.toml` in
//! the project root may override any subset of the fields; omitted fields
//! keep their defaults.
//!
//! ```toml
//! product_name = "MagiskFurtif"
//! default_version = "2.75"
//!
//! [module]
//! author = "Furtif"
//! min_magisk = 1530
//! ```

use crate::error::{PackagingError, Result};
use crate::version::ModuleVersion;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;

/// Name of the optional configuration file in the project root.
pub const CONFIG_FILE_NAME: &str = "packager.toml";

/// Everything the packager needs to know apart from the version.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagerConfig {
    /// Product name used as the archive filename prefix.
    pub product_name: String,
    /// Version used when the command line does not provide one.
    pub default_version: ModuleVersion,
    /// Directory holding the static module tree, relative to the project root.
    pub source_dir: Utf8PathBuf,
    /// Directory that is recreated on every run and receives the archive.
    pub output_dir: Utf8PathBuf,
    /// Files at the staging root that always head the manifest.
    pub root_entries: Vec<String>,
    /// Subdirectories walked for payload files, in manifest order.
    pub payload_dirs: Vec<String>,
    /// File names that keep empty directories under version control and are
    /// never packaged.
    pub reserved_names: Vec<String>,
    /// Fixed identity fields written to `module.prop`.
    pub module: ModuleIdentity,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        Self {
            product_name: "MagiskFurtif".to_owned(),
            default_version: ModuleVersion::default(),
            source_dir: Utf8PathBuf::from("base"),
            output_dir: Utf8PathBuf::from("builds"),
            root_entries: vec!["install.sh".to_owned(), "module.prop".to_owned()],
            payload_dirs: vec![
                "common".to_owned(),
                "system".to_owned(),
                "META-INF".to_owned(),
            ],
            reserved_names: vec!["placeholder".to_owned(), ".gitkeep".to_owned()],
            module: ModuleIdentity::default(),
        }
    }
}

impl PackagerConfig {
    /// Load the configuration for the project rooted at `project_root`.
    ///
    /// A missing `packager.toml` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::InvalidConfig`] when the file exists but
    /// cannot be read or does not parse.
    pub fn load(project_root: &Utf8Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&path, &contents),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no {CONFIG_FILE_NAME} at {project_root}; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(PackagingError::InvalidConfig {
                path,
                reason: e.to_string(),
            }),
        }
    }

    /// Parse configuration text read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::InvalidConfig`] if the TOML is malformed or
    /// names an unknown field.
    pub fn from_toml(path: &Utf8Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| PackagingError::InvalidConfig {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Resolve the source and output directories against `project_root`.
    #[must_use]
    pub fn layout(&self, project_root: &Utf8Path) -> ProjectLayout {
        ProjectLayout {
            source_dir: project_root.join(&self.source_dir),
            output_dir: project_root.join(&self.output_dir),
        }
    }
}

/// Absolute locations of the directories a build touches.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectLayout {
    /// The static module tree that is copied verbatim.
    pub source_dir: Utf8PathBuf,
    /// The staging directory, which also receives the archive.
    pub output_dir: Utf8PathBuf,
}

/// Identity fields of `module.prop` that do not depend on the version.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleIdentity {
    /// Module identifier (`id=`).
    pub id: String,
    /// Display name (`name=`).
    pub name: String,
    /// Author (`author=`).
    pub author: String,
    /// One-line description (`description=`).
    pub description: String,
    /// Support URL (`support=`).
    pub support: String,
    /// Minimum Magisk version code (`minMagisk=`).
    pub min_magisk: u32,
}

impl Default for ModuleIdentity {
    fn default() -> Self {
        Self {
            id: "magiskfurtif".to_owned(),
            name: "MagiskFurtif".to_owned(),
            author: "Furtif".to_owned(),
            description: "Runs FurtiF Tools on boot with magisk.".to_owned(),
            support: "https://github.com/Furtif/magisk-furtif/issues".to_owned(),
            min_magisk: 1530,
        }
    }
}
