//! `module.prop` generation.
//!
//! Magisk reads module metadata from a flat `key=value` file at the module
//! root. The key order is fixed and every line ends in a bare line feed,
//! whatever platform the packager runs on.

use crate::config::ModuleIdentity;
use crate::error::{PackagingError, Result};
use crate::version::ModuleVersion;
use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use std::fs;

/// File name of the generated metadata file.
pub const MODULE_PROP_FILE: &str = "module.prop";

/// The eight metadata fields, in the order Magisk expects to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleProp<'a> {
    identity: &'a ModuleIdentity,
    version: &'a ModuleVersion,
}

impl<'a> ModuleProp<'a> {
    /// Combine fixed identity fields with a version.
    #[must_use]
    pub fn new(identity: &'a ModuleIdentity, version: &'a ModuleVersion) -> Self {
        Self { identity, version }
    }

    /// Return the ordered `(key, value)` pairs.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, String); 8] {
        let id = self.identity;
        [
            ("id", id.id.clone()),
            ("name", id.name.clone()),
            ("version", format!("v{}", self.version)),
            ("versionCode", self.version.version_code()),
            ("author", id.author.clone()),
            ("description", id.description.clone()),
            ("support", id.support.clone()),
            ("minMagisk", id.min_magisk.to_string()),
        ]
    }

    /// Render the file body.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ModuleProp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Write `module.prop` into `dir` and return the path written.
///
/// # Errors
///
/// Returns [`PackagingError::MetadataWrite`] if the file cannot be written.
pub fn write_module_prop(
    dir: &Utf8Path,
    identity: &ModuleIdentity,
    version: &ModuleVersion,
) -> Result<Utf8PathBuf> {
    let path = dir.join(MODULE_PROP_FILE);
    let body = ModuleProp::new(identity, version).render();
    fs::write(&path, body).map_err(|source| PackagingError::MetadataWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
