//! Module version newtype.
//!
//! The version is accepted verbatim: no format is enforced, so a caller
//! passing something other than dots and digits gets exactly that string
//! back in `module.prop` and in the archive name.

use serde::Deserialize;
use std::fmt;

/// Version used when the command line does not supply one.
pub const DEFAULT_VERSION: &str = "2.75";

/// A module version string such as `2.75`.
///
/// # Examples
///
/// ```
/// use furtif_packager::version::ModuleVersion;
///
/// let version = ModuleVersion::from("3.0.1");
/// assert_eq!(version.as_str(), "3.0.1");
/// assert_eq!(version.version_code(), "301");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ModuleVersion(String);

impl ModuleVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the numeric-looking build code by dropping every `.`.
    #[must_use]
    pub fn version_code(&self) -> String {
        self.0.replace('.', "")
    }
}

impl Default for ModuleVersion {
    fn default() -> Self {
        Self(DEFAULT_VERSION.to_owned())
    }
}

impl From<&str> for ModuleVersion {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ModuleVersion {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ModuleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
