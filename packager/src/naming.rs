//! Archive naming policy.
//!
//! Archives are named `<product>-<version>.zip`, so the same version always
//! lands on the same path and a rebuild replaces its predecessor.

use crate::version::ModuleVersion;
use std::fmt;

/// The fixed file extension for module archives.
const ARCHIVE_EXTENSION: &str = ".zip";

/// A deterministic module archive filename.
///
/// # Examples
///
/// ```
/// use furtif_packager::naming::ArchiveName;
/// use furtif_packager::version::ModuleVersion;
///
/// let name = ArchiveName::new("MagiskFurtif", ModuleVersion::from("2.76"));
/// assert_eq!(name.to_string(), "MagiskFurtif-2.76.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    product: String,
    version: ModuleVersion,
}

impl ArchiveName {
    /// Create an archive name from a product name and version.
    #[must_use]
    pub fn new(product: impl Into<String>, version: ModuleVersion) -> Self {
        Self {
            product: product.into(),
            version,
        }
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}{ARCHIVE_EXTENSION}", self.product, self.version)
    }
}
