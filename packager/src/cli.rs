//! Command-line argument definitions for the module packager.
//!
//! The packager takes a single optional version; everything else is fixed
//! or comes from `packager.toml`.

use clap::Parser;

/// Build the flashable MagiskFurtif module archive.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "furtif-packager")]
#[command(about, disable_version_flag = true)]
#[command(long_about = concat!(
    "Build the flashable MagiskFurtif module archive.\n\n",
    "Copies the static module tree from base/ into builds/, writes module.prop ",
    "with the requested version, and compresses the module into ",
    "builds/MagiskFurtif-<version>.zip.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build with the default version:\n",
    "    $ furtif-packager\n\n",
    "  Build a specific version:\n",
    "    $ furtif-packager --version 2.76\n\n",
    "  Short form:\n",
    "    $ furtif-packager -v 3.0.0",
))]
pub struct Cli {
    /// Module version [default: 2.75, or `default_version` from packager.toml].
    #[arg(short, long, value_name = "VERSION")]
    pub version: Option<String>,
}
