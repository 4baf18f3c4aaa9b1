//! MagiskFurtif module packager library.
//!
//! This crate builds the flashable MagiskFurtif module: it recreates the
//! staging directory from the static module tree, writes `module.prop`, and
//! compresses a fixed file list into a zip archive. It is used by the
//! `furtif-packager` binary and can be driven programmatically in tests.
//!
//! # Modules
//!
//! - [`archive`] - Deterministic zip assembly
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Defaults and `packager.toml` overrides
//! - [`error`] - Error types tagged with the failing build stage
//! - [`manifest`] - Payload enumeration relative to the staging root
//! - [`module_prop`] - `module.prop` generation
//! - [`naming`] - Archive naming policy
//! - [`pipeline`] - Build stage orchestration
//! - [`stager`] - Staging area cleanup and deep copy
//! - [`version`] - Module version newtype

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod manifest;
pub mod module_prop;
pub mod naming;
pub mod pipeline;
pub mod stager;
pub mod version;
