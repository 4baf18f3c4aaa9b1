//! MagiskFurtif packager CLI entrypoint.
//!
//! Builds `builds/<product>-<version>.zip` from the module tree in `base/`,
//! relative to the directory the packager is started from. Progress is
//! logged through `env_logger` (`RUST_LOG` overrides the default `info`
//! level); the banner, the outcome, and any failure message are written to
//! standard output.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use furtif_packager::cli::Cli;
use furtif_packager::config::PackagerConfig;
use furtif_packager::error::{BuildError, PackagingError};
use furtif_packager::pipeline::{BuildReport, PackageParams, package_module};
use furtif_packager::version::ModuleVersion;
use log::info;
use std::fs;
use std::io::Write;
use thiserror::Error;

const RULE: &str = "==================================================";

/// Errors that end a packager run.
#[derive(Debug, Error)]
enum RunError {
    /// The current directory could not be determined or is not UTF-8.
    #[error("cannot resolve project root: {0}")]
    ProjectRoot(String),

    /// Configuration loading or output directory preparation failed.
    #[error("{0}")]
    Packaging(#[from] PackagingError),

    /// A build stage failed.
    #[error("{0}")]
    Build(#[from] BuildError),
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, &mut stdout);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), RunError> {
    let cwd = std::env::current_dir().map_err(|e| RunError::ProjectRoot(e.to_string()))?;
    let project_root = Utf8PathBuf::try_from(cwd)
        .map_err(|e| RunError::ProjectRoot(format!("current directory is not valid UTF-8: {e}")))?;
    run_in(&project_root, cli, out)
}

/// Build the module for the project rooted at `project_root`.
fn run_in(project_root: &Utf8Path, cli: &Cli, out: &mut dyn Write) -> Result<(), RunError> {
    let config = PackagerConfig::load(project_root)?;
    let version = resolve_version(cli, &config);

    write_line(out, RULE);
    write_line(out, format!("{} Module Builder", config.product_name));
    write_line(out, RULE);

    ensure_output_dir(&config.layout(project_root).output_dir)?;
    write_line(
        out,
        format!("Building {} version {version}...", config.product_name),
    );

    let params = PackageParams {
        version,
        project_root: project_root.to_owned(),
        config,
    };
    let report = package_module(&params)?;
    print_summary(&report, out);
    Ok(())
}

fn resolve_version(cli: &Cli, config: &PackagerConfig) -> ModuleVersion {
    cli.version
        .as_deref()
        .map_or_else(|| config.default_version.clone(), ModuleVersion::from)
}

fn ensure_output_dir(output_dir: &Utf8Path) -> Result<(), PackagingError> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|source| PackagingError::OutputDir {
            path: output_dir.to_owned(),
            source,
        })?;
        info!("Created builds directory: {output_dir}");
    }
    Ok(())
}

fn print_summary(report: &BuildReport, out: &mut dyn Write) {
    write_line(out, "");
    write_line(out, RULE);
    write_line(out, "Build completed successfully!");
    write_line(out, format!("Module location: {}", report.archive_path));
    if !report.archive.skipped.is_empty() {
        write_line(
            out,
            format!(
                "Skipped {} missing file(s); see warnings above.",
                report.archive.skipped.len()
            ),
        );
    }
    write_line(out, RULE);
}

fn exit_code_for_run_result(result: Result<(), RunError>, out: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_line(out, format!("\nBuild failed with error: {err}"));
            1
        }
    }
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Project {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn project() -> Project {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        fs::create_dir_all(root.join("base/common")).expect("mkdir");
        fs::write(root.join("base/install.sh"), "#!/sbin/sh\n").expect("write");
        fs::write(root.join("base/common/x.sh"), "echo x\n").expect("write");
        Project { _dir: dir, root }
    }

    fn output_of(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut out = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut out);
        assert_eq!(exit_code, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = RunError::ProjectRoot("gone".to_owned());

        let mut out = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut out);

        assert_eq!(exit_code, 1);
        assert!(
            output_of(out).contains("Build failed with error: cannot resolve project root: gone")
        );
    }

    #[rstest]
    fn run_in_uses_default_version(project: Project) {
        let mut out = Vec::new();

        run_in(&project.root, &Cli::default(), &mut out).expect("build succeeds");

        assert!(project.root.join("builds/MagiskFurtif-2.75.zip").is_file());
        let text = output_of(out);
        assert!(text.contains("MagiskFurtif Module Builder"));
        assert!(text.contains("Build completed successfully!"));
    }

    #[rstest]
    fn run_in_honours_version_flag(project: Project) {
        let cli = Cli::parse_from(["furtif-packager", "-v", "2.76"]);
        let mut out = Vec::new();

        run_in(&project.root, &cli, &mut out).expect("build succeeds");

        let prop = fs::read_to_string(project.root.join("builds/module.prop")).expect("read");
        assert!(prop.contains("versionCode=276\n"));
        assert!(output_of(out).contains("MagiskFurtif-2.76.zip"));
    }

    #[rstest]
    fn run_in_reads_default_version_from_config(project: Project) {
        fs::write(
            project.root.join("packager.toml"),
            "default_version = \"3.0\"\n",
        )
        .expect("write config");
        let mut out = Vec::new();

        run_in(&project.root, &Cli::default(), &mut out).expect("build succeeds");

        assert!(project.root.join("builds/MagiskFurtif-3.0.zip").is_file());
    }

    #[rstest]
    fn run_in_reports_failure_for_missing_source(project: Project) {
        fs::remove_dir_all(project.root.join("base")).expect("remove base");
        let mut out = Vec::new();

        let result = run_in(&project.root, &Cli::default(), &mut out);
        let exit_code = exit_code_for_run_result(result, &mut out);

        assert_eq!(exit_code, 1);
        assert!(output_of(out).contains("Build failed with error: staging failed"));
    }

    #[rstest]
    fn run_in_rejects_malformed_config(project: Project) {
        fs::write(project.root.join("packager.toml"), "colour = 1\n").expect("write config");
        let mut out = Vec::new();

        let err = run_in(&project.root, &Cli::default(), &mut out).expect_err("bad config");

        assert!(matches!(
            err,
            RunError::Packaging(PackagingError::InvalidConfig { .. })
        ));
    }

    #[rstest]
    fn ensure_output_dir_names_the_blocked_path(project: Project) {
        let blocked = project.root.join("builds");
        fs::write(&blocked, "not a directory").expect("write");
        let nested = blocked.join("out");

        let err = ensure_output_dir(&nested).expect_err("file in the way");

        assert!(matches!(err, PackagingError::OutputDir { ref path, .. } if *path == nested));
        assert!(err.to_string().contains(nested.as_str()));
    }

    #[rstest]
    fn resolve_version_prefers_flag() {
        let cli = Cli {
            version: Some("9.9".to_owned()),
        };
        let version = resolve_version(&cli, &PackagerConfig::default());
        assert_eq!(version.as_str(), "9.9");
    }
}
