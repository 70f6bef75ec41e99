//! Top-level CLI definition and dispatch.
//!
//! This is the host-integration layer: Composer script hooks call the binary,
//! and each subcommand turns into `clean_all` / `clean_package` calls on one
//! executor, so every event handled by one process shares a single run.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::control;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use vendor_cleanup::cleanup::executor::{CleanupExecutor, CleanupReport, ExecutorConfig};
use vendor_cleanup::cleanup::lifecycle::LifecycleEvent;
use vendor_cleanup::cleanup::resolver::ConfigResolver;
use vendor_cleanup::core::config::ProjectContext;
use vendor_cleanup::core::errors::CleanupError;
use vendor_cleanup::logger::console::ConsoleSink;
use vendor_cleanup::logger::jsonl::JsonlWriter;
use vendor_cleanup::logger::{EventSink, Level};

/// Vendor Cleanup: prune tests, docs and examples from installed packages.
#[derive(Debug, Parser)]
#[command(
    name = "vendor-cleanup",
    author,
    version,
    about = "Prune tests, docs and examples from installed Composer packages",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Project directory containing composer.json.
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,
    /// Override the vendor directory.
    #[arg(long, global = true, value_name = "DIR")]
    vendor_dir: Option<PathBuf>,
    /// Print a JSON report on stdout; progress goes to stderr.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Increase verbosity (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Quiet mode (errors only).
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Also append every event to this JSONL file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Clean every configured package.
    All(RunArgs),
    /// Clean the named packages.
    Package(PackageArgs),
    /// Handle a Composer script event.
    Hook(HookArgs),
    /// Show the effective cleanup configuration.
    Show(ShowArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct RunArgs {
    /// Report what would be removed without removing anything.
    #[arg(long)]
    dry_run: bool,
    /// Exit with status 4 if any directory could not be removed.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Clone, Args)]
struct PackageArgs {
    /// Package names (vendor/name).
    #[arg(required = true, value_name = "PACKAGE")]
    packages: Vec<String>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Clone, Args)]
struct HookArgs {
    /// post-package-install, post-package-update, post-install-cmd or post-update-cmd.
    #[arg(value_name = "EVENT")]
    event: LifecycleEvent,
    /// Packages named by a per-package event.
    #[arg(value_name = "PACKAGE")]
    packages: Vec<String>,
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Debug, Clone, Args)]
struct ShowArgs {
    /// Only show the paths for this package.
    #[arg(value_name = "PACKAGE")]
    package: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or project configuration.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Some removals failed and `--strict` was given.
    #[error("{0}")]
    Partial(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Json(_) => 3,
            Self::Partial(_) => 4,
        }
    }
}

impl From<CleanupError> for CliError {
    fn from(err: CleanupError) -> Self {
        if err.is_config_error() {
            Self::User(err.to_string())
        } else {
            Self::Runtime(err.to_string())
        }
    }
}

type RunSink = (Box<dyn EventSink>, Option<JsonlWriter>);

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::All(args) => run_cleanup(cli, args, |executor, vendor| {
            executor.clean_all(vendor);
            Ok(())
        }),
        Command::Package(args) => run_cleanup(cli, &args.run, |executor, vendor| {
            for package in &args.packages {
                executor.clean_package(vendor, package);
            }
            Ok(())
        }),
        Command::Hook(args) => run_cleanup(cli, &args.run, |executor, vendor| {
            args.event.dispatch(executor, vendor, &args.packages)
        }),
        Command::Show(args) => run_show(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

const fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

fn load_project(cli: &Cli) -> Result<(ProjectContext, ConfigResolver), CliError> {
    let project = ProjectContext::load(&cli.project_dir, cli.vendor_dir.as_deref())?;
    let resolver = ConfigResolver::new(project.root.cleanup_table()?);
    Ok((project, resolver))
}

fn console_sink(cli: &Cli) -> Box<dyn EventSink> {
    let max_level = Level::from_flags(cli.verbose, cli.quiet);
    match output_mode(cli) {
        OutputMode::Human => {
            let color = !cli.no_color && io::stdout().is_terminal();
            Box::new(ConsoleSink::stdout(max_level, color))
        }
        OutputMode::Json => {
            let color = !cli.no_color && io::stderr().is_terminal();
            Box::new(ConsoleSink::stderr(max_level, color))
        }
    }
}

fn run_cleanup<F>(cli: &Cli, args: &RunArgs, drive: F) -> Result<(), CliError>
where
    F: FnOnce(&mut CleanupExecutor<RunSink>, &Path) -> Result<(), CleanupError>,
{
    let (project, resolver) = load_project(cli)?;
    let sink: RunSink = (console_sink(cli), cli.log_file.as_ref().map(JsonlWriter::open));
    let mut executor = CleanupExecutor::new(
        resolver,
        sink,
        ExecutorConfig {
            dry_run: args.dry_run,
        },
    );

    drive(&mut executor, &project.vendor_dir)?;
    let (_, report) = executor.finish();

    emit_report(cli, &project, &report)?;

    if args.strict && report.has_failures() {
        return Err(CliError::Partial(format!(
            "{} path(s) could not be removed",
            report.failures.len() + report.paths_rejected
        )));
    }
    Ok(())
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    project_dir: &'a Path,
    vendor_dir: &'a Path,
    #[serde(flatten)]
    report: &'a CleanupReport,
}

fn emit_report(
    cli: &Cli,
    project: &ProjectContext,
    report: &CleanupReport,
) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    match output_mode(cli) {
        OutputMode::Json => {
            let output = ReportOutput {
                project_dir: &project.project_dir,
                vendor_dir: &project.vendor_dir,
                report,
            };
            writeln!(stdout, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        OutputMode::Human => {
            if cli.quiet || (cli.verbose == 0 && !report.dry_run) {
                return Ok(());
            }
            let verb = if report.dry_run {
                "would remove"
            } else {
                "removed"
            };
            writeln!(
                stdout,
                "Vendor cleanup {verb} {} director{} from {} package(s); {} failure(s).",
                report.directories_removed,
                if report.directories_removed == 1 {
                    "y"
                } else {
                    "ies"
                },
                report.packages_cleaned,
                report.failures.len() + report.paths_rejected,
            )?;
        }
    }
    Ok(())
}

fn run_show(cli: &Cli, args: &ShowArgs) -> Result<(), CliError> {
    let (project, resolver) = load_project(cli)?;
    let mut stdout = io::stdout().lock();

    if let Some(package) = &args.package {
        let paths = resolver.paths_for_package(package);
        match output_mode(cli) {
            OutputMode::Json => {
                let payload = json!({ "package": package, "paths": paths });
                writeln!(stdout, "{}", serde_json::to_string_pretty(&payload)?)?;
            }
            OutputMode::Human => {
                if paths.is_empty() {
                    writeln!(stdout, "No cleanup paths configured for {package}.")?;
                }
                for path in &paths {
                    writeln!(stdout, "{path}")?;
                }
            }
        }
        return Ok(());
    }

    match output_mode(cli) {
        OutputMode::Json => {
            let payload = json!({
                "manifest": project.manifest_path,
                "vendor_dir": project.vendor_dir,
                "package_count": resolver.package_count(),
                "packages": resolver.all_cleanup_paths(),
            });
            writeln!(stdout, "{}", serde_json::to_string_pretty(&payload)?)?;
        }
        OutputMode::Human => {
            if resolver.is_unconfigured() {
                writeln!(stdout, "No packages are configured for cleanup.")?;
            }
            for (package, paths) in resolver.all_cleanup_paths() {
                writeln!(stdout, "{package}: {}", paths.join(", "))?;
            }
        }
    }
    Ok(())
}
