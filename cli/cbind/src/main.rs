//! cbind CLI: generate cgo wrappers from binding declarations.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use manifest::CbindManifest;

#[derive(Parser)]
#[command(name = "cbind", version, about = "Generate cgo bindings for C-ABI libraries")]
struct Cli {
    /// Log debug output to stderr (overridden by CBIND_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go source file from a binding declaration (.bind.toml)
    Generate {
        /// Binding declaration file
        declaration: String,
        /// Output file (default: [output] file in cbind.toml, else stdout)
        #[arg(long, short)]
        output: Option<String>,
        /// Package name of the generated file
        #[arg(long)]
        package: Option<String>,
    },
    /// Show the normalized records of a binding declaration
    Inspect {
        /// Binding declaration file
        declaration: String,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Use CBIND_LOG for the filter, defaulting to "warn" (or "debug" with --verbose).
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CBIND_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Generate {
            declaration,
            output,
            package,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or_else(|| cwd.clone());
            commands::generate::run(
                &cwd,
                &project_dir,
                manifest.as_ref(),
                &declaration,
                output.as_deref(),
                package.as_deref(),
            )
        }

        Commands::Inspect {
            declaration,
            format,
        } => {
            let (manifest, _) = load_manifest_optional(&cwd)?;
            commands::inspect::run(&cwd, manifest.as_ref(), &declaration, format.as_deref())
        }
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<CbindManifest>, Option<PathBuf>)> {
    match CbindManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
