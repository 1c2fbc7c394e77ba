//! CLI for `tonic-transcode`.
//!
//! # Subcommands
//!
//! ```text
//! # Print every resolved binding as YAML
//! tonic-transcode resolve --descriptor descriptor.bin
//!
//! # One method, as JSON, written to a file
//! tonic-transcode resolve \
//!   --descriptor descriptor.bin \
//!   --method UserService.GetUser \
//!   --format json \
//!   --output get_user.json
//!
//! # Fail (exit code 1) if any annotated method does not resolve
//! tonic-transcode check --descriptor descriptor.bin --config transcode.yaml
//! ```
//!
//! Build the descriptor with `buf build -o descriptor.bin` or
//! `protoc --include_imports --descriptor_set_out=descriptor.bin`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tonic_transcode::{Resolver, ResolverConfig, Schema};
use tonic_transcode_cli::{ProjectConfig, Report};
use tracing_subscriber::EnvFilter;

/// Resolve `google.api.http` transcoding bindings from a descriptor set.
#[derive(Parser)]
#[command(name = "tonic-transcode", version, about)]
struct Cli {
    /// Log resolution details to stderr (same as `RUST_LOG=debug`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print resolved bindings (path, body and query parameters per route).
    Resolve(ResolveArgs),

    /// Resolve every binding and report all failures.
    ///
    /// Exits with a non-zero status if any method fails to resolve.
    Check(CheckArgs),
}

#[derive(Parser)]
struct ResolveArgs {
    /// Path to the compiled proto `FileDescriptorSet` (binary).
    #[arg(short, long)]
    descriptor: PathBuf,

    /// Path to a project config file (`.yaml`, `.yml` or `.toml`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Only resolve this method (`Service.Method` or fully-qualified).
    #[arg(short, long)]
    method: Option<String>,

    /// Write the report to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the compiled proto `FileDescriptorSet` (binary).
    #[arg(short, long)]
    descriptor: PathBuf,

    /// Path to a project config file (`.yaml`, `.yml` or `.toml`).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resolve(args) => run_resolve(&args).map(|()| ExitCode::SUCCESS),
        Command::Check(args) => run_check(&args),
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, or `debug` with `-v`).
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(path: &Path) -> anyhow::Result<Schema> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read descriptor: {}", path.display()))?;
    Schema::decode(&bytes)
        .with_context(|| format!("Failed to load descriptor set: {}", path.display()))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ResolverConfig> {
    let project = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            ProjectConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => ProjectConfig::default(),
    };
    Ok(project.apply(ResolverConfig::new()))
}

fn run_resolve(args: &ResolveArgs) -> anyhow::Result<()> {
    let schema = load_schema(&args.descriptor)?;
    let resolver = Resolver::new(&schema, load_config(args.config.as_ref())?);

    let report = match &args.method {
        Some(name) => {
            let method = schema
                .method(name)
                .with_context(|| format!("Method '{name}' not found in descriptor set"))?;
            let bindings = resolver
                .resolve_method(method)
                .context("Failed to resolve bindings")?;
            Report::from_method(method, &bindings)
        }
        None => {
            let services = resolver
                .resolve_services()
                .context("Failed to resolve bindings")?;
            Report::from_services(&services)
        }
    };

    let rendered = match args.format {
        Format::Yaml => report.to_yaml(),
        Format::Json => report.to_json(),
    }
    .context("Failed to render report")?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            eprintln!(
                "Wrote {} bindings to {}",
                report.binding_count(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn run_check(args: &CheckArgs) -> anyhow::Result<ExitCode> {
    let schema = load_schema(&args.descriptor)?;
    let resolver = Resolver::new(&schema, load_config(args.config.as_ref())?);

    let mut resolved = 0;
    let mut failures = Vec::new();
    for service in resolver.services() {
        for method in service.methods() {
            match resolver.resolve_method(method) {
                Ok(bindings) => resolved += bindings.len(),
                Err(err) => failures.push(err),
            }
        }
    }

    for err in &failures {
        eprintln!("error: {err}");
    }
    eprintln!("{resolved} bindings resolved, {} methods failed", failures.len());

    Ok(if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
