mod config;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, RunOverrides};
use kraise_core::adapters::FsWritePort;
use kraise_core::pipeline::{ToolError, check_fixed_point, run_policy};
use kraise_core::settings::{CheckSettings, RunSettings};
use kraise_types::Policy;
use kraise_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "kraise",
    version,
    about = "Drive a Kconfig-style symbol database to its allyes (or allno) fixed point."
)]
struct Cli {
    /// Path to kraise.toml (default: ./kraise.toml if present).
    #[arg(long, global = true)]
    config_file: Option<Utf8PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Raise every symbol and choice as far as it will go.
    Allyes(RunArgs),
    /// Lower every symbol and choice as far as it will go.
    Allno(RunArgs),
    /// Check whether an existing .config is already at a fixed point.
    Check(CheckArgs),
}

#[derive(Debug, Parser)]
struct RunArgs {
    /// Symbol database (TOML).
    db: Utf8PathBuf,

    /// Output .config path (default: .config).
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Existing .config to start from.
    #[arg(long)]
    base: Option<Utf8PathBuf>,

    /// Give up after this many passes without a fixed point.
    #[arg(
        long,
        conflicts_with = "unbounded",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    max_passes: Option<u64>,

    /// Keep passing until a fixed point, however long that takes.
    #[arg(long, default_value_t = false)]
    unbounded: bool,

    /// Write a JSON run report here.
    #[arg(long)]
    report: Option<Utf8PathBuf>,

    /// Symbol prefix in .config files (default: CONFIG_).
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Symbol database (TOML).
    db: Utf8PathBuf,

    /// The .config to check.
    #[arg(long)]
    config: Utf8PathBuf,

    /// Policy whose fixed point is expected (allyes, allno).
    #[arg(long, default_value = "allyes")]
    policy: Policy,

    /// Symbol prefix in .config files (default: CONFIG_).
    #[arg(long)]
    prefix: Option<String>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn real_main() -> Result<(), ToolError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = config::load_or_default(Utf8Path::new("."), cli.config_file.as_deref())?;
    let merger = ConfigMerger::new(file_config);

    match cli.cmd {
        Command::Allyes(args) => cmd_run(Policy::AllYes, args, merger),
        Command::Allno(args) => cmd_run(Policy::AllNo, args, merger),
        Command::Check(args) => cmd_check(args, merger),
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "kraise".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn cmd_run(policy: Policy, args: RunArgs, merger: ConfigMerger) -> Result<(), ToolError> {
    let merged = merger.merge_run_args(&RunOverrides {
        max_passes: args.max_passes,
        unbounded: args.unbounded,
        out: args.out,
        prefix: args.prefix,
    });
    debug!(
        "merged config: max_passes={:?}, out={}, prefix={}",
        merged.max_passes, merged.out, merged.prefix
    );

    let settings = RunSettings {
        db_path: args.db,
        base_config: args.base,
        out_path: merged.out,
        report_path: args.report,
        policy,
        max_passes: merged.max_passes,
        prefix: merged.prefix,
        header: merged.header,
    };

    let outcome = run_policy(&settings, &FsWritePort, tool_info())?;
    println!(
        "{}: wrote {} ({} changes in {} passes)",
        policy,
        settings.out_path,
        outcome.raise.mutations.len(),
        outcome.raise.passes
    );
    Ok(())
}

fn cmd_check(args: CheckArgs, merger: ConfigMerger) -> Result<(), ToolError> {
    let settings = CheckSettings {
        prefix: merger.merge_prefix(args.prefix.as_deref()),
        db_path: args.db,
        config_path: args.config,
        policy: args.policy,
    };

    let outcome = check_fixed_point(&settings)?;
    match args.format {
        OutputFormat::Text => {
            for target in &outcome.unsettled {
                println!("unsettled: {}", target);
            }
            if outcome.is_settled() {
                println!("{}: {} is at a fixed point", outcome.policy, settings.config_path);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "policy": outcome.policy,
                "settled": outcome.is_settled(),
                "unsettled": outcome.unsettled,
            });
            let text = serde_json::to_string_pretty(&json)
                .map_err(|e| ToolError::Internal(anyhow::Error::new(e)))?;
            println!("{}", text);
        }
    }
    outcome.into_result().map(|_| ())
}
