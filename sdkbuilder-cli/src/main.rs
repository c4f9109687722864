mod logging;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use sdkbuilder_config::{ConfigResolver, ResolvedConfig};
use sdkbuilder_core::workspace::prepare_workspace;
use sdkbuilder_core::{PipelineOrchestrator, Stage};
use sdkbuilder_types::{Environment, vars};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "sdkbuilder",
    version,
    about = "Regenerate, version and release an SDK from an API specification."
)]
struct Cli {
    /// Primary configuration file (YAML or JSON). Required.
    #[arg(long, env = "SDKBUILDER_CONFIG", global = true)]
    config: Option<Utf8PathBuf>,

    /// Optional local configuration supplying grouped environment variables.
    #[arg(long, env = "SDKBUILDER_LOCAL_CONFIG", global = true)]
    local_config: Option<Utf8PathBuf>,

    /// Directory that output/, temp/ and resources/ are resolved against.
    #[arg(long, default_value = ".", global = true)]
    root: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run prebuild, build and postbuild in order.
    FullBuild,
    /// Clone the SDK repository, diff specifications, merge notifications and bump the version.
    Prebuild,
    /// Generate the SDK, run compile scripts and archive the docs.
    Build,
    /// Tag the SDK repository and publish a release.
    Postbuild,
    /// Resolve the configuration and print it as JSON.
    CheckConfig,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let log = logging::init(Environment::from_process().flag(vars::ENABLE_LOGGER_COLOR));
    if let Err(e) = real_main(cli, &log) {
        error!("{:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(cli: Cli, log: &logging::LogHandle) -> anyhow::Result<()> {
    let config = cli
        .config
        .as_deref()
        .context("--config <PATH> (or SDKBUILDER_CONFIG) is required")?;
    let root = cli
        .root
        .canonicalize_utf8()
        .with_context(|| format!("resolve root directory {}", cli.root))?;
    let resolved = ConfigResolver::new(root)
        .resolve(config, cli.local_config.as_deref())
        .with_context(|| format!("resolve configuration {}", config))?;
    log.apply_color(resolved.logger_color());
    log.apply_config_level(resolved.log_level());

    match cli.cmd {
        Command::CheckConfig => cmd_check_config(&resolved),
        Command::FullBuild => {
            prepare(&resolved)?;
            let results = PipelineOrchestrator::from_resolved(&resolved).full_build()?;
            info!("{} stage(s) completed", results.len());
            Ok(())
        }
        Command::Prebuild => {
            prepare(&resolved)?;
            run_stage(&resolved, Stage::Prebuild)
        }
        Command::Build => run_stage(&resolved, Stage::Build),
        Command::Postbuild => run_stage(&resolved, Stage::Postbuild),
    }
}

fn prepare(resolved: &ResolvedConfig) -> anyhow::Result<()> {
    prepare_workspace(resolved.sdk_repo_dir(), resolved.sdk_temp_dir())
        .context("prepare working directories")
}

fn run_stage(resolved: &ResolvedConfig, stage: Stage) -> anyhow::Result<()> {
    PipelineOrchestrator::from_resolved(resolved).run(stage)?;
    Ok(())
}

fn cmd_check_config(resolved: &ResolvedConfig) -> anyhow::Result<()> {
    let json =
        serde_json::to_string_pretty(resolved.document()).context("serialize configuration")?;
    println!("{json}");
    Ok(())
}
