use anyhow::{Context, Result};
use assetline::cli::commands::{CompileCommand, OpsCommand, ValidateCommand, WatchCommand};
use assetline::cli::output::*;
use assetline::cli::{Cli, Command};
use assetline::core::outcome::{FailureMode, LintMode};
use assetline::core::{Pipeline, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let config = load_config(&cli).context("Failed to load configuration")?;
    println!(
        "{} Pipeline: {}",
        INFO,
        style(&config.name).bold()
    );
    let pipeline = Pipeline::from_config(config);

    // Execute command
    match &cli.command {
        Command::Compile(cmd) => run_compile(&pipeline, cmd).await,
        Command::Clean(_) => run_clean(&pipeline).await,
        Command::Validate(cmd) => run_validate(&pipeline, cmd).await,
        Command::Docs(_) => run_docs(&pipeline).await,
        Command::Watch(cmd) => run_watch(pipeline, cmd).await,
        Command::Ops(cmd) => list_operations(cmd),
    }
}

/// Resolve the configuration overlay: an explicit --config path, the
/// default overlay file when present, or bare defaults; --set pairs win.
fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let path: Option<PathBuf> = match &cli.config {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let default = Path::new("assetline.yml");
            default.exists().then(|| default.to_path_buf())
        }
    };
    PipelineConfig::load(path.as_deref(), &cli.set)
}

async fn run_compile(pipeline: &Pipeline, cmd: &CompileCommand) -> Result<()> {
    let mode = if cmd.fail_fast {
        FailureMode::FailFast
    } else {
        FailureMode::Resilient
    };

    let outcome = pipeline.compile().run(mode).await;
    println!("{}", format_outcome(&outcome));
    for failure in &outcome.failures {
        println!("{}", format_failure(failure));
    }

    if cmd.fail_fast && !outcome.is_success() {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}

async fn run_clean(pipeline: &Pipeline) -> Result<()> {
    let outcome = pipeline.clean().run().await;
    println!("{}", format_outcome(&outcome));
    Ok(())
}

async fn run_validate(pipeline: &Pipeline, cmd: &ValidateCommand) -> Result<()> {
    let mode = if cmd.strict {
        LintMode::Strict
    } else {
        LintMode::Lenient
    };

    let outcome = pipeline.validate().run(mode).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", format_outcome(&outcome));
        for failure in &outcome.failures {
            println!("{}", format_failure(failure));
        }
    }

    if cmd.strict && !outcome.is_success() {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}

async fn run_docs(pipeline: &Pipeline) -> Result<()> {
    let outcome = pipeline.docs().run().await;
    println!("{}", format_outcome(&outcome));
    for failure in &outcome.failures {
        println!("{}", format_failure(failure));
    }
    Ok(())
}

async fn run_watch(pipeline: Pipeline, cmd: &WatchCommand) -> Result<()> {
    let session = pipeline.watch();
    println!(
        "{} Watching {} path(s), operations: {}",
        EYES,
        style(session.plan().paths.len()).cyan(),
        style(session.plan().bound_operations().join(", ")).bold()
    );

    if cmd.initial {
        session.trigger().await;
    }

    let spinner = create_watch_spinner("waiting for changes...".to_string());
    let result = session.run().await;
    spinner.finish_and_clear();

    result.context("Watch session ended unexpectedly")
}

fn list_operations(cmd: &OpsCommand) -> Result<()> {
    let operations = Pipeline::operations();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&operations)?);
        return Ok(());
    }

    println!("{} Available operations:", INFO);
    for op in operations {
        println!(
            "  {} ({}) - {}",
            style(op.display_name).bold(),
            style(op.name).cyan(),
            op.description
        );
    }
    Ok(())
}
