//! CLI command definitions

use clap::Args;

/// Compile sources to the destination
#[derive(Debug, Args, Clone)]
pub struct CompileCommand {
    /// Abort the batch and exit non-zero on the first failure
    #[arg(long)]
    pub fail_fast: bool,
}

/// Delete previously generated artifacts
#[derive(Debug, Args, Clone)]
pub struct CleanCommand {}

/// Lint changed sources
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Exit non-zero when violations are found
    #[arg(long)]
    pub strict: bool,

    /// Output the outcome in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Generate style documentation
#[derive(Debug, Args, Clone)]
pub struct DocsCommand {}

/// Re-run bound operations on source changes
#[derive(Debug, Args, Clone)]
pub struct WatchCommand {
    /// Run the bound operations once before waiting for changes
    #[arg(long)]
    pub initial: bool,
}

/// List the operation catalog
#[derive(Debug, Args, Clone)]
pub struct OpsCommand {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
