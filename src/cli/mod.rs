//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{CleanCommand, CompileCommand, DocsCommand, OpsCommand, ValidateCommand, WatchCommand};

/// Staged asset pipeline for front-end builds
#[derive(Debug, Parser, Clone)]
#[command(name = "assetline")]
#[command(author = "Assetline Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A staged asset pipeline for front-end builds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration overlay file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Configuration overrides (dotted.key=value)
    #[arg(long = "set", value_parser = parse_key_value, global = true)]
    pub set: Vec<(String, String)>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compile sources to the destination
    Compile(CompileCommand),

    /// Delete previously generated artifacts
    Clean(CleanCommand),

    /// Lint changed sources
    Validate(ValidateCommand),

    /// Generate style documentation
    Docs(DocsCommand),

    /// Re-run bound operations on source changes
    Watch(WatchCommand),

    /// List the operation catalog
    Ops(OpsCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Parse key=value pairs
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid key=value pair: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

use std::ffi::OsString;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compile_with_overrides() {
        let cli = Cli::try_parse_from([
            "assetline",
            "compile",
            "--fail-fast",
            "--set",
            "dest=out",
        ])
        .unwrap();

        assert!(matches!(cli.command, Command::Compile(ref cmd) if cmd.fail_fast));
        assert_eq!(cli.set, vec![("dest".to_string(), "out".to_string())]);
    }

    #[test]
    fn test_parse_key_value_rejects_bare_key() {
        assert!(parse_key_value("no-equals").is_err());
        assert_eq!(
            parse_key_value("a=b=c").unwrap(),
            ("a".to_string(), "b=c".to_string())
        );
    }
}
