//! Command-line interface definitions for the `envpreserve` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser};

/// Top-level CLI for the `envpreserve` binary.
#[derive(Debug, Parser)]
#[command(
    name = "envpreserve",
    about = "Run commands with watched environment variables backed up or restored",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Back up watched keys, apply overrides, and run a command.
    #[command(
        name = "exec",
        about = "Back up watched keys, apply overrides, and run a command"
    )]
    Exec(ExecCommand),
    /// Run a command with the original values of watched keys.
    #[command(
        name = "original",
        about = "Run a command with the original values of watched keys"
    )]
    Original(OriginalCommand),
    /// Print watched keys and their backup slots.
    #[command(name = "show", about = "Print watched keys and their backup slots")]
    Show(ShowCommand),
}

/// Watched key selection shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct KeySelection {
    /// Comma-separated keys to watch, overriding `ENVPRESERVE_KEYS` and
    /// `envpreserve.toml`.
    #[arg(long, value_name = "KEYS", value_delimiter = ',')]
    pub(crate) keys: Option<Vec<String>>,
}

/// Arguments for the `envpreserve exec` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ExecCommand {
    #[command(flatten)]
    pub(crate) selection: KeySelection,
    /// Variable to set for the command after the backup is taken.
    ///
    /// May be repeated; later assignments to the same key win.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub(crate) set: Vec<String>,
    /// Command to execute (use -- to separate flags).
    #[arg(required = true, trailing_var_arg = true)]
    pub(crate) command: Vec<String>,
}

/// Arguments for the `envpreserve original` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct OriginalCommand {
    #[command(flatten)]
    pub(crate) selection: KeySelection,
    /// Command to execute (use -- to separate flags).
    #[arg(required = true, trailing_var_arg = true)]
    pub(crate) command: Vec<String>,
}

/// Arguments for the `envpreserve show` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ShowCommand {
    #[command(flatten)]
    pub(crate) selection: KeySelection,
    /// Show the environment as it would look after a restore.
    #[arg(long)]
    pub(crate) original: bool,
    /// Emit JSON instead of shell `export` lines.
    #[arg(long)]
    pub(crate) json: bool,
}
