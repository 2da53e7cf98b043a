//! Binary entry point for the envpreserve CLI.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use envpreserve::{
    ConfigError, EnvStore, EnvironmentPreserver, LaunchError, Launcher, Override, OverrideError,
    PreserverConfig, ProcessEnv, RenderError, parse_key_list, render_json, render_shell,
};

mod cli;

use cli::{Cli, ExecCommand, KeySelection, OriginalCommand, ShowCommand};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Override(#[from] OverrideError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no command given")]
    MissingCommand,
    #[error("failed to write output: {0}")]
    Output(String),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let exit_code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli {
        Cli::Exec(command) => exec_command(&command),
        Cli::Original(command) => original_command(&command),
        Cli::Show(command) => show_command(&command, io::stdout()),
    }
}

fn exec_command(args: &ExecCommand) -> Result<i32, CliError> {
    let keys = resolve_keys(&args.selection)?;
    let overrides = args
        .set
        .iter()
        .map(|raw| Override::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let (program, program_args) = split_command(&args.command)?;

    let launcher = Launcher::with_process_runner(keys);
    Ok(launcher.exec(&ProcessEnv, program, &program_args, &overrides)?)
}

fn original_command(args: &OriginalCommand) -> Result<i32, CliError> {
    let keys = resolve_keys(&args.selection)?;
    let (program, program_args) = split_command(&args.command)?;

    let launcher = Launcher::with_process_runner(keys);
    Ok(launcher.exec_original(&ProcessEnv, program, &program_args)?)
}

fn show_command(args: &ShowCommand, mut target: impl Write) -> Result<i32, CliError> {
    let keys = resolve_keys(&args.selection)?;
    let mut snapshot = ProcessEnv.snapshot();
    let env = if args.original {
        EnvironmentPreserver::new(&mut snapshot, keys.iter().cloned()).restore()
    } else {
        snapshot
    };

    let rendered = if args.json {
        render_json(&env, &keys)?
    } else {
        render_shell(&env, &keys)
    };
    target
        .write_all(rendered.as_bytes())
        .map_err(|err| CliError::Output(err.to_string()))?;
    Ok(0)
}

fn resolve_keys(selection: &KeySelection) -> Result<Vec<String>, CliError> {
    let keys = match &selection.keys {
        Some(keys) => parse_key_list(keys)?,
        None => PreserverConfig::load_without_cli_args()?.watched_keys()?,
    };
    log::debug!("watching {} keys", keys.len());
    Ok(keys)
}

fn split_command(command: &[String]) -> Result<(&str, Vec<OsString>), CliError> {
    let Some((program, rest)) = command.split_first() else {
        return Err(CliError::MissingCommand);
    };
    Ok((program.as_str(), rest.iter().map(OsString::from).collect()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
