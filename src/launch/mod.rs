//! Launching child processes under a preserved environment.
//!
//! The launcher never mutates the live environment. It snapshots the
//! supplied store, runs the preserver against the copy, and hands the child
//! only the differences. Variables the snapshot cannot represent (values that
//! are not valid UTF-8) are therefore inherited unchanged.

use std::ffi::OsString;
use std::process::Command;

use thiserror::Error;

use crate::overrides::{Override, apply_overrides};
use crate::preserver::{EnvironmentPreserver, backup_key};
use crate::store::{EnvMap, EnvStore};

/// Minimal edits that turn one environment into another.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnvChanges {
    /// Variables to add or overwrite, in key order.
    pub set: Vec<(String, String)>,
    /// Variables to remove, in key order.
    pub remove: Vec<String>,
}

impl EnvChanges {
    /// Computes the edits that turn `before` into `after`.
    #[must_use]
    pub fn between(before: &EnvMap, after: &EnvMap) -> Self {
        let set = after
            .iter()
            .filter(|(key, value)| before.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let remove = before
            .keys()
            .filter(|key| !after.contains_key(*key))
            .cloned()
            .collect();
        Self { set, remove }
    }

    /// Returns `true` when no edits are required.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }
}

/// A fully described child invocation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchSpec {
    /// Program to run, resolved through `PATH` by the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
    /// Environment edits applied on top of the inherited environment.
    pub env: EnvChanges,
}

/// Abstraction over process execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs the child with inherited stdio and waits for it.
    ///
    /// Returns the exit code, or `None` when the child was terminated
    /// without one (for example by a signal).
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Spawn`] if the child cannot be started.
    fn run(&self, spec: &LaunchSpec) -> Result<Option<i32>, LaunchError>;
}

/// Real command runner that spawns a child of the current process.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, spec: &LaunchSpec) -> Result<Option<i32>, LaunchError> {
        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        for (key, value) in &spec.env.set {
            command.env(key, value);
        }
        for key in &spec.env.remove {
            command.env_remove(key);
        }

        let status = command.status().map_err(|err| LaunchError::Spawn {
            program: spec.program.clone(),
            message: err.to_string(),
        })?;
        Ok(status.code())
    }
}

/// Errors surfaced while launching a child.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum LaunchError {
    /// Raised when the child cannot be spawned.
    #[error("failed to spawn {program}: {message}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Operating system error string.
        message: String,
    },
    /// Raised when the child finishes without yielding an exit status.
    #[error("{program} terminated without an exit status")]
    MissingExitCode {
        /// Program that completed without a status.
        program: String,
    },
}

/// Runs children with watched keys backed up or restored.
#[derive(Clone, Debug)]
pub struct Launcher<R: CommandRunner> {
    runner: R,
    keys: Vec<String>,
}

impl Launcher<ProcessCommandRunner> {
    /// Creates a launcher wired to the real process runner.
    #[must_use]
    pub const fn with_process_runner(keys: Vec<String>) -> Self {
        Self::new(ProcessCommandRunner, keys)
    }
}

impl<R: CommandRunner> Launcher<R> {
    /// Creates a launcher watching `keys`.
    #[must_use]
    pub const fn new(runner: R, keys: Vec<String>) -> Self {
        Self { runner, keys }
    }

    /// Returns the watched keys.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Backs up the watched keys, applies `overrides`, and runs the child.
    ///
    /// The child sees its overrides together with the `BUNDLER_ORIG_*`
    /// restore points, so a nested invocation can recover the original
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the child cannot be spawned or exits
    /// without a status.
    pub fn exec<S: EnvStore + ?Sized>(
        &self,
        environment: &S,
        program: &str,
        args: &[OsString],
        overrides: &[Override],
    ) -> Result<i32, LaunchError> {
        let before = environment.snapshot();
        let mut after = before.clone();
        EnvironmentPreserver::new(&mut after, self.keys.iter().cloned()).backup();
        // A slot the snapshot could not represent still exists in the real
        // environment and must reach the child unchanged.
        for key in &self.keys {
            let slot = backup_key(key);
            if !before.contains_key(&slot) && environment.contains(&slot) {
                log::debug!("exec: keeping unreadable {slot} from the parent");
                after.remove(&slot);
            }
        }
        apply_overrides(&mut after, overrides);

        self.launch(program, args, EnvChanges::between(&before, &after))
    }

    /// Runs the child with every backed-up watched key restored and its
    /// backup slot removed.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError`] when the child cannot be spawned or exits
    /// without a status.
    pub fn exec_original<S: EnvStore + ?Sized>(
        &self,
        environment: &S,
        program: &str,
        args: &[OsString],
    ) -> Result<i32, LaunchError> {
        let mut before = environment.snapshot();
        let restored = EnvironmentPreserver::new(&mut before, self.keys.iter().cloned()).restore();

        self.launch(program, args, EnvChanges::between(&before, &restored))
    }

    fn launch(
        &self,
        program: &str,
        args: &[OsString],
        env: EnvChanges,
    ) -> Result<i32, LaunchError> {
        log::debug!(
            "launching {program} with {} set and {} removed variables",
            env.set.len(),
            env.remove.len()
        );
        let spec = LaunchSpec {
            program: program.to_owned(),
            args: args.to_vec(),
            env,
        };
        self.runner
            .run(&spec)?
            .ok_or_else(|| LaunchError::MissingExitCode {
                program: spec.program.clone(),
            })
    }
}
