//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::launch::{CommandRunner, LaunchError, LaunchSpec};
use crate::store::EnvMap;

/// Scripted command runner that returns pre-seeded exit codes in FIFO order.
///
/// Used to observe launched children without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<Result<Option<i32>, LaunchError>>>>,
    invocations: Rc<RefCell<Vec<LaunchSpec>>>,
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all launches recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<LaunchSpec> {
        self.invocations.borrow().clone()
    }

    /// Pushes a successful exit status.
    pub fn push_success(&self) {
        self.push_exit_code(0);
    }

    /// Pushes a specific exit code.
    pub fn push_exit_code(&self, code: i32) {
        self.responses.borrow_mut().push_back(Ok(Some(code)));
    }

    /// Pushes a response with no exit code to simulate abnormal termination.
    pub fn push_missing_exit_code(&self) {
        self.responses.borrow_mut().push_back(Ok(None));
    }

    /// Pushes a spawn failure.
    pub fn push_spawn_failure(&self, message: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Err(LaunchError::Spawn {
                program: String::from("scripted"),
                message: message.into(),
            }));
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &LaunchSpec) -> Result<Option<i32>, LaunchError> {
        self.invocations.borrow_mut().push(spec.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LaunchError::Spawn {
                    program: spec.program.clone(),
                    message: String::from("no scripted response available"),
                })
            })
    }
}

/// Builds an [`EnvMap`] from literal pairs.
#[must_use]
pub fn env_map(entries: &[(&str, &str)]) -> EnvMap {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}
