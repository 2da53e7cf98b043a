//! BDD step definitions for environment preservation.

use envpreserve::{EnvMap, EnvironmentPreserver, LaunchSpec, Launcher, Override};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{LaunchOutcome, PreserverContext};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("the variable \"{key}\" is set to \"{value}\"")]
fn variable_is_set(
    mut preserver_context: PreserverContext,
    key: String,
    value: String,
) -> PreserverContext {
    preserver_context.env.insert(key, value);
    preserver_context
}

#[given("the variable \"{key}\" is set to an empty value")]
fn variable_is_empty(mut preserver_context: PreserverContext, key: String) -> PreserverContext {
    preserver_context.env.insert(key, String::new());
    preserver_context
}

#[given("the preserver watches \"{key}\"")]
fn preserver_watches(mut preserver_context: PreserverContext, key: String) -> PreserverContext {
    preserver_context.keys.push(key);
    preserver_context
}

#[given("the child exits with code {code:i32}")]
fn child_exits_with(preserver_context: PreserverContext, code: i32) -> PreserverContext {
    preserver_context.runner.push_exit_code(code);
    preserver_context
}

#[when("I back up the environment")]
fn back_up(mut preserver_context: PreserverContext) -> PreserverContext {
    let keys = preserver_context.keys.clone();
    EnvironmentPreserver::new(&mut preserver_context.env, keys).backup();
    preserver_context
}

#[when("the variable \"{key}\" is overridden with \"{value}\"")]
fn variable_is_overridden(
    mut preserver_context: PreserverContext,
    key: String,
    value: String,
) -> PreserverContext {
    preserver_context.env.insert(key, value);
    preserver_context
}

#[when("I restore the environment")]
fn restore(mut preserver_context: PreserverContext) -> PreserverContext {
    let keys = preserver_context.keys.clone();
    let restored = EnvironmentPreserver::new(&mut preserver_context.env, keys).restore();
    preserver_context.restored = Some(restored);
    preserver_context
}

#[when("I exec \"{program}\" overriding \"{key}\" with \"{value}\"")]
fn exec_with_override(
    mut preserver_context: PreserverContext,
    program: String,
    key: String,
    value: String,
) -> PreserverContext {
    let launcher = Launcher::new(
        preserver_context.runner.clone(),
        preserver_context.keys.clone(),
    );
    let overrides = [Override { key, value }];
    let result = launcher.exec(&preserver_context.env, &program, &[], &overrides);
    preserver_context.outcome = Some(match result {
        Ok(code) => LaunchOutcome::Exited(code),
        Err(err) => LaunchOutcome::Failed(err.to_string()),
    });
    preserver_context
}

#[when("I exec \"{program}\" with the original environment")]
fn exec_original(mut preserver_context: PreserverContext, program: String) -> PreserverContext {
    let launcher = Launcher::new(
        preserver_context.runner.clone(),
        preserver_context.keys.clone(),
    );
    let result = launcher.exec_original(&preserver_context.env, &program, &[]);
    preserver_context.outcome = Some(match result {
        Ok(code) => LaunchOutcome::Exited(code),
        Err(err) => LaunchOutcome::Failed(err.to_string()),
    });
    preserver_context
}

fn expect_value(env: &EnvMap, key: &str, expected: Option<&str>) -> Result<(), StepError> {
    let actual = env.get(key).map(String::as_str);
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {key} to be {expected:?}, got {actual:?}"
        )))
    }
}

fn restored(preserver_context: &PreserverContext) -> Result<&EnvMap, StepError> {
    preserver_context
        .restored
        .as_ref()
        .ok_or_else(|| StepError::Assertion(String::from("restore was not run")))
}

fn only_launch(preserver_context: &PreserverContext) -> Result<LaunchSpec, StepError> {
    let invocations = preserver_context.runner.invocations();
    match invocations.as_slice() {
        [spec] => Ok(spec.clone()),
        other => Err(StepError::Assertion(format!(
            "expected exactly one launch, got {}",
            other.len()
        ))),
    }
}

#[then("the variable \"{key}\" is \"{value}\"")]
fn variable_has_value(
    preserver_context: &PreserverContext,
    key: String,
    value: String,
) -> Result<(), StepError> {
    expect_value(&preserver_context.env, &key, Some(value.as_str()))
}

#[then("the variable \"{key}\" is unset")]
fn variable_is_unset(preserver_context: &PreserverContext, key: String) -> Result<(), StepError> {
    expect_value(&preserver_context.env, &key, None)
}

#[then("the restored variable \"{key}\" is \"{value}\"")]
fn restored_has_value(
    preserver_context: &PreserverContext,
    key: String,
    value: String,
) -> Result<(), StepError> {
    expect_value(restored(preserver_context)?, &key, Some(value.as_str()))
}

#[then("the restored variable \"{key}\" is unset")]
fn restored_is_unset(preserver_context: &PreserverContext, key: String) -> Result<(), StepError> {
    expect_value(restored(preserver_context)?, &key, None)
}

#[then("the child exit code is {code:i32}")]
fn child_exit_code(preserver_context: &PreserverContext, code: i32) -> Result<(), StepError> {
    match preserver_context.outcome.as_ref() {
        Some(LaunchOutcome::Exited(actual)) if *actual == code => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected exit code {code}, got {other:?}"
        ))),
    }
}

#[then("the child receives \"{key}\" as \"{value}\"")]
fn child_receives(
    preserver_context: &PreserverContext,
    key: String,
    value: String,
) -> Result<(), StepError> {
    let spec = only_launch(preserver_context)?;
    if spec.env.set.iter().any(|(name, set)| *name == key && *set == value) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected child to receive {key}={value}, got {:?}",
            spec.env.set
        )))
    }
}

#[then("the child has \"{key}\" removed")]
fn child_has_removed(preserver_context: &PreserverContext, key: String) -> Result<(), StepError> {
    let spec = only_launch(preserver_context)?;
    if spec.env.remove.contains(&key) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected child to lose {key}, got removals {:?}",
            spec.env.remove
        )))
    }
}
