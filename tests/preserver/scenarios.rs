//! BDD scenarios for environment preservation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{PreserverContext, preserver_context};

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Back up a watched variable"
)]
fn scenario_back_up(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Skip empty variables during backup"
)]
fn scenario_skip_empty(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Nested backups keep the outermost original"
)]
fn scenario_nested_backup(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Restore an original value"
)]
fn scenario_restore(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Keep the current value when the backup slot is empty"
)]
fn scenario_empty_backup_slot(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Children see overrides and restore points"
)]
fn scenario_exec_with_override(preserver_context: PreserverContext) {
    let _ = preserver_context;
}

#[scenario(
    path = "tests/features/preserver.feature",
    name = "Children can run with the original environment"
)]
fn scenario_exec_original(preserver_context: PreserverContext) {
    let _ = preserver_context;
}
