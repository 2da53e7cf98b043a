//! Behavioural coverage for backup, restore, and launching.

mod bdd_steps;
mod scenarios;
