//! Core library for the envpreserve tool.
//!
//! The crate implements a small backup/restore protocol over environment
//! variables. A host that overrides watched variables for a child first
//! stashes their values under `BUNDLER_ORIG_<KEY>`; anything later in the
//! process tree can then recover the original environment, however deeply
//! the host has invoked itself.

pub mod config;
pub mod launch;
pub mod overrides;
pub mod preserver;
pub mod render;
pub mod store;
pub mod test_support;

pub use config::{ConfigError, DEFAULT_WATCHED_KEYS, PreserverConfig, parse_key_list};
pub use launch::{
    CommandRunner, EnvChanges, LaunchError, LaunchSpec, Launcher, ProcessCommandRunner,
};
pub use overrides::{Override, OverrideError, apply_overrides};
pub use preserver::{BACKUP_PREFIX, EnvironmentPreserver, backup_key};
pub use render::{RenderError, WatchedEntry, render_json, render_shell, watched_entries};
pub use store::{EnvMap, EnvStore, ProcessEnv, is_valid_key_name};
