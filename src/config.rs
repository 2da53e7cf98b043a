//! Watched-key configuration loading via `ortho-config`.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::store::is_valid_key_name;

/// Variables a Ruby dependency manager overrides for its children, watched
/// when no other key list is configured.
pub const DEFAULT_WATCHED_KEYS: &[&str] = &[
    "BUNDLE_BIN_PATH",
    "BUNDLE_GEMFILE",
    "BUNDLER_VERSION",
    "BUNDLER_SETUP",
    "GEM_HOME",
    "GEM_PATH",
    "MANPAGER",
    "PAGER",
    "PATH",
    "RB_USER_INSTALL",
    "RUBYLIB",
    "RUBYOPT",
];

/// Preserver settings derived from configuration files and environment
/// variables.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "ENVPRESERVE",
    discovery(
        app_name = "envpreserve",
        env_var = "ENVPRESERVE_CONFIG_PATH",
        config_file_name = "envpreserve.toml",
        dotfile_name = ".envpreserve.toml",
        project_file_name = "envpreserve.toml"
    )
)]
pub struct PreserverConfig {
    /// Comma-separated list of watched keys. Defaults to
    /// [`DEFAULT_WATCHED_KEYS`].
    #[ortho_config(default = DEFAULT_WATCHED_KEYS.join(","))]
    pub keys: String,
}

impl PreserverConfig {
    /// Builds a configuration watching the comma-separated `keys`.
    #[must_use]
    pub fn from_keys(keys: impl Into<String>) -> Self {
        Self { keys: keys.into() }
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("envpreserve")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Returns the configured watched keys, validated and de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] when an entry cannot name an
    /// environment variable.
    pub fn watched_keys(&self) -> Result<Vec<String>, ConfigError> {
        parse_key_list(self.keys.split(','))
    }
}

/// Normalises a watched key list: entries are trimmed, blanks dropped, and
/// repeats removed keeping the first occurrence.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidKey`] when an entry contains `=` or NUL.
pub fn parse_key_list<I, K>(keys: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let mut parsed: Vec<String> = Vec::new();
    for raw in keys {
        let key = raw.as_ref().trim();
        if key.is_empty() || parsed.iter().any(|existing| existing == key) {
            continue;
        }
        if !is_valid_key_name(key) {
            return Err(ConfigError::InvalidKey {
                key: key.to_owned(),
            });
        }
        parsed.push(key.to_owned());
    }
    Ok(parsed)
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
    /// Raised when a watched key cannot name an environment variable.
    #[error(
        "invalid watched key {key:?}: names must not contain '=' or NUL; \
         check ENVPRESERVE_KEYS or keys in envpreserve.toml"
    )]
    InvalidKey {
        /// Offending entry after trimming.
        key: String,
    },
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
