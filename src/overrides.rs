//! `KEY=VALUE` assignments a host applies after taking a backup.

use std::str::FromStr;

use thiserror::Error;

use crate::store::{EnvStore, is_valid_key_name};

/// A single variable assignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Override {
    /// Variable to set.
    pub key: String,
    /// Value to assign; may be empty.
    pub value: String,
}

impl Override {
    /// Parses `KEY=VALUE`, splitting on the first `=` so values may contain
    /// further `=` characters.
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError::MissingSeparator`] when no `=` is present and
    /// [`OverrideError::InvalidKey`] when the key is empty or contains NUL.
    pub fn parse(raw: &str) -> Result<Self, OverrideError> {
        let Some((key, value)) = raw.split_once('=') else {
            return Err(OverrideError::MissingSeparator {
                argument: raw.to_owned(),
            });
        };
        if !is_valid_key_name(key) {
            return Err(OverrideError::InvalidKey {
                key: key.to_owned(),
            });
        }
        Ok(Self {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

impl FromStr for Override {
    type Err = OverrideError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

/// Errors raised while parsing overrides.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum OverrideError {
    /// Raised when the argument has no `=`.
    #[error("override {argument:?} must have the form KEY=VALUE")]
    MissingSeparator {
        /// Argument as supplied.
        argument: String,
    },
    /// Raised when the key cannot name an environment variable.
    #[error("override key {key:?} is not a valid variable name")]
    InvalidKey {
        /// Key portion of the argument.
        key: String,
    },
}

/// Sets every override on `store`, in order. Later entries win.
pub fn apply_overrides<S: EnvStore + ?Sized>(store: &mut S, overrides: &[Override]) {
    for assignment in overrides {
        log::debug!("override: setting {}", assignment.key);
        store.set(&assignment.key, &assignment.value);
    }
}
