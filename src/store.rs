//! Environment stores the preserver can operate on.
//!
//! The preserver never reaches for the process environment directly. It is
//! handed an [`EnvStore`], so the same protocol runs against an in-memory map
//! in tests and against the live environment in the binary.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::hash::BuildHasher;

/// Ordered snapshot of an environment, used as the return type of
/// [`EnvStore::snapshot`] and of non-mutating restores.
pub type EnvMap = BTreeMap<String, String>;

/// Mutable key-value store over string keys and opaque string values.
pub trait EnvStore {
    /// Returns the current value of `key`, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&mut self, key: &str);

    /// Returns `true` when `key` is present, even with an empty value.
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Copies every entry into an ordered map.
    fn snapshot(&self) -> EnvMap;
}

impl EnvStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        Self::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        Self::remove(self, key);
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn snapshot(&self) -> EnvMap {
        self.clone()
    }
}

impl<S: BuildHasher> EnvStore for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<String> {
        Self::get(self, key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        Self::remove(self, key);
    }

    fn contains(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn snapshot(&self) -> EnvMap {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// The live environment of the current process.
///
/// Values that are not valid UTF-8 are reported as absent by `get` and left
/// out of snapshots, but `contains` still sees them. Writes are only sound while no other thread reads or writes the
/// environment; callers that share the process across threads must serialise
/// access themselves.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        if !is_valid_key_name(key) {
            return None;
        }
        env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if !is_valid_key_name(key) || value.contains('\0') {
            log::warn!("refusing to set unrepresentable environment variable {key:?}");
            return;
        }
        // SAFETY: `ProcessEnv` requires exclusive access to the environment.
        unsafe { env::set_var(key, value) };
    }

    fn remove(&mut self, key: &str) {
        if !is_valid_key_name(key) {
            log::warn!("refusing to remove unrepresentable environment variable {key:?}");
            return;
        }
        // SAFETY: `ProcessEnv` requires exclusive access to the environment.
        unsafe { env::remove_var(key) };
    }

    fn contains(&self, key: &str) -> bool {
        is_valid_key_name(key) && env::var_os(key).is_some()
    }

    fn snapshot(&self) -> EnvMap {
        env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}

/// Returns `true` when `key` can name a process environment variable: it is
/// non-empty and contains neither `=` nor NUL.
#[must_use]
pub fn is_valid_key_name(key: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0'])
}
