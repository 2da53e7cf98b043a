//! Backup and restore of watched environment variables.
//!
//! A host that overrides variables for a child process first calls
//! [`EnvironmentPreserver::backup`], which stashes each watched key's value
//! under `BUNDLER_ORIG_<KEY>`. [`EnvironmentPreserver::restore`] later yields
//! the environment with those stashed values put back.
//!
//! A backup slot is never overwritten while it exists. When the host invokes
//! itself, the inner `backup` therefore keeps the outer invocation's original
//! value, and restoring from any depth returns to the outermost state.
//!
//! Empty values are treated as unset on both sides: an empty watched key is
//! not backed up, and an empty backup slot is not restored.

use log::debug;

use crate::store::{EnvMap, EnvStore};

/// Prefix prepended to a watched key to name its backup slot.
pub const BACKUP_PREFIX: &str = "BUNDLER_ORIG_";

/// Returns the backup slot name for `key`.
#[must_use]
pub fn backup_key(key: &str) -> String {
    format!("{BACKUP_PREFIX}{key}")
}

/// Applies the backup/restore protocol to a borrowed [`EnvStore`].
#[derive(Debug)]
pub struct EnvironmentPreserver<'env, S: EnvStore + ?Sized> {
    environment: &'env mut S,
    keys: Vec<String>,
}

impl<'env, S: EnvStore + ?Sized> EnvironmentPreserver<'env, S> {
    /// Creates a preserver over `environment` watching `keys`.
    ///
    /// Construction does not touch the store.
    pub fn new<I, K>(environment: &'env mut S, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            environment,
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the watched keys in the order they were supplied.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Copies every non-empty watched value into its backup slot, unless that
    /// slot already exists.
    ///
    /// Watched keys themselves and unwatched keys are left untouched. Returns
    /// the store for convenience.
    pub fn backup(&mut self) -> &S {
        for key in &self.keys {
            let Some(value) = self.environment.get(key).filter(|value| !value.is_empty()) else {
                debug!("backup: {key} is unset or empty, skipping");
                continue;
            };
            let slot = backup_key(key);
            if self.environment.contains(&slot) {
                debug!("backup: {slot} already present, keeping earlier value");
                continue;
            }
            debug!("backup: saving {key} into {slot}");
            self.environment.set(&slot, &value);
        }
        &*self.environment
    }

    /// Returns a copy of the environment with every non-empty backup slot
    /// moved back onto its watched key.
    ///
    /// The borrowed store is not modified.
    #[must_use]
    pub fn restore(&self) -> EnvMap {
        let mut restored = self.environment.snapshot();
        restore_into(&mut restored, &self.keys);
        restored
    }

    /// Applies the same per-key effect as [`Self::restore`] directly to the
    /// borrowed store.
    pub fn restore_in_place(&mut self) {
        restore_into(&mut *self.environment, &self.keys);
    }
}

fn restore_into<T: EnvStore + ?Sized>(store: &mut T, keys: &[String]) {
    for key in keys {
        let slot = backup_key(key);
        let Some(original) = store.get(&slot).filter(|value| !value.is_empty()) else {
            debug!("restore: no usable {slot}, keeping current {key}");
            continue;
        };
        debug!("restore: moving {slot} back onto {key}");
        store.set(key, &original);
        store.remove(&slot);
    }
}
