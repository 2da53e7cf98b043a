//! Rendering of watched keys and their backup slots.

use serde::Serialize;
use shell_escape::unix::escape;
use thiserror::Error;

use crate::preserver::backup_key;
use crate::store::EnvMap;

/// A watched key together with its current value and backup slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WatchedEntry {
    /// Watched key name.
    pub key: String,
    /// Current value, if set.
    pub value: Option<String>,
    /// Value of the `BUNDLER_ORIG_` slot, if present.
    pub backup: Option<String>,
}

/// Errors raised while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Raised when JSON serialisation fails.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Collects one entry per watched key, in order.
#[must_use]
pub fn watched_entries(env: &EnvMap, keys: &[String]) -> Vec<WatchedEntry> {
    keys.iter()
        .map(|key| WatchedEntry {
            key: key.clone(),
            value: env.get(key).cloned(),
            backup: env.get(&backup_key(key)).cloned(),
        })
        .collect()
}

/// Renders present watched keys and backup slots as `export` lines.
///
/// Keys that are not portable shell identifiers are skipped with a warning.
#[must_use]
pub fn render_shell(env: &EnvMap, keys: &[String]) -> String {
    let mut output = String::new();
    for entry in watched_entries(env, keys) {
        if !is_shell_identifier(&entry.key) {
            log::warn!("skipping {:?}: not a valid shell variable name", entry.key);
            continue;
        }
        if let Some(value) = &entry.value {
            push_export(&mut output, &entry.key, value);
        }
        if let Some(backup) = &entry.backup {
            push_export(&mut output, &backup_key(&entry.key), backup);
        }
    }
    output
}

/// Renders watched entries as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`RenderError::Json`] when serialisation fails.
pub fn render_json(env: &EnvMap, keys: &[String]) -> Result<String, RenderError> {
    let mut rendered = serde_json::to_string_pretty(&watched_entries(env, keys))?;
    rendered.push('\n');
    Ok(rendered)
}

/// Returns `true` for names matching `[A-Za-z_][A-Za-z0-9_]*`.
fn is_shell_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|rest| rest.is_ascii_alphanumeric() || rest == '_')
}

fn push_export(output: &mut String, key: &str, value: &str) {
    output.push_str("export ");
    output.push_str(key);
    output.push('=');
    output.push_str(escape(value.into()).as_ref());
    output.push('\n');
}
