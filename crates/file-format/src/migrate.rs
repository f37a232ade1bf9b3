//! Upgrades of older project files.
//!
//! Steps run on the raw JSON, before typed deserialization, so a step can
//! rename or restructure fields that the current types no longer accept.

use serde_json::Value;
use tracing::debug;

use crate::errors::LoadError;

/// Rewrites a file of version `n` into version `n + 1`.
type Step = fn(Value) -> Result<Value, String>;

/// Upgrade steps keyed by the version they upgrade from.
const STEPS: &[(u32, Step)] = &[];

/// Upgrade `file` from `from_version` to `to_version`, one step at a time.
/// The `version` field is bumped after every step.
pub fn migrate(mut file: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    for version in from_version..to_version {
        let Some((_, step)) = STEPS.iter().find(|(from, _)| *from == version) else {
            return Err(LoadError::MigrationFailed {
                from: version,
                to: to_version,
                reason: format!("no upgrade from v{version}"),
            });
        };
        file = step(file).map_err(|reason| LoadError::MigrationFailed {
            from: version,
            to: version + 1,
            reason,
        })?;
        file["version"] = Value::from(version + 1);
        debug!(from = version, to = version + 1, "project file upgraded");
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_version_is_untouched() {
        let file = serde_json::json!({ "format": "pov-scene", "version": 1 });
        assert_eq!(migrate(file.clone(), 1, 1).unwrap(), file);
    }

    #[test]
    fn missing_step_names_the_version() {
        let err = migrate(serde_json::json!({}), 0, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "migration failed from version 0 to 1: no upgrade from v0"
        );
    }
}
