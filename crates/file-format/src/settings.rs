//! Export settings stored as plain JSON. Missing fields take their defaults,
//! so hand-written files only need the values that differ.

use pov_export::ExportSettings;

use crate::errors::{LoadError, SaveError};

pub fn load_settings(json: &str) -> Result<ExportSettings, LoadError> {
    serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))
}

pub fn save_settings(settings: &ExportSettings) -> Result<String, SaveError> {
    serde_json::to_string_pretty(settings).map_err(|e| SaveError::Serialize {
        what: "settings",
        reason: e.to_string(),
    })
}
