use pov_export::CameraPose;
use scene_types::SceneDocument;
use serde::Serialize;

use crate::errors::SaveError;
use crate::metadata::ProjectMetadata;

/// Current file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Format identifier written into every project file.
pub const FORMAT_ID: &str = "pov-scene";

/// The top-level file structure.
#[derive(Debug, Clone, Serialize)]
pub struct SceneFile<'a> {
    /// Format identifier.
    pub format: &'a str,
    /// Format version number.
    pub version: u32,
    pub project: &'a ProjectMetadata,
    /// The scene graph.
    pub document: &'a SceneDocument,
    /// Viewport camera at the time of saving.
    pub camera: &'a CameraPose,
}

/// Serialize a project to a pretty-printed JSON string.
pub fn save_project(
    document: &SceneDocument,
    camera: &CameraPose,
    metadata: &ProjectMetadata,
) -> Result<String, SaveError> {
    let file = SceneFile {
        format: FORMAT_ID,
        version: FORMAT_VERSION,
        project: metadata,
        document,
        camera,
    };
    serde_json::to_string_pretty(&file).map_err(|e| SaveError::Serialize {
        what: "project",
        reason: e.to_string(),
    })
}
