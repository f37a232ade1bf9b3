use pov_export::CameraPose;
use scene_types::SceneDocument;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::errors::LoadError;
use crate::metadata::ProjectMetadata;
use crate::migrate::migrate;
use crate::save::{FORMAT_ID, FORMAT_VERSION};

/// The top-level file structure for deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SceneFileRaw {
    pub format: String,
    pub version: u32,
    pub project: ProjectMetadata,
    pub document: SceneDocument,
    /// Older files may lack a camera; the default view is used then.
    #[serde(default)]
    pub camera: CameraPose,
}

/// A project after validation and migration.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub document: SceneDocument,
    pub camera: CameraPose,
    pub metadata: ProjectMetadata,
}

/// Format identifier and version, read before anything else.
#[derive(Debug, Deserialize)]
struct FileHeader {
    format: String,
    version: u32,
}

fn parse_error(e: serde_json::Error) -> LoadError {
    LoadError::ParseError(e.to_string())
}

/// Deserialize a project from a JSON string.
///
/// Validates the format identifier and version, and upgrades older files
/// before reading them into typed structures.
pub fn load_project(json: &str) -> Result<LoadedProject, LoadError> {
    let file: Value = serde_json::from_str(json).map_err(parse_error)?;
    let header = FileHeader::deserialize(&file).map_err(parse_error)?;

    if header.format != FORMAT_ID {
        return Err(LoadError::UnknownFormat(header.format));
    }

    if header.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: header.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let file = if header.version < FORMAT_VERSION {
        migrate(file, header.version, FORMAT_VERSION)?
    } else {
        file
    };
    let raw = SceneFileRaw::deserialize(file).map_err(parse_error)?;
    debug!(project = %raw.project.name, nodes = raw.document.len(), "project loaded");

    Ok(LoadedProject {
        document: raw.document,
        camera: raw.camera,
        metadata: raw.project,
    })
}
