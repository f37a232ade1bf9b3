use std::path::{Path, PathBuf};

use scene_types::Rotation;
use serde::{Deserialize, Serialize};

use crate::resources::IncludeResource;
use crate::settings::ExportSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraKind {
    #[default]
    Perspective,
    Orthographic,
}

/// Snapshot of the viewport camera at export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub kind: CameraKind,
    pub orientation: Rotation,
    pub position: [f64; 3],
    /// Visible height of an orthographic view, in millimetres.
    pub height: f64,
    /// Unit vector the camera looks along.
    pub view_direction: [f64; 3],
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            kind: CameraKind::Perspective,
            orientation: Rotation::IDENTITY,
            position: [0.0, 0.0, 100.0],
            height: 100.0,
            view_direction: [0.0, 0.0, -1.0],
        }
    }
}

/// Names of every file one export reads or writes, derived from the project
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub directory: PathBuf,
    pub project_name: String,
}

impl OutputPaths {
    pub fn new(directory: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            project_name: project_name.into(),
        }
    }

    pub fn pov_name(&self) -> String {
        format!("{}.pov", self.project_name)
    }

    pub fn ini_name(&self) -> String {
        format!("{}.ini", self.project_name)
    }

    pub fn image_name(&self) -> String {
        format!("{}.png", self.project_name)
    }

    pub fn user_inc_name(&self) -> String {
        format!("{}_user.inc", self.project_name)
    }

    pub fn texture_inc_name(&self) -> String {
        format!("{}_textures.inc", self.project_name)
    }

    pub fn mesh_inc_name(&self) -> String {
        format!("{}_mesh.inc", self.project_name)
    }

    pub fn error_log_name(&self) -> String {
        format!("{}_error.txt", self.project_name)
    }

    pub fn fc_view_name(&self) -> String {
        format!("{}_fcview.png", self.project_name)
    }

    /// Full path of a file inside the output directory.
    pub fn path(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }

    pub fn pov(&self) -> PathBuf {
        self.path(&self.pov_name())
    }

    pub fn ini(&self) -> PathBuf {
        self.path(&self.ini_name())
    }

    pub fn user_inc(&self) -> PathBuf {
        self.path(&self.user_inc_name())
    }

    pub fn texture_inc(&self) -> PathBuf {
        self.path(&self.texture_inc_name())
    }

    pub fn mesh_inc(&self) -> PathBuf {
        self.path(&self.mesh_inc_name())
    }

    pub fn error_log(&self) -> PathBuf {
        self.path(&self.error_log_name())
    }

    pub fn fc_view(&self) -> PathBuf {
        self.path(&self.fc_view_name())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Read-only inputs of one export run.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub settings: ExportSettings,
    pub paths: OutputPaths,
    pub camera: CameraPose,
    /// `<name>_user.inc`: user overrides for materials, photons and camera.
    pub user_inc: IncludeResource,
    /// `<name>_textures.inc`: the texture library.
    pub texture_inc: IncludeResource,
}

impl RenderContext {
    /// A context with empty include files.
    pub fn new(settings: ExportSettings, camera: CameraPose) -> Self {
        let paths = OutputPaths::new(&settings.directory, &settings.project_name);
        Self {
            settings,
            paths,
            camera,
            user_inc: IncludeResource::empty(),
            texture_inc: IncludeResource::empty(),
        }
    }

    pub fn with_resources(mut self, user_inc: IncludeResource, texture_inc: IncludeResource) -> Self {
        self.user_inc = user_inc;
        self.texture_inc = texture_inc;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_project_name() {
        let paths = OutputPaths::new("/tmp/out", "gear");
        assert_eq!(paths.pov(), PathBuf::from("/tmp/out/gear.pov"));
        assert_eq!(paths.user_inc_name(), "gear_user.inc");
        assert_eq!(paths.texture_inc_name(), "gear_textures.inc");
        assert_eq!(paths.mesh_inc_name(), "gear_mesh.inc");
        assert_eq!(paths.error_log(), PathBuf::from("/tmp/out/gear_error.txt"));
        assert_eq!(paths.fc_view_name(), "gear_fcview.png");
    }
}
