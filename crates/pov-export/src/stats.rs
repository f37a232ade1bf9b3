//! Summary of what an export will contain, reported before compiling.

use std::fmt;
use std::path::PathBuf;

use scene_types::SceneDocument;

use crate::context::{CameraKind, RenderContext};
use crate::support::has_rule;

/// Which camera ends up in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraInfo {
    Perspective,
    Orthographic,
    /// The user include declares a camera; ours is commented out.
    UserDefined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStatistics {
    pub pov_path: PathBuf,
    /// Nodes nothing else depends on.
    pub parent_count: usize,
    pub total: usize,
    /// Nodes that will always be tessellated.
    pub unsupported: usize,
    pub camera: CameraInfo,
}

impl SceneStatistics {
    pub fn collect(doc: &SceneDocument, ctx: &RenderContext) -> Self {
        let mut parent_count = 0;
        let mut unsupported = 0;
        for (id, node) in doc.iter() {
            if !has_rule(&node.kind) {
                unsupported += 1;
            }
            if doc.in_list(id).is_empty() {
                parent_count += 1;
            }
        }

        let camera = if ctx.user_inc.mentions("camera") {
            CameraInfo::UserDefined
        } else {
            match ctx.camera.kind {
                CameraKind::Perspective => CameraInfo::Perspective,
                CameraKind::Orthographic => CameraInfo::Orthographic,
            }
        };

        Self {
            pov_path: ctx.paths.pov(),
            parent_count,
            total: doc.len(),
            unsupported,
            camera,
        }
    }
}

impl fmt::Display for SceneStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path to *.pov File: {}", self.pov_path.display())?;
        writeln!(f, "{} parent objects found in highest layer", self.parent_count)?;
        writeln!(f, "containing totally {} objects", self.total)?;
        if self.unsupported != 0 {
            writeln!(
                f,
                "Your model contains {} objects which aren't supported (will be represented as mesh).",
                self.unsupported
            )?;
        }
        match self.camera {
            CameraInfo::Perspective => writeln!(f, "Perspective Camera")?,
            CameraInfo::Orthographic => writeln!(f, "Orthographic camera")?,
            CameraInfo::UserDefined => writeln!(
                f,
                "User defined camera found - FreeCAD camera will be commented out in *.pov file"
            )?,
        }
        writeln!(f)
    }
}
