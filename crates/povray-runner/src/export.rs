use std::fs;

use pov_export::{assemble, ExportArtifacts, RenderContext};
use scene_types::SceneDocument;
use tessellator::Tessellator;
use tracing::{debug, info, instrument, warn};

use crate::capture::ViewportCapture;
use crate::error::RunnerError;

/// Compile `doc` and write `<name>.pov`, plus `<name>_mesh.inc` when any
/// node was tessellated.
///
/// With `export_fc_view` set, a snapshot of the viewport is saved first; a
/// failed snapshot is only logged.
#[instrument(skip_all, fields(project = %ctx.settings.project_name))]
pub fn export(
    doc: &SceneDocument,
    ctx: &RenderContext,
    tessellator: &mut dyn Tessellator,
    capture: Option<&mut dyn ViewportCapture>,
) -> Result<ExportArtifacts, RunnerError> {
    if ctx.settings.export_fc_view {
        match capture {
            Some(capture) => {
                let path = ctx.paths.fc_view();
                if let Err(err) = capture.capture(&path, ctx.settings.width, ctx.settings.height) {
                    warn!(path = %path.display(), error = %err, "export of the viewport failed");
                }
            }
            None => debug!("no viewport to capture"),
        }
    }

    let artifacts = assemble(doc, ctx, tessellator)?;

    let pov = ctx.paths.pov();
    fs::write(&pov, &artifacts.scene).map_err(RunnerError::io(&pov))?;
    info!(path = %pov.display(), bytes = artifacts.scene.len(), "scene written");

    if !artifacts.meshes.is_empty() {
        let mesh = ctx.paths.mesh_inc();
        fs::write(&mesh, &artifacts.meshes).map_err(RunnerError::io(&mesh))?;
        info!(path = %mesh.display(), bytes = artifacts.meshes.len(), "meshes written");
    }

    Ok(artifacts)
}
