//! Output directory bookkeeping before anything is compiled.

use std::fs::{self, File, OpenOptions};
use std::path::Path;

use pov_export::{CameraPose, ExportSettings, IncludeResource, RenderContext};
use tracing::{debug, instrument};

use crate::error::RunnerError;

/// Check that the scene file can be written, create missing include files,
/// read both includes and clear the previous mesh file.
///
/// Fails before any compilation when the project has no name or its `.pov`
/// cannot be created.
#[instrument(skip_all, fields(project = %settings.project_name))]
pub fn prepare(settings: ExportSettings, camera: CameraPose) -> Result<RenderContext, RunnerError> {
    if settings.project_name.trim().is_empty() {
        return Err(RunnerError::NoProjectName);
    }

    let ctx = RenderContext::new(settings, camera);
    let paths = &ctx.paths;

    let pov = paths.pov();
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&pov)
        .map_err(|source| RunnerError::OutputOpen {
            path: pov.clone(),
            source,
        })?;

    let user_src = read_or_create(&paths.user_inc())?;
    let texture_src = read_or_create(&paths.texture_inc())?;
    let user_inc = IncludeResource::load(&paths.user_inc_name(), &user_src);
    let texture_inc = IncludeResource::load(&paths.texture_inc_name(), &texture_src);

    if let Err(err) = File::create(paths.mesh_inc()) {
        debug!(error = %err, "old mesh file not cleared");
    }

    debug!(
        user_bytes = user_src.len(),
        texture_bytes = texture_src.len(),
        "include files loaded"
    );
    Ok(ctx.with_resources(user_inc, texture_inc))
}

/// Contents of `path`, creating an empty file first if there is none.
fn read_or_create(path: &Path) -> Result<String, RunnerError> {
    OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(RunnerError::io(path))?;
    fs::read_to_string(path).map_err(RunnerError::io(path))
}
