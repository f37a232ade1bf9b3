//! Starting POV-Ray and reading back its verdict.

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use pov_export::{ExecMode, RenderContext};
use tracing::{debug, info, instrument, warn};

use crate::error::RunnerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Succeeded,
    /// The renderer wrote to its error log; the content is kept verbatim.
    Failed { log: String },
    /// Started in the background, result unknown.
    Detached,
}

/// Run the configured executable with `<name>.ini` from inside the output
/// directory.
#[instrument(skip_all, fields(project = %ctx.settings.project_name))]
pub fn launch(ctx: &RenderContext) -> Result<RenderOutcome, RunnerError> {
    let configured = &ctx.settings.renderer.executable;
    let not_found = || RunnerError::RendererNotFound {
        path: configured.clone(),
    };
    // Resolved up front: a relative path would otherwise be looked up from
    // the output directory.
    let executable = fs::canonicalize(configured).map_err(|_| not_found())?;
    if !executable.is_file() {
        return Err(not_found());
    }

    let mut command = Command::new(&executable);
    command
        .arg(ctx.paths.ini_name())
        .current_dir(ctx.paths.directory());
    let launch_error = |source: io::Error| RunnerError::Launch {
        path: executable.clone(),
        source,
    };

    match ctx.settings.renderer.exec_mode {
        ExecMode::Wait => {
            let status = command.status().map_err(launch_error)?;
            debug!(%status, "renderer finished");
            check_error_log(&ctx.paths.error_log())
        }
        ExecMode::Detach => {
            let child = command.spawn().map_err(launch_error)?;
            info!(pid = child.id(), "renderer started in the background");
            Ok(RenderOutcome::Detached)
        }
    }
}

/// Inspect the renderer's error log. Any content means failure; an empty
/// log is deleted.
pub fn check_error_log(path: &Path) -> Result<RenderOutcome, RunnerError> {
    let log = match fs::read_to_string(path) {
        Ok(log) => log,
        Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(RunnerError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if !log.is_empty() {
        warn!(path = %path.display(), "an error occurred while rendering");
        return Ok(RenderOutcome::Failed { log });
    }

    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            return Err(RunnerError::Io {
                path: path.to_path_buf(),
                source: err,
            })
        }
        _ => {}
    }
    info!("rendering finished");
    Ok(RenderOutcome::Succeeded)
}
