use std::io;
use std::path::PathBuf;

use file_format::LoadError;
use pov_export::CompileError;

/// Errors that stop an export or a render.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("no project name set, nothing to export")]
    NoProjectName,

    #[error("can't open the pov file {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("POV-Ray executable not found: {path}")]
    RendererNotFound { path: PathBuf },

    #[error("failed to start {path}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl RunnerError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
