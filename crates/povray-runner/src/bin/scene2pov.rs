//! `scene2pov <project.json> <settings.json> [--no-render]`
//!
//! Compiles a saved project into a POV-Ray scene and renders it. Analytic
//! primitives that need a mesh are tessellated locally; shapes that need a
//! modelling kernel are skipped with a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use file_format::{load_project, load_settings};
use povray_runner::{export, launch, prepare, write_ini, RenderOutcome, RunnerError};
use tessellator::PrimitiveTessellator;
use tracing::{error, info};

const USAGE: &str = "usage: scene2pov <project.json> <settings.json> [--no-render]";

struct Args {
    project: PathBuf,
    settings: PathBuf,
    render: bool,
}

fn parse_args() -> Option<Args> {
    let mut paths = Vec::new();
    let mut render = true;
    for arg in std::env::args().skip(1) {
        if arg == "--no-render" {
            render = false;
        } else if arg.starts_with("--") {
            return None;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    let [project, settings]: [PathBuf; 2] = paths.try_into().ok()?;
    Some(Args {
        project,
        settings,
        render,
    })
}

fn read(path: &Path) -> Result<String, RunnerError> {
    fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<ExitCode, RunnerError> {
    let project = load_project(&read(&args.project)?)?;
    let settings = load_settings(&read(&args.settings)?)?;
    info!(project = %project.metadata.name, nodes = project.document.len(), "project loaded");

    let ctx = prepare(settings, project.camera)?;
    export(
        &project.document,
        &ctx,
        &mut PrimitiveTessellator::new(),
        None,
    )?;

    if !args.render {
        return Ok(ExitCode::SUCCESS);
    }

    write_ini(&ctx)?;
    match launch(&ctx)? {
        RenderOutcome::Succeeded => {
            info!(image = %ctx.paths.path(&ctx.paths.image_name()).display(), "render complete");
            Ok(ExitCode::SUCCESS)
        }
        RenderOutcome::Detached => Ok(ExitCode::SUCCESS),
        RenderOutcome::Failed { log } => {
            error!(
                "An error occurred while rendering:\n-----------------------------------------\n{log}\n-----------------------------------------\nYou can see the error message in {} too.",
                ctx.paths.error_log().display()
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene2pov=info,povray_runner=info,pov_export=info".into()),
        )
        .init();

    let Some(args) = parse_args() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
