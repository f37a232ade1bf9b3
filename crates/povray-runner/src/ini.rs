use std::fs;
use std::path::PathBuf;

use pov_export::RenderContext;
use tracing::debug;

use crate::error::RunnerError;

/// The renderer's `.ini`: input, output and size, the error log POV-Ray
/// writes on fatal errors, then the user's own options verbatim.
pub fn ini_contents(ctx: &RenderContext) -> String {
    let paths = &ctx.paths;
    let settings = &ctx.settings;
    let mut ini = format!(
        "Input_File_Name=\"{}\"\nOutput_File_Name=\"{}\"\nWidth={}\nHeight={}\nFatal_File=\"{}\"\n",
        paths.pov_name(),
        paths.image_name(),
        settings.width,
        settings.height,
        paths.error_log_name(),
    );
    ini.push_str("\n;User Options from FreeCAD Settings\n");
    ini.push_str(&settings.renderer.render_parameters);
    ini
}

/// Write `<name>.ini` next to the scene and return its path.
pub fn write_ini(ctx: &RenderContext) -> Result<PathBuf, RunnerError> {
    let path = ctx.paths.ini();
    fs::write(&path, ini_contents(ctx)).map_err(RunnerError::io(&path))?;
    debug!(path = %path.display(), "ini written");
    Ok(path)
}
