//! Writes the compiled scene to disk and drives the POV-Ray executable.
//!
//! A run is [`prepare`] (check the output, read the include files), [`export`]
//! (compile and write), [`write_ini`] and finally [`launch`].

pub mod capture;
pub mod error;
pub mod export;
pub mod ini;
pub mod launch;
pub mod workspace;

pub use capture::ViewportCapture;
pub use error::RunnerError;
pub use export::export;
pub use ini::{ini_contents, write_ini};
pub use launch::{check_error_log, launch, RenderOutcome};
pub use workspace::prepare;
