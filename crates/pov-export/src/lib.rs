//! Compiles a [`scene_types::SceneDocument`] into POV-Ray scene description.
//!
//! The entry point is [`document::assemble`], which selects the root nodes,
//! runs the recursive [`compiler::SceneCompiler`] over each of them and wraps
//! the result in the global header (camera, lights, includes). Nodes without
//! an analytic POV-Ray counterpart are tessellated and emitted as `mesh2`
//! declarations collected in a [`mesh::MeshSideBuffer`].

pub mod background;
pub mod camera;
pub mod compiler;
pub mod context;
pub mod document;
pub mod encoder;
pub mod error;
pub mod fmt;
pub mod material;
pub mod mesh;
pub mod names;
pub mod placement;
pub mod resources;
pub mod settings;
pub mod spline;
pub mod stats;
pub mod support;

pub use compiler::{Flags, SceneCompiler, MAX_DEPTH};
pub use context::{CameraKind, CameraPose, OutputPaths, RenderContext};
pub use document::{assemble, ExportArtifacts};
pub use error::{CompileError, ProfileError, ResourceError};
pub use mesh::MeshSideBuffer;
pub use resources::IncludeResource;
pub use settings::{
    BackgroundStyle, EnvironmentOption, EnvironmentSettings, ExecMode, ExportSettings,
    RadiositySettings, RendererSettings, ViewPreferences,
};
pub use spline::{compile_profile, BezierQuad, BezierSpline, QuadKind};
pub use stats::{CameraInfo, SceneStatistics};
