pub use scene_types::TriMesh;

/// Angular deflection used when a node's view provider does not define one.
pub const DEFAULT_ANGULAR_DEFLECTION: f64 = 0.5;

/// Errors from the tessellation service.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TessellationError {
    #[error("node has no shape to tessellate: {name}")]
    NoShape { name: String },

    #[error("node not found in document")]
    NodeNotFound,

    #[error("tessellation failed for {name}: {reason}")]
    Failed { name: String, reason: String },
}
