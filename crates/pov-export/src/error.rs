/// Errors that abort a whole export.
///
/// Everything else a node can go wrong with degrades to a mesh locally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("scene graph cycle through {name}")]
    Cycle { name: String },

    #[error("scene graph nested deeper than {limit} levels at {name}")]
    DepthExceeded { name: String, limit: usize },
}

/// Why a sketch profile cannot be turned into a closed bezier spline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile has no usable geometry")]
    Empty,

    #[error("profile loop does not close at ({x}, {y})")]
    OpenLoop { x: f64, y: f64 },

    #[error("unsupported profile geometry: {kind}")]
    UnsupportedGeometry { kind: String },
}

/// Problems with an auxiliary include file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("unterminated block comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },
}
