use scene_types::{NodeId, SceneDocument};

use crate::types::{TessellationError, TriMesh};

/// The host's meshing service.
///
/// Implementations return the node's shape as a triangle mesh in document
/// coordinates, i.e. with the node's placement already applied.
pub trait Tessellator {
    /// Tessellate the shape of `id` with the given linear deviation (mm) and
    /// angular deflection (radians).
    fn tessellate(
        &mut self,
        doc: &SceneDocument,
        id: NodeId,
        linear_deviation: f64,
        angular_deflection: f64,
    ) -> Result<TriMesh, TessellationError>;
}
