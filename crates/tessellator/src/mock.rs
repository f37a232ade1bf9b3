//! MockTessellator: deterministic test double for the host meshing service.
//!
//! Boxes are meshed exactly (8 vertices, 12 triangles); every other shape
//! becomes a unit tetrahedron unless a mesh was registered for its name.
//! The node's placement is baked into the result, like the real service does.

use std::collections::{HashMap, HashSet};

use scene_types::{NodeId, NodeKind, SceneDocument};
use tracing::debug;

use crate::primitives::{apply_placement, box_mesh};
use crate::traits::Tessellator;
use crate::types::{TessellationError, TriMesh};

/// One recorded `tessellate` call: node name, linear deviation, angular deflection.
pub type TessellateCall = (String, f64, f64);

#[derive(Debug, Default)]
pub struct MockTessellator {
    meshes: HashMap<String, TriMesh>,
    empty: HashSet<String>,
    failing: HashSet<String>,
    calls: Vec<TessellateCall>,
}

impl MockTessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `mesh` (before placement) for the node named `name`.
    pub fn with_mesh(mut self, name: impl Into<String>, mesh: TriMesh) -> Self {
        self.meshes.insert(name.into(), mesh);
        self
    }

    /// Produce an empty mesh for the node named `name`.
    pub fn with_empty(mut self, name: impl Into<String>) -> Self {
        self.empty.insert(name.into());
        self
    }

    /// Fail tessellation for the node named `name`.
    pub fn with_failure(mut self, name: impl Into<String>) -> Self {
        self.failing.insert(name.into());
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> &[TessellateCall] {
        &self.calls
    }

    fn tetrahedron() -> TriMesh {
        TriMesh::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
        )
    }
}

impl Tessellator for MockTessellator {
    fn tessellate(
        &mut self,
        doc: &SceneDocument,
        id: NodeId,
        linear_deviation: f64,
        angular_deflection: f64,
    ) -> Result<TriMesh, TessellationError> {
        let node = doc.get(id).ok_or(TessellationError::NodeNotFound)?;
        self.calls
            .push((node.name.clone(), linear_deviation, angular_deflection));
        debug!(node = %node.name, linear_deviation, angular_deflection, "mock tessellation");

        if self.failing.contains(&node.name) {
            return Err(TessellationError::Failed {
                name: node.name.clone(),
                reason: "configured to fail".to_string(),
            });
        }
        if self.empty.contains(&node.name) {
            return Ok(TriMesh::default());
        }

        let local = match (&node.kind, self.meshes.get(&node.name)) {
            (_, Some(mesh)) => mesh.clone(),
            (
                NodeKind::Box {
                    length,
                    width,
                    height,
                },
                None,
            ) => box_mesh(*length, *width, *height),
            (NodeKind::Group, None) => {
                return Err(TessellationError::NoShape {
                    name: node.name.clone(),
                })
            }
            _ => Self::tetrahedron(),
        };

        Ok(apply_placement(local, &node.placement))
    }
}
