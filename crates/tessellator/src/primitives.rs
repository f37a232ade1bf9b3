//! Meshes for the analytic primitives, for running without a host kernel.
//!
//! Solids of revolution are sampled on a (profile point, angle) grid; points
//! on the axis collapse to a single pole vertex. Anything that needs a real
//! modelling kernel (booleans, sketch features, imported shapes) has no shape
//! here.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use scene_types::{NodeId, NodeKind, Placement, SceneDocument};
use tracing::debug;

use crate::traits::Tessellator;
use crate::types::{TessellationError, TriMesh};

const MIN_SEGMENTS: usize = 8;
const MAX_SEGMENTS: usize = 256;

/// Meshes boxes, spheres, ellipsoids, cylinders, cones and tori. The angular
/// deflection controls the number of segments around each circle.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimitiveTessellator;

impl PrimitiveTessellator {
    pub fn new() -> Self {
        Self
    }
}

impl Tessellator for PrimitiveTessellator {
    fn tessellate(
        &mut self,
        doc: &SceneDocument,
        id: NodeId,
        linear_deviation: f64,
        angular_deflection: f64,
    ) -> Result<TriMesh, TessellationError> {
        let node = doc.get(id).ok_or(TessellationError::NodeNotFound)?;
        let n = segments(angular_deflection);
        debug!(node = %node.name, linear_deviation, segments = n, "primitive tessellation");

        let local = match &node.kind {
            NodeKind::Box {
                length,
                width,
                height,
            } => box_mesh(*length, *width, *height),
            NodeKind::Sphere { radius } => scaled(revolve(&sphere_profile(n), n), [*radius; 3]),
            NodeKind::Ellipsoid {
                radius1,
                radius2,
                radius3,
            } => {
                let ry = if *radius3 > 0.0 { *radius3 } else { *radius2 };
                scaled(revolve(&sphere_profile(n), n), [*radius2, ry, *radius1])
            }
            NodeKind::Cylinder { radius, height } => revolve(
                &[[0.0, 0.0], [*radius, 0.0], [*radius, *height], [0.0, *height]],
                n,
            ),
            NodeKind::Cone {
                radius1,
                radius2,
                height,
            } => revolve(
                &[[0.0, 0.0], [*radius1, 0.0], [*radius2, *height], [0.0, *height]],
                n,
            ),
            NodeKind::Torus { radius1, radius2 } => {
                let profile: Vec<[f64; 2]> = (0..=n)
                    .map(|i| {
                        let t = TAU * i as f64 / n as f64;
                        [radius1 + radius2 * t.cos(), radius2 * t.sin()]
                    })
                    .collect();
                revolve(&profile, n)
            }
            _ => {
                return Err(TessellationError::NoShape {
                    name: node.name.clone(),
                })
            }
        };

        Ok(apply_placement(local, &node.placement))
    }
}

/// Segments per full turn for the given angular deflection (radians).
fn segments(angular_deflection: f64) -> usize {
    if angular_deflection.is_nan() || angular_deflection <= 0.0 {
        return MIN_SEGMENTS;
    }
    let n = (TAU / angular_deflection).ceil();
    (n as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Unit half circle from the south pole to the north pole as (r, z) pairs.
fn sphere_profile(n: usize) -> Vec<[f64; 2]> {
    let rows = (n / 2).max(2);
    (0..=rows)
        .map(|j| {
            let phi = -FRAC_PI_2 + PI * j as f64 / rows as f64;
            [phi.cos().max(0.0), phi.sin()]
        })
        .collect()
}

/// Sweep an (r, z) profile a full turn about the Z axis.
fn revolve(profile: &[[f64; 2]], n: usize) -> TriMesh {
    const AXIS_EPS: f64 = 1e-12;

    let mut vertices = Vec::new();
    // Per profile point: index of its pole vertex, or of its ring's first vertex.
    let mut rows: Vec<(bool, u32)> = Vec::with_capacity(profile.len());
    for &[r, z] in profile {
        let start = vertices.len() as u32;
        if r.abs() < AXIS_EPS {
            vertices.push([0.0, 0.0, z]);
            rows.push((true, start));
        } else {
            for j in 0..n {
                let a = TAU * j as f64 / n as f64;
                vertices.push([r * a.cos(), r * a.sin(), z]);
            }
            rows.push((false, start));
        }
    }

    let index = |(pole, start): (bool, u32), j: usize| -> u32 {
        if pole {
            start
        } else {
            start + (j % n) as u32
        }
    };

    let mut triangles = Vec::new();
    for pair in rows.windows(2) {
        for j in 0..n {
            let a = index(pair[0], j);
            let b = index(pair[0], j + 1);
            let c = index(pair[1], j + 1);
            let d = index(pair[1], j);
            for tri in [[a, b, c], [a, c, d]] {
                if tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2] {
                    triangles.push(tri);
                }
            }
        }
    }

    TriMesh::new(vertices, triangles)
}

fn scaled(mut mesh: TriMesh, factors: [f64; 3]) -> TriMesh {
    for v in &mut mesh.vertices {
        for (c, f) in v.iter_mut().zip(factors) {
            *c *= f;
        }
    }
    mesh
}

/// Axis-aligned box with one corner at the origin.
pub(crate) fn box_mesh(l: f64, w: f64, h: f64) -> TriMesh {
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [l, 0.0, 0.0],
        [l, w, 0.0],
        [0.0, w, 0.0],
        [0.0, 0.0, h],
        [l, 0.0, h],
        [l, w, h],
        [0.0, w, h],
    ];
    let triangles = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [3, 7, 6],
        [3, 6, 2],
        [0, 4, 7],
        [0, 7, 3],
        [1, 2, 6],
        [1, 6, 5],
    ];
    TriMesh::new(vertices, triangles)
}

/// Rotate every vertex by the placement's quaternion, then translate.
pub(crate) fn apply_placement(mut mesh: TriMesh, placement: &Placement) -> TriMesh {
    let [qx, qy, qz, qw] = placement.rotation.q;
    for v in &mut mesh.vertices {
        // v' = v + 2w(q x v) + 2 q x (q x v)
        let t = [
            2.0 * (qy * v[2] - qz * v[1]),
            2.0 * (qz * v[0] - qx * v[2]),
            2.0 * (qx * v[1] - qy * v[0]),
        ];
        let rotated = [
            v[0] + qw * t[0] + (qy * t[2] - qz * t[1]),
            v[1] + qw * t[1] + (qz * t[0] - qx * t[2]),
            v[2] + qw * t[2] + (qx * t[1] - qy * t[0]),
        ];
        *v = [
            rotated[0] + placement.base[0],
            rotated[1] + placement.base[1],
            rotated[2] + placement.base[2],
        ];
    }
    mesh
}
