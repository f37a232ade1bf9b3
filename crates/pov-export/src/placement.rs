//! `translate` and `rotate` statements from node placements.

use nalgebra::{Quaternion, UnitQuaternion};
use scene_types::{NodeKind, Rotation, SceneDocument, SceneNode};

use crate::fmt::{num, round9, vec3};

/// Euler angles in degrees as `[x, y, z]`: roll about X, pitch about Y, yaw
/// about Z, applied in that order. Matches POV-Ray's `rotate <x, y, z>`.
pub fn euler_degrees(rotation: &Rotation) -> [f64; 3] {
    let n = rotation.normalized();
    let [x, y, z, w] = n.q;
    let unit = UnitQuaternion::new_normalize(Quaternion::new(w, x, y, z));
    let (roll, pitch, yaw) = unit.euler_angles();
    [
        round9(roll.to_degrees()),
        round9(pitch.to_degrees()),
        round9(yaw.to_degrees()),
    ]
}

/// Extra rotation about X compensating for primitives whose axis differs
/// between the host and POV-Ray.
fn axis_correction(doc: &SceneDocument, node: &SceneNode) -> f64 {
    match &node.kind {
        NodeKind::Torus { .. } => 90.0,
        NodeKind::Clone { sources, .. } => {
            let first_is_torus = sources
                .first()
                .and_then(|id| doc.get(*id))
                .is_some_and(|src| matches!(src.kind, NodeKind::Torus { .. }));
            if first_is_torus {
                90.0
            } else {
                0.0
            }
        }
        NodeKind::Sketch(_) => -90.0,
        _ => 0.0,
    }
}

fn corrected_angles(doc: &SceneDocument, node: &SceneNode) -> [f64; 3] {
    let [x, y, z] = euler_degrees(&node.placement.rotation);
    [round9(x + axis_correction(doc, node)), y, z]
}

/// `translate <x, y, z>`, or an empty string when the node sits at the origin.
pub fn translation(node: &SceneNode) -> String {
    if node.placement.has_translation() {
        format!("translate {}", vec3(node.placement.base))
    } else {
        String::new()
    }
}

/// `rotate <x, y, z>`, or an empty string when there is nothing to rotate.
pub fn rotation(doc: &SceneDocument, node: &SceneNode) -> String {
    let angles = corrected_angles(doc, node);
    if angles.iter().all(|a| *a == 0.0) {
        return String::new();
    }
    format!("rotate {}", vec3(angles))
}

/// Statements undoing [`rotation`]: one negated rotation per axis in Z, Y, X
/// order. Each statement is returned separately.
pub fn inverted_rotation(doc: &SceneDocument, node: &SceneNode) -> Vec<String> {
    let [x, y, z] = corrected_angles(doc, node);
    let mut out = Vec::new();
    if z != 0.0 {
        out.push(format!("rotate <0, 0, {}>", num(-z)));
    }
    if y != 0.0 {
        out.push(format!("rotate <0, {}, 0>", num(-y)));
    }
    if x != 0.0 {
        out.push(format!("rotate <{}, 0, 0>", num(-x)));
    }
    out
}
