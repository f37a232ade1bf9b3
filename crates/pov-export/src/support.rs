//! Which configurations of sketch based features compile to exact prisms.

use scene_types::{
    DirMode, LengthType, NodeId, NodeKind, PadPocket, SceneDocument, Segment, Sketch,
};

/// Only lines, circles, arcs and points outside construction geometry.
pub fn is_sketch_supported(sketch: &Sketch) -> bool {
    sketch
        .profile_segments()
        .all(|s| !matches!(s, Segment::Unsupported { .. }))
}

/// The sketch behind `id`, if `id` is a sketch node.
pub fn sketch_of(doc: &SceneDocument, id: NodeId) -> Option<&Sketch> {
    match doc.get(id).map(|n| &n.kind) {
        Some(NodeKind::Sketch(sketch)) => Some(sketch),
        _ => None,
    }
}

/// Part extrusion along the sketch normal, without taper, of a supported sketch.
pub fn is_extrusion_supported(doc: &SceneDocument, kind: &NodeKind) -> bool {
    let NodeKind::Extrusion(params) = kind else {
        return false;
    };
    params.dir_mode == DirMode::Normal
        && params.taper_angle == 0.0
        && params.taper_angle_rev == 0.0
        && sketch_of(doc, params.base).is_some_and(is_sketch_supported)
}

/// Pad or pocket of a fixed length on a supported sketch.
pub fn is_pad_pocket_supported(doc: &SceneDocument, params: &PadPocket) -> bool {
    params.length_type == LengthType::Length
        && sketch_of(doc, params.profile).is_some_and(is_sketch_supported)
}

/// A body compiles exactly when everything it depends on is a datum, a
/// supported sketch or a fixed length pad/pocket.
pub fn is_body_supported(doc: &SceneDocument, body: NodeId) -> bool {
    doc.out_list_recursive(body).into_iter().all(|id| {
        let Some(node) = doc.get(id) else {
            return false;
        };
        match &node.kind {
            NodeKind::Datum { .. } => true,
            NodeKind::Sketch(sketch) => is_sketch_supported(sketch),
            NodeKind::Pad(params) | NodeKind::Pocket(params) => {
                params.length_type == LengthType::Length
            }
            _ => false,
        }
    })
}

/// Kinds the compiler has a dedicated rule for. Everything else is always
/// tessellated.
pub fn has_rule(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Datum { .. } | NodeKind::Mesh(_) | NodeKind::Other { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_types::{ExtrusionParams, SceneNode, SketchGeometry};

    fn square_sketch() -> Sketch {
        Sketch::new(vec![
            SketchGeometry::new(Segment::line([0.0, 0.0], [1.0, 0.0])),
            SketchGeometry::new(Segment::line([1.0, 0.0], [1.0, 1.0])),
            SketchGeometry::new(Segment::line([1.0, 1.0], [0.0, 0.0])),
        ])
    }

    #[test]
    fn bspline_outside_construction_is_unsupported() {
        let mut sketch = square_sketch();
        sketch.geometry.push(SketchGeometry::construction(Segment::Unsupported {
            kind: "BSplineCurve".into(),
        }));
        assert!(is_sketch_supported(&sketch));
        sketch.geometry.push(SketchGeometry::new(Segment::Unsupported {
            kind: "BSplineCurve".into(),
        }));
        assert!(!is_sketch_supported(&sketch));
    }

    #[test]
    fn extrusion_rules() {
        let mut doc = SceneDocument::new();
        let sketch = doc.add(SceneNode::new("Sketch", NodeKind::Sketch(square_sketch())));
        let mut params = ExtrusionParams {
            base: sketch,
            length_fwd: 10.0,
            length_rev: 0.0,
            symmetric: false,
            reversed: false,
            dir_mode: DirMode::Normal,
            taper_angle: 0.0,
            taper_angle_rev: 0.0,
        };
        assert!(is_extrusion_supported(&doc, &NodeKind::Extrusion(params.clone())));
        params.taper_angle_rev = 5.0;
        assert!(!is_extrusion_supported(&doc, &NodeKind::Extrusion(params.clone())));
        params.taper_angle_rev = 0.0;
        params.dir_mode = DirMode::Custom;
        assert!(!is_extrusion_supported(&doc, &NodeKind::Extrusion(params)));
    }

    #[test]
    fn body_with_foreign_member_is_unsupported() {
        let mut doc = SceneDocument::new();
        let sketch = doc.add(SceneNode::new("Sketch", NodeKind::Sketch(square_sketch())));
        let pad = doc.add(SceneNode::new(
            "Pad",
            NodeKind::Pad(PadPocket {
                profile: sketch,
                length: 5.0,
                midplane: false,
                reversed: false,
                length_type: LengthType::Length,
                base_feature: None,
            }),
        ));
        let mut body = SceneNode::new("Body", NodeKind::Body { tip: Some(pad) });
        body.children = vec![sketch, pad];
        let body = doc.add(body);
        assert!(is_body_supported(&doc, body));

        let fillet = doc.add(SceneNode::new(
            "Fillet",
            NodeKind::Other {
                type_id: "PartDesign::Fillet".into(),
            },
        ));
        doc.get_mut(body).unwrap().children.push(fillet);
        assert!(!is_body_supported(&doc, body));
    }
}
