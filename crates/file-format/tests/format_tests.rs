use file_format::{
    load_project, save_project, LoadError, ProjectMetadata, FORMAT_ID, FORMAT_VERSION,
};
use pov_export::{CameraKind, CameraPose};
use scene_types::{
    ArrayLayout, ArrayParams, BooleanOp, LightParams, NodeKind, Placement, Rotation,
    SceneDocument, SceneNode, Segment, Sketch, SketchGeometry,
};

// ── Helper Functions ─────────────────────────────────────────────────────

fn make_document() -> SceneDocument {
    let mut doc = SceneDocument::new();
    let mut a = SceneNode::new(
        "Box",
        NodeKind::Box {
            length: 10.0,
            width: 5.0,
            height: 2.0,
        },
    );
    a.visible = false;
    a.view.shape_color = [1.0, 0.0, 0.0];
    let a = doc.add(a);

    let mut b = SceneNode::new("Cylinder", NodeKind::Cylinder { radius: 1.0, height: 4.0 });
    b.placement = Placement::new(
        [2.0, 2.0, -1.0],
        Rotation::from_axis_angle([1.0, 0.0, 0.0], 30.0),
    );
    b.visible = false;
    let b = doc.add(b);

    let mut cut = SceneNode::new("Cut", NodeKind::Boolean { op: BooleanOp::Cut });
    cut.label = "Bracket".into();
    cut.children = vec![a, b];
    let cut = doc.add(cut);

    doc.add(SceneNode::new(
        "Array",
        NodeKind::Array(ArrayParams {
            base: cut,
            layout: ArrayLayout::Polar {
                center: [0.0; 3],
                axis: [0.0, 0.0, 1.0],
                interval_axis: [0.0; 3],
                count: 6,
                angle: 360.0,
            },
        }),
    ));
    doc.add(SceneNode::new(
        "Sketch",
        NodeKind::Sketch(Sketch::new(vec![
            SketchGeometry::new(Segment::circle([0.0, 0.0], 3.0)),
            SketchGeometry::construction(Segment::line([0.0, 0.0], [1.0, 1.0])),
        ])),
    ));
    doc.add(SceneNode::new("PointLight", NodeKind::PointLight(LightParams::default())));
    doc
}

fn make_camera() -> CameraPose {
    CameraPose {
        kind: CameraKind::Orthographic,
        position: [10.0, -20.0, 30.0],
        height: 42.0,
        ..CameraPose::default()
    }
}

fn save_default() -> String {
    save_project(
        &make_document(),
        &make_camera(),
        &ProjectMetadata::new("bracket"),
    )
    .unwrap()
}

// ── Save Tests ───────────────────────────────────────────────────────────

#[test]
fn save_produces_valid_json() {
    let json = save_default();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.is_object());
}

#[test]
fn save_includes_format_and_version() {
    let value: serde_json::Value = serde_json::from_str(&save_default()).unwrap();
    assert_eq!(value["format"], FORMAT_ID);
    assert_eq!(value["version"], FORMAT_VERSION);
}

#[test]
fn save_includes_project_metadata() {
    let value: serde_json::Value = serde_json::from_str(&save_default()).unwrap();
    assert_eq!(value["project"]["name"], "bracket");
    assert!(value["project"]["id"].is_string());
    assert!(value["project"]["created"].is_string());
}

#[test]
fn save_tags_node_kinds() {
    let json = save_default();
    assert!(json.contains("\"type\": \"Box\""));
    assert!(json.contains("\"type\": \"Boolean\""));
    assert!(json.contains("\"type\": \"Polar\""));
}

#[test]
fn save_empty_document() {
    let json = save_project(
        &SceneDocument::new(),
        &CameraPose::default(),
        &ProjectMetadata::new("empty"),
    )
    .unwrap();
    let loaded = load_project(&json).unwrap();
    assert!(loaded.document.is_empty());
}

// ── Load Tests ───────────────────────────────────────────────────────────

#[test]
fn load_round_trip_preserves_nodes() {
    let loaded = load_project(&save_default()).unwrap();
    let doc = &loaded.document;
    assert_eq!(doc.len(), 6);

    let names: Vec<&str> = doc.iter().map(|(_, n)| n.name.as_str()).collect();
    assert_eq!(names, ["Box", "Cylinder", "Cut", "Array", "Sketch", "PointLight"]);

    let cut = doc.get(doc.find_by_name("Cut").unwrap()).unwrap();
    assert_eq!(cut.label, "Bracket");
    assert_eq!(cut.children.len(), 2);
    assert!(cut.children.iter().all(|c| doc.contains(*c)));
}

#[test]
fn load_preserves_references_between_nodes() {
    let loaded = load_project(&save_default()).unwrap();
    let doc = &loaded.document;
    let cut = doc.find_by_name("Cut").unwrap();
    let array = doc.get(doc.find_by_name("Array").unwrap()).unwrap();
    match &array.kind {
        NodeKind::Array(params) => assert_eq!(params.base, cut),
        other => panic!("expected an array, got {other:?}"),
    }
}

#[test]
fn load_preserves_placement_and_view() {
    let loaded = load_project(&save_default()).unwrap();
    let doc = &loaded.document;
    let cyl = doc.get(doc.find_by_name("Cylinder").unwrap()).unwrap();
    assert_eq!(cyl.placement.base, [2.0, 2.0, -1.0]);
    assert!(!cyl.placement.rotation.is_identity());
    assert!(!cyl.visible);

    let b = doc.get(doc.find_by_name("Box").unwrap()).unwrap();
    assert_eq!(b.view.shape_color, [1.0, 0.0, 0.0]);
}

#[test]
fn load_preserves_camera_and_metadata() {
    let metadata = ProjectMetadata::new("bracket");
    let json = save_project(&make_document(), &make_camera(), &metadata).unwrap();
    let loaded = load_project(&json).unwrap();
    assert_eq!(loaded.camera, make_camera());
    assert_eq!(loaded.metadata, metadata);
}

#[test]
fn load_defaults_missing_camera() {
    let mut value: serde_json::Value = serde_json::from_str(&save_default()).unwrap();
    value.as_object_mut().unwrap().remove("camera");
    let loaded = load_project(&value.to_string()).unwrap();
    assert_eq!(loaded.camera, CameraPose::default());
}

#[test]
fn load_rejects_unknown_format() {
    let json = save_default().replace(FORMAT_ID, "something-else");
    let err = load_project(&json).unwrap_err();
    assert_eq!(err, LoadError::UnknownFormat("something-else".into()));
}

#[test]
fn load_rejects_future_version() {
    let mut value: serde_json::Value = serde_json::from_str(&save_default()).unwrap();
    value["version"] = serde_json::json!(FORMAT_VERSION + 1);
    let err = load_project(&value.to_string()).unwrap_err();
    assert_eq!(
        err,
        LoadError::FutureVersion {
            file_version: FORMAT_VERSION + 1,
            supported_version: FORMAT_VERSION,
        }
    );
}

#[test]
fn load_rejects_version_without_migration() {
    let mut value: serde_json::Value = serde_json::from_str(&save_default()).unwrap();
    value["version"] = serde_json::json!(0);
    let err = load_project(&value.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::MigrationFailed { from: 0, to: 1, .. }));
}

#[test]
fn load_rejects_invalid_json() {
    let err = load_project("{ not json").unwrap_err();
    assert!(matches!(err, LoadError::ParseError(_)));
}

// ── Round-Trip Through The Compiler ──────────────────────────────────────

#[test]
fn loaded_document_compiles_like_the_original() {
    use pov_export::{assemble, ExportSettings, RenderContext};
    use tessellator::MockTessellator;

    let original = make_document();
    let json = save_project(&original, &make_camera(), &ProjectMetadata::new("bracket")).unwrap();
    let loaded = load_project(&json).unwrap();

    let ctx = RenderContext::new(ExportSettings::default(), loaded.camera.clone());
    let before = assemble(&original, &ctx, &mut MockTessellator::new()).unwrap();
    let after = assemble(&loaded.document, &ctx, &mut MockTessellator::new()).unwrap();
    assert_eq!(before.scene, after.scene);
    assert_eq!(before.meshes, after.meshes);
}
