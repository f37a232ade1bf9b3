//! End-to-end export scenarios through SceneBuilder.
//!
//! Each scenario builds a document, exports it through the real assembler and
//! checks the generated text plus every structural oracle.

use pov_export::CompileError;
use scene_types::{Placement, Rotation, TriMesh};
use tessellator::MockTessellator;
use test_harness::assertions::*;
use test_harness::helpers::{
    circle_profile, node_section, rect_profile, slot_profile, with_unsupported_curve,
};
use test_harness::report::Representation;
use test_harness::{HarnessError, SceneBuilder};

fn assert_oracles(m: &mut SceneBuilder) {
    for verdict in m.check_export().unwrap() {
        assert!(
            verdict.passed,
            "{} failed: {}",
            verdict.oracle_name, verdict.detail
        );
    }
}

// ── Scenario 1: Single default box ──────────────────────────────────────

#[test]
fn single_box_is_one_analytic_primitive() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 10.0, 5.0, 2.0).unwrap();

    let out = m.export().unwrap();
    assert_occurrences(&out.scene, "box {", 1, "box").unwrap();
    assert!(out
        .scene
        .ends_with("\n//----- Box -----\nbox { <0,0,0>, <10, 5, 2>\n}\n"));
    assert_no_meshes(&out, "box").unwrap();
    assert!(m.tessellator().calls().is_empty());
    assert_oracles(&mut m);
}

// ── Scenario 2: Cut of two boxes ────────────────────────────────────────

#[test]
fn cut_of_two_boxes_keeps_both_primitives() {
    let mut m = SceneBuilder::new();
    m.cuboid("Block", 10.0, 10.0, 10.0).unwrap();
    m.cuboid("Tool", 5.0, 5.0, 20.0).unwrap();
    m.place("Tool", Placement::from_translation([2.0, 2.0, -5.0]))
        .unwrap();
    m.cut("Cut", "Block", "Tool").unwrap();

    let out = m.export().unwrap();
    let cut = node_section(&out.scene, "Cut").unwrap();
    assert_in_order(
        cut,
        &["difference {", "//----- Block -----", "//----- Tool -----", "translate <2, 2, -5>"],
        "cut",
    )
    .unwrap();
    assert_occurrences(&out.scene, "box {", 2, "cut").unwrap();
    // Operands are hidden, so they only appear inside the difference.
    assert!(!out.scene.contains("\n//----- Block -----"));
    assert_no_meshes(&out, "cut").unwrap();
    assert_oracles(&mut m);
}

// ── Scenario 3: Pad and pocket in a body ────────────────────────────────

#[test]
fn body_with_pad_and_pocket_is_a_prism_difference() {
    let mut m = SceneBuilder::new();
    m.sketch("Sketch", rect_profile(0.0, 0.0, 10.0, 10.0)).unwrap();
    m.pad("Pad", "Sketch", 5.0).unwrap();
    m.sketch("Sketch001", circle_profile(5.0, 5.0, 2.0)).unwrap();
    m.pocket("Pocket", "Sketch001", 5.0, Some("Pad")).unwrap();
    m.body("Body", &["Sketch", "Pad", "Sketch001", "Pocket"], "Pocket")
        .unwrap();

    let out = m.export().unwrap();
    let body = node_section(&out.scene, "Body").unwrap();
    assert!(body.starts_with("//----- Body -----\nunion {\n"));
    assert_in_order(body, &["difference {", "prism {", "//circle"], "body").unwrap();
    assert_occurrences(body, "prism {", 2, "body").unwrap();
    assert_no_meshes(&out, "body").unwrap();

    let report = m.report().unwrap();
    assert_eq!(report.roots.len(), 1);
    assert_eq!(report.roots[0].representation, Representation::Analytic);
    assert!(report.all_oracles_passed(), "{report}");
}

#[test]
fn extruded_slot_uses_arc_segments() {
    let mut m = SceneBuilder::new();
    m.sketch("Slot", slot_profile(10.0, 4.0)).unwrap();
    m.extrude("Extrude", "Slot", 3.0).unwrap();

    let out = m.export().unwrap();
    assert_contains(&out.scene, "prism {\n\tbezier_spline\n\t0, -3, ", "slot").unwrap();
    assert_occurrences(&out.scene, "//line", 3, "slot").unwrap();
    assert_contains(&out.scene, "//arc", "slot").unwrap();
    assert_no_meshes(&out, "slot").unwrap();
    assert_oracles(&mut m);
}

// ── Scenario 4: B-spline pocket falls back to a mesh ────────────────────

#[test]
fn bspline_pocket_is_meshed() {
    let mut m = SceneBuilder::new();
    m.sketch(
        "Sketch",
        with_unsupported_curve(rect_profile(0.0, 0.0, 4.0, 4.0), "BSplineCurve"),
    )
    .unwrap();
    m.pocket("Pocket", "Sketch", 2.0, None).unwrap();

    let out = m.export().unwrap();
    assert_meshed(&out, "Pocket", "bspline").unwrap();
    assert_not_contains(&out.scene, "prism", "bspline").unwrap();
    assert_contains(&out.scene, "#include \"scene_mesh.inc\"\n", "bspline").unwrap();
    assert_eq!(m.tessellator().calls().len(), 1);
    assert_oracles(&mut m);
}

// ── Scenario 5: Arrays ──────────────────────────────────────────────────

#[test]
fn polar_array_loops_over_the_base() {
    let mut m = SceneBuilder::new();
    m.cylinder("Spoke", 0.5, 10.0).unwrap();
    m.polar_array("Wheel", "Spoke", 8, 360.0).unwrap();

    let out = m.export().unwrap();
    let wheel = node_section(&out.scene, "Wheel").unwrap();
    assert_in_order(
        wheel,
        &[
            "union {",
            "#declare endNo = 8;",
            "#while (i < endNo)",
            "#declare rotAngle = i * arrAngle / endNo;",
            "#end",
        ],
        "polar",
    )
    .unwrap();
    assert_no_meshes(&out, "polar").unwrap();
    assert_oracles(&mut m);
}

#[test]
fn ortho_array_nests_loops() {
    let mut m = SceneBuilder::new();
    m.sphere("Ball", 1.0).unwrap();
    m.ortho_array("Grid", "Ball", [3, 3, 2], 4.0).unwrap();

    let out = m.export().unwrap();
    assert_occurrences(&out.scene, "#while", 3, "ortho").unwrap();
    assert_contains(&out.scene, "#declare numZ = 2;", "ortho").unwrap();
    assert_oracles(&mut m);
}

#[test]
fn unknown_array_type_is_meshed() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.other_array("PathArray", "Box", "PathArray").unwrap();

    let out = m.export().unwrap();
    assert_meshed(&out, "PathArray", "path array").unwrap();
    assert_not_contains(&out.scene, "#while", "path array").unwrap();
}

// ── Scenario 6: Unsupported shapes ──────────────────────────────────────

#[test]
fn only_unsupported_nodes_are_meshed() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.torus("Ring", 3.0, 0.5).unwrap();
    m.other("Fillet", "Part::Fillet").unwrap();

    let out = m.export().unwrap();
    assert_not_meshed(&out, "Box", "mixed").unwrap();
    assert_not_meshed(&out, "Ring", "mixed").unwrap();
    assert_meshed(&out, "Fillet", "mixed").unwrap();

    let names: Vec<&str> = m
        .tessellator()
        .calls()
        .iter()
        .map(|(name, _, _)| name.as_str())
        .collect();
    assert_eq!(names, ["Fillet"]);
}

#[test]
fn failed_tessellation_leaves_the_node_out() {
    let mut m = SceneBuilder::new()
        .with_tessellator(MockTessellator::new().with_failure("Fillet"));
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.other("Fillet", "Part::Fillet").unwrap();

    let out = m.export().unwrap();
    assert_not_meshed(&out, "Fillet", "failure").unwrap();
    assert_no_meshes(&out, "failure").unwrap();

    let report = m.report().unwrap();
    assert_eq!(report.count(Representation::Analytic), 1);
    assert_eq!(report.count(Representation::Empty), 1);
}

#[test]
fn stored_mesh_is_declared_as_is() {
    let mut m = SceneBuilder::new();
    m.mesh(
        "Scan",
        TriMesh::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
            vec![[0, 1, 2]],
        ),
    )
    .unwrap();

    let out = m.export().unwrap();
    assert_meshed(&out, "Scan", "stored mesh").unwrap();
    assert_contains(&out.meshes, "vertex_vectors {\n\t\t3,\n\t\t<0, 0, 0>", "stored mesh")
        .unwrap();
    assert!(m.tessellator().calls().is_empty());
}

// ── Scenario 7: Materials and user overrides ────────────────────────────

#[test]
fn user_material_overrides_view_color() {
    let mut m = SceneBuilder::new()
        .with_user_inc("#declare Box_material = material { texture { pigment { Red } } }\n");
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.color("Box", [0.0, 0.0, 1.0]).unwrap();

    let out = m.export().unwrap();
    assert_contains(&out.scene, "material {Box_material }", "override").unwrap();
    assert_not_contains(&out.scene, "pigment { color rgb", "override").unwrap();
}

#[test]
fn broken_user_include_is_ignored() {
    let mut m = SceneBuilder::new().with_user_inc("#declare Box_material = /* never closed");
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.color("Box", [0.0, 0.0, 1.0]).unwrap();

    let out = m.export().unwrap();
    assert_not_contains(&out.scene, "Box_material", "broken include").unwrap();
    assert_contains(&out.scene, "pigment { color rgb", "broken include").unwrap();
}

#[test]
fn user_material_wins_over_unrelated_library_names() {
    let mut m = SceneBuilder::new()
        .with_texture_inc("#declare Box_finish = finish { phong 1 }\n")
        .with_user_inc("#declare Box_material = material { texture { pigment { Red } } }\n");
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.color("Box", [1.0, 0.0, 0.0]).unwrap();

    let out = m.export().unwrap();
    let section = node_section(&out.scene, "Box").unwrap();
    assert_contains(section, "material {Box_material }", "unrelated library name").unwrap();
    assert_not_contains(section, "pigment { color rgb", "unrelated library name").unwrap();
}

#[test]
fn library_without_known_suffix_keeps_view_color() {
    let mut m = SceneBuilder::new().with_texture_inc("#declare Box_finish = finish { phong 1 }\n");
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.color("Box", [1.0, 0.0, 0.0]).unwrap();

    let out = m.export().unwrap();
    assert_contains(
        &out.scene,
        "pigment { color rgb <1.000, 0.000, 0.000> }",
        "unrelated library name",
    )
    .unwrap();
}

// ── Scenario 8: Document structure ──────────────────────────────────────

#[test]
fn hidden_nodes_and_folders_are_not_roots() {
    let mut m = SceneBuilder::new();
    m.cuboid("Shown", 1.0, 1.0, 1.0).unwrap();
    m.cuboid("Hidden", 1.0, 1.0, 1.0).unwrap();
    m.hide("Hidden").unwrap();
    m.sphere("Inside", 1.0).unwrap();
    m.group("Folder", &["Inside"]).unwrap();

    let report = m.report().unwrap();
    let labels: Vec<&str> = report.roots.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Shown", "Inside"]);
}

#[test]
fn part_members_are_exported_once_inside_the_part() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    m.cone("Cone", 1.0, 0.0, 2.0).unwrap();
    m.part("Part", &["Box", "Cone"]).unwrap();

    let out = m.export().unwrap();
    assert_occurrences(&out.scene, "//----- Box -----", 1, "part").unwrap();
    assert_occurrences(&out.scene, "//----- Cone -----", 1, "part").unwrap();
    assert!(node_section(&out.scene, "Part").unwrap().contains("union {"));
}

#[test]
fn clone_source_is_exported_beside_the_part() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 2.0, 2.0, 2.0).unwrap();
    m.clone_of("Clone", &["Box"], [1.0, 1.0, 1.0]).unwrap();
    m.part("Part", &["Clone"]).unwrap();

    let report = m.report().unwrap();
    let labels: Vec<&str> = report.roots.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Box", "Part"]);

    let out = m.export().unwrap();
    assert_occurrences(&out.scene, "box {", 2, "clone source").unwrap();
    assert_occurrences(&out.scene, "\n//----- Box -----", 1, "clone source").unwrap();
}

#[test]
fn cycles_abort_the_export() {
    let mut m = SceneBuilder::new();
    m.cuboid("A", 1.0, 1.0, 1.0).unwrap();
    m.cuboid("B", 1.0, 1.0, 1.0).unwrap();
    m.fuse("Fusion", &["A", "B"]).unwrap();
    m.part("Part", &["Fusion"]).unwrap();
    m.link("Fusion", "Part").unwrap();

    let err = m.compile_node("Part").unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Compile(CompileError::Cycle { .. })
    ));
}

#[test]
fn export_is_deterministic() {
    let build = || {
        let mut m = SceneBuilder::new();
        m.cuboid("A", 3.0, 3.0, 3.0).unwrap();
        m.other("Shape", "Part::Feature").unwrap();
        m.fuse("Fusion", &["A", "Shape"]).unwrap();
        m.sphere("Sphere", 4.0).unwrap();
        m.place(
            "Sphere",
            Placement::new([1.0, 2.0, 3.0], Rotation::from_axis_angle([0.0, 0.0, 1.0], 45.0)),
        )
        .unwrap();
        m
    };
    let first = build().export().unwrap();
    let second = build().export().unwrap();
    assert_eq!(first.scene, second.scene);
    assert_eq!(first.meshes, second.meshes);
}

// ── Scenario 9: Project files ───────────────────────────────────────────

#[test]
fn saved_project_exports_identically() {
    let mut m = SceneBuilder::new();
    m.cuboid("Block", 10.0, 10.0, 10.0).unwrap();
    m.cylinder("Hole", 2.0, 20.0).unwrap();
    m.cut("Cut", "Block", "Hole").unwrap();
    m.other("Fillet", "Part::Fillet").unwrap();

    let json = m.save("bracket").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["project"]["name"], "bracket");

    let mut loaded = SceneBuilder::from_project(&json).unwrap();

    let before = m.export().unwrap();
    let after = loaded.export().unwrap();
    assert_eq!(before.scene, after.scene);
    assert_eq!(before.meshes, after.meshes);
    assert!(loaded.node("Hole").is_ok());
}

#[test]
fn duplicate_names_are_rejected() {
    let mut m = SceneBuilder::new();
    m.cuboid("Box", 1.0, 1.0, 1.0).unwrap();
    assert!(matches!(
        m.sphere("Box", 1.0),
        Err(HarnessError::DuplicateName { .. })
    ));
    assert!(matches!(
        m.hide("Missing"),
        Err(HarnessError::NodeNotFound { .. })
    ));
}
