//! Whole-document assembly: root selection, the global header and the
//! compiled objects.

use std::borrow::Cow;

use scene_types::{NodeId, NodeKind, SceneDocument};
use tessellator::Tessellator;
use tracing::{debug, info, instrument};

use crate::background::environment;
use crate::camera::{camera_block, freecad_light};
use crate::compiler::{Flags, SceneCompiler};
use crate::context::RenderContext;
use crate::error::CompileError;
use crate::fmt::{rgb, unpack_color};
use crate::mesh::MeshSideBuffer;
use crate::stats::SceneStatistics;

const RULE: &str = "\n//------------------------------------------\n";

/// Everything one export produces, before anything is written to disk.
#[derive(Debug, Clone)]
pub struct ExportArtifacts {
    /// Contents of `<name>.pov`.
    pub scene: String,
    /// Contents of `<name>_mesh.inc`; empty when nothing was tessellated.
    pub meshes: String,
    pub statistics: SceneStatistics,
}

/// Top level nodes: visible, not a folder, and not owned by a body or part.
pub fn roots(doc: &SceneDocument) -> Vec<NodeId> {
    let parents = doc.parent_index();
    doc.iter()
        .filter(|(_, node)| node.visible && !matches!(node.kind, NodeKind::Group))
        .filter(|(id, _)| {
            !doc.has_ancestor(&parents, *id, |k| {
                matches!(k, NodeKind::Body { .. } | NodeKind::Part)
            })
        })
        .map(|(id, _)| id)
        .collect()
}

/// Compile `doc` into a complete scene plus its mesh side file.
#[instrument(skip_all, fields(project = %ctx.settings.project_name))]
pub fn assemble(
    doc: &SceneDocument,
    ctx: &RenderContext,
    tessellator: &mut dyn Tessellator,
) -> Result<ExportArtifacts, CompileError> {
    let statistics = SceneStatistics::collect(doc, ctx);
    info!(
        total = statistics.total,
        unsupported = statistics.unsupported,
        "{statistics}"
    );

    let doc = if ctx.settings.repair_rotation {
        let mut repaired = doc.clone();
        repaired.normalize_rotations();
        Cow::Owned(repaired)
    } else {
        Cow::Borrowed(doc)
    };

    let roots = roots(&doc);
    debug!(roots = roots.len(), "compiling root nodes");

    let mut side = MeshSideBuffer::new();
    let mut objects = String::new();
    {
        let mut compiler = SceneCompiler::new(&doc, ctx, tessellator);
        for id in roots {
            objects.push_str(&compiler.compile(id, Flags::ALL, &mut side)?);
        }
    }

    let mut scene = header(ctx, !side.is_empty());
    scene.push_str(&objects);
    info!(
        scene_bytes = scene.len(),
        meshes = side.len(),
        "scene assembled"
    );

    Ok(ExportArtifacts {
        scene,
        meshes: side.into_string(),
        statistics,
    })
}

/// Everything before the objects: defaults, includes, camera, lights and
/// background.
fn header(ctx: &RenderContext, with_meshes: bool) -> String {
    let settings = &ctx.settings;
    let paths = &ctx.paths;

    let mut out = String::from(
        "#version 3.7; // 3.6\nglobal_settings { assumed_gamma 1.0 }\n#default { finish { ambient 0.2 diffuse 0.9 } }\n",
    );
    out.push_str(&format!(
        "#default {{ pigment {{ rgb {} }} }}\n",
        rgb(unpack_color(settings.view.default_shape_color))
    ));
    out.push_str(RULE);
    out.push_str("#include \"colors.inc\"\n#include \"textures.inc\"\n");

    if let Some(radiosity) = &settings.radiosity {
        out.push_str("\n#include \"rad_def.inc\"");
        out.push_str("\nglobal_settings {\n\tradiosity {\n");
        out.push_str(&format!("\t\tRad_Settings({}, off, off)\n", radiosity.preset));
        out.push_str("\t}\n}\n");
        if radiosity.ambient_to_zero {
            out.push_str("#default { finish{ ambient 0 } }\n");
        }
    }

    out.push_str(RULE);
    out.push_str(&format!("#include \"{}\"\n", paths.texture_inc_name()));
    if with_meshes {
        out.push_str(&format!("#include \"{}\"\n", paths.mesh_inc_name()));
    }

    out.push_str(RULE);
    out.push_str("// Camera ----------------------------------\n");
    out.push_str(&camera_block(ctx));

    if settings.export_light {
        out.push_str("\n// FreeCAD Light -------------------------------------\n");
        out.push_str(freecad_light());
    }
    if settings.environment.enabled {
        out.push_str("\n// Background ------------------------------\n");
        out.push_str(&environment(ctx));
    }

    out.push_str(RULE);
    out.push_str(&format!("\n#include \"{}\"\n\n", paths.user_inc_name()));
    out.push_str("// Objects in Scene ------------------------\n");
    out
}
