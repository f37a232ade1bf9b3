//! Tessellated stand-ins for nodes without an analytic POV-Ray form.

use std::collections::HashMap;

use scene_types::{NodeId, NodeKind, SceneDocument, SceneNode, TriMesh};
use tessellator::{Tessellator, DEFAULT_ANGULAR_DEFLECTION};
use tracing::{debug, warn};

use crate::compiler::Flags;
use crate::context::RenderContext;
use crate::fmt::num;
use crate::material::{material, photons};
use crate::names::mesh_ident;
use crate::placement::{inverted_rotation, translation};

/// Accumulates `mesh2` declarations for the `_mesh.inc` side file.
#[derive(Debug, Default)]
pub struct MeshSideBuffer {
    text: String,
    declared: HashMap<String, NodeId>,
}

impl MeshSideBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Number of meshes declared so far.
    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_declared(&self, ident: &str) -> bool {
        self.declared.contains_key(ident)
    }

    /// Append the declaration of `ident` unless this node already declared it.
    fn declare(&mut self, ident: &str, id: NodeId, mesh: &TriMesh) {
        match self.declared.get(ident) {
            Some(owner) if *owner == id => return,
            Some(_) => warn!(ident, "two nodes share a label, mesh declaration is redefined"),
            None => {}
        }
        self.declared.insert(ident.to_string(), id);
        self.text.push_str(&mesh2(ident, mesh));
    }
}

fn mesh2(ident: &str, mesh: &TriMesh) -> String {
    let mut out = format!(
        "#declare {ident} =\nmesh2 {{\n\tvertex_vectors {{\n\t\t{}",
        mesh.vertices.len()
    );
    for v in &mesh.vertices {
        out.push_str(&format!(",\n\t\t<{}, {}, {}>", num(v[0]), num(v[1]), num(v[2])));
    }
    out.push_str("\n\t}\n\n\tface_indices {\n");
    out.push_str(&format!("\t\t{}", mesh.triangles.len()));
    for t in &mesh.triangles {
        out.push_str(&format!(",\n\t\t<{}, {}, {}>", t[0], t[1], t[2]));
    }
    out.push_str("\n\t}\n\n\tinside_vector <1, 1, 1>\n}\n\n");
    out
}

fn tessellate(
    doc: &SceneDocument,
    id: NodeId,
    node: &SceneNode,
    tessellator: &mut dyn Tessellator,
) -> Option<TriMesh> {
    if let NodeKind::Mesh(mesh) = &node.kind {
        return Some(mesh.clone());
    }
    let angular = node
        .view
        .angular_deflection
        .unwrap_or(DEFAULT_ANGULAR_DEFLECTION);
    match tessellator.tessellate(doc, id, node.view.deviation, angular) {
        Ok(mesh) => Some(mesh),
        Err(err) => {
            warn!(node = %node.name, error = %err, "tessellation failed, node skipped");
            None
        }
    }
}

/// Emit `node` as a reference to its tessellated mesh.
///
/// The tessellation carries the node's placement already, so with
/// `flags.placement` off the placement is undone explicitly. The material is
/// always attached. Returns an empty string when the node has no geometry.
pub fn mesh_fallback(
    doc: &SceneDocument,
    ctx: &RenderContext,
    tessellator: &mut dyn Tessellator,
    side: &mut MeshSideBuffer,
    id: NodeId,
    node: &SceneNode,
    flags: Flags,
) -> String {
    let ident = mesh_ident(&node.label);

    if flags.mesh_def {
        let Some(mesh) = tessellate(doc, id, node, tessellator) else {
            return String::new();
        };
        if mesh.is_empty() {
            debug!(node = %node.name, "empty tessellation, node contributes nothing");
            return String::new();
        }
        side.declare(&ident, id, &mesh);
    }
    debug!(node = %node.name, kind = node.kind.type_id(), "emitted as mesh");

    let mut code = format!("\nobject {{ {ident}\n");
    if !flags.placement {
        let t = translation(node);
        if !t.is_empty() {
            code.push_str(&format!("\t{t} * (-1)\n"));
        }
        for r in inverted_rotation(doc, node) {
            code.push_str(&format!("\t{r}\n"));
        }
    }

    let m = material(ctx, node);
    if !m.is_empty() {
        code.push_str(&format!("\t{m}\n"));
    }
    if flags.photons {
        let p = photons(ctx, node);
        if !p.is_empty() {
            code.push_str(&format!("\t{p}\n"));
        }
    }
    if flags.close {
        code.push_str("}\n");
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CameraPose;
    use crate::settings::ExportSettings;
    use scene_types::{Placement, Rotation};
    use tessellator::MockTessellator;

    fn ctx() -> RenderContext {
        RenderContext::new(ExportSettings::default(), CameraPose::default())
    }

    fn other(name: &str) -> SceneNode {
        SceneNode::new(
            name,
            NodeKind::Other {
                type_id: "Part::Feature".into(),
            },
        )
    }

    #[test]
    fn declares_mesh_and_references_it() {
        let mut doc = SceneDocument::new();
        let id = doc.add(other("Shape"));
        let node = doc.get(id).unwrap().clone();
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();

        let code = mesh_fallback(&doc, &ctx(), &mut tess, &mut side, id, &node, Flags::ALL);
        assert_eq!(code, "\nobject { Shape_mesh\n}\n");
        assert!(side.as_str().starts_with("#declare Shape_mesh =\nmesh2 {\n\tvertex_vectors {\n\t\t4,\n\t\t<0, 0, 0>"));
        assert!(side.as_str().contains("\tface_indices {\n\t\t4,\n\t\t<0, 2, 1>"));
        assert!(side.as_str().ends_with("\tinside_vector <1, 1, 1>\n}\n\n"));
        assert_eq!(tess.calls(), &[("Shape".to_string(), 0.5, 0.5)]);
    }

    #[test]
    fn each_node_is_declared_once() {
        let mut doc = SceneDocument::new();
        let id = doc.add(other("Shape"));
        let node = doc.get(id).unwrap().clone();
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();
        let c = ctx();

        mesh_fallback(&doc, &c, &mut tess, &mut side, id, &node, Flags::ALL);
        let once = side.as_str().to_string();
        mesh_fallback(&doc, &c, &mut tess, &mut side, id, &node, Flags::ALL);
        assert_eq!(side.as_str(), once);
        assert_eq!(side.len(), 1);
    }

    #[test]
    fn empty_tessellation_contributes_nothing() {
        let mut doc = SceneDocument::new();
        let id = doc.add(other("Shape"));
        let node = doc.get(id).unwrap().clone();
        let mut tess = MockTessellator::new().with_empty("Shape");
        let mut side = MeshSideBuffer::new();

        let code = mesh_fallback(&doc, &ctx(), &mut tess, &mut side, id, &node, Flags::ALL);
        assert_eq!(code, "");
        assert!(side.is_empty());
    }

    #[test]
    fn suppressed_placement_is_undone() {
        let mut doc = SceneDocument::new();
        let mut n = other("Shape");
        n.placement = Placement::new(
            [5.0, 0.0, 0.0],
            Rotation::from_axis_angle([0.0, 0.0, 1.0], 90.0),
        );
        let id = doc.add(n);
        let node = doc.get(id).unwrap().clone();
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();

        let flags = Flags {
            placement: false,
            close: false,
            ..Flags::ALL
        };
        let code = mesh_fallback(&doc, &ctx(), &mut tess, &mut side, id, &node, flags);
        assert_eq!(
            code,
            "\nobject { Shape_mesh\n\ttranslate <5, 0, 0> * (-1)\n\trotate <0, 0, -90>\n"
        );
    }

    #[test]
    fn native_meshes_skip_the_tessellator() {
        let mut doc = SceneDocument::new();
        let mesh = TriMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        );
        let id = doc.add(SceneNode::new("Mesh", NodeKind::Mesh(mesh)));
        let node = doc.get(id).unwrap().clone();
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();

        mesh_fallback(&doc, &ctx(), &mut tess, &mut side, id, &node, Flags::ALL);
        assert!(tess.calls().is_empty());
        assert!(side.as_str().contains("\t\t1,\n\t\t<0, 1, 2>"));
    }
}
