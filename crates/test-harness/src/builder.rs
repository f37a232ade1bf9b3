//! SceneBuilder: fluent API for scripting scene documents in tests.
//!
//! Nodes are created and referenced by name. Exporting runs the real
//! assembler with a [`MockTessellator`], so scenarios exercise the same path
//! as the runner.

use std::collections::HashMap;

use file_format::{load_project, save_project, ProjectMetadata};
use pov_export::{
    assemble, CameraPose, ExportArtifacts, ExportSettings, Flags, IncludeResource,
    MeshSideBuffer, RenderContext, SceneCompiler,
};
use scene_types::{
    ArrayLayout, ArrayParams, BooleanOp, DirMode, ExtrusionParams, LengthType, LightParams,
    NodeId, NodeKind, PadPocket, Placement, SceneDocument, SceneNode, Sketch, TriMesh,
};
use tessellator::MockTessellator;

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};
use crate::report::ExportReport;

/// A fluent builder for constructing and exporting scene documents in tests.
pub struct SceneBuilder {
    doc: SceneDocument,
    settings: ExportSettings,
    camera: CameraPose,
    user_inc: IncludeResource,
    texture_inc: IncludeResource,
    tessellator: MockTessellator,
    names: HashMap<String, NodeId>,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self {
            doc: SceneDocument::new(),
            settings: ExportSettings::default(),
            camera: CameraPose::default(),
            user_inc: IncludeResource::empty(),
            texture_inc: IncludeResource::empty(),
            tessellator: MockTessellator::new(),
            names: HashMap::new(),
        }
    }

    /// Adjust the export settings.
    pub fn with_settings(mut self, edit: impl FnOnce(&mut ExportSettings)) -> Self {
        edit(&mut self.settings);
        self
    }

    pub fn with_camera(mut self, camera: CameraPose) -> Self {
        self.camera = camera;
        self
    }

    /// Contents of the user include file. Broken files are accepted and
    /// become unusable, as in a real run.
    pub fn with_user_inc(mut self, source: &str) -> Self {
        self.user_inc = IncludeResource::load("user.inc", source);
        self
    }

    pub fn with_texture_inc(mut self, source: &str) -> Self {
        self.texture_inc = IncludeResource::load("textures.inc", source);
        self
    }

    pub fn with_tessellator(mut self, tessellator: MockTessellator) -> Self {
        self.tessellator = tessellator;
        self
    }

    // ── Primitives ──────────────────────────────────────────────────────

    pub fn cuboid(&mut self, name: &str, l: f64, w: f64, h: f64) -> Result<NodeId, HarnessError> {
        self.add(
            name,
            NodeKind::Box {
                length: l,
                width: w,
                height: h,
            },
        )
    }

    pub fn sphere(&mut self, name: &str, radius: f64) -> Result<NodeId, HarnessError> {
        self.add(name, NodeKind::Sphere { radius })
    }

    pub fn cylinder(&mut self, name: &str, radius: f64, height: f64) -> Result<NodeId, HarnessError> {
        self.add(name, NodeKind::Cylinder { radius, height })
    }

    pub fn cone(
        &mut self,
        name: &str,
        radius1: f64,
        radius2: f64,
        height: f64,
    ) -> Result<NodeId, HarnessError> {
        self.add(
            name,
            NodeKind::Cone {
                radius1,
                radius2,
                height,
            },
        )
    }

    pub fn torus(&mut self, name: &str, radius1: f64, radius2: f64) -> Result<NodeId, HarnessError> {
        self.add(name, NodeKind::Torus { radius1, radius2 })
    }

    /// A stored triangle mesh.
    pub fn mesh(&mut self, name: &str, mesh: TriMesh) -> Result<NodeId, HarnessError> {
        self.add(name, NodeKind::Mesh(mesh))
    }

    /// A shape the exporter has no rule for, e.g. `Part::Fillet`.
    pub fn other(&mut self, name: &str, type_id: &str) -> Result<NodeId, HarnessError> {
        self.add(
            name,
            NodeKind::Other {
                type_id: type_id.into(),
            },
        )
    }

    pub fn point_light(&mut self, name: &str, color: [f64; 3]) -> Result<NodeId, HarnessError> {
        self.add(
            name,
            NodeKind::PointLight(LightParams {
                color,
                ..LightParams::default()
            }),
        )
    }

    // ── Composites ──────────────────────────────────────────────────────

    /// Boolean over the named operands. The operands are hidden, like the
    /// host does when it creates the operation.
    pub fn boolean(
        &mut self,
        name: &str,
        op: BooleanOp,
        operands: &[&str],
    ) -> Result<NodeId, HarnessError> {
        let children = self.consume(operands)?;
        self.add_with_children(name, NodeKind::Boolean { op }, children)
    }

    pub fn cut(&mut self, name: &str, base: &str, tool: &str) -> Result<NodeId, HarnessError> {
        self.boolean(name, BooleanOp::Cut, &[base, tool])
    }

    pub fn fuse(&mut self, name: &str, operands: &[&str]) -> Result<NodeId, HarnessError> {
        self.boolean(name, BooleanOp::Fuse, operands)
    }

    /// Standard part. Members stay visible.
    pub fn part(&mut self, name: &str, members: &[&str]) -> Result<NodeId, HarnessError> {
        let children = self.ids(members)?;
        self.add_with_children(name, NodeKind::Part, children)
    }

    /// Document folder.
    pub fn group(&mut self, name: &str, members: &[&str]) -> Result<NodeId, HarnessError> {
        let children = self.ids(members)?;
        self.add_with_children(name, NodeKind::Group, children)
    }

    /// Polar array of `base` around the Z axis through the origin.
    pub fn polar_array(
        &mut self,
        name: &str,
        base: &str,
        count: u32,
        angle: f64,
    ) -> Result<NodeId, HarnessError> {
        let base = self.consume(&[base])?[0];
        self.add(
            name,
            NodeKind::Array(ArrayParams {
                base,
                layout: ArrayLayout::Polar {
                    center: [0.0; 3],
                    axis: [0.0, 0.0, 1.0],
                    interval_axis: [0.0; 3],
                    count,
                    angle,
                },
            }),
        )
    }

    /// Orthogonal array with the same spacing along every axis.
    pub fn ortho_array(
        &mut self,
        name: &str,
        base: &str,
        counts: [u32; 3],
        spacing: f64,
    ) -> Result<NodeId, HarnessError> {
        let base = self.consume(&[base])?[0];
        self.add(
            name,
            NodeKind::Array(ArrayParams {
                base,
                layout: ArrayLayout::Ortho {
                    interval_x: [spacing, 0.0, 0.0],
                    interval_y: [0.0, spacing, 0.0],
                    interval_z: [0.0, 0.0, spacing],
                    number_x: counts[0],
                    number_y: counts[1],
                    number_z: counts[2],
                },
            }),
        )
    }

    /// An array type without an analytic rule.
    pub fn other_array(
        &mut self,
        name: &str,
        base: &str,
        array_type: &str,
    ) -> Result<NodeId, HarnessError> {
        let base = self.consume(&[base])?[0];
        self.add(
            name,
            NodeKind::Array(ArrayParams {
                base,
                layout: ArrayLayout::Other {
                    array_type: array_type.into(),
                },
            }),
        )
    }

    pub fn clone_of(
        &mut self,
        name: &str,
        sources: &[&str],
        scale: [f64; 3],
    ) -> Result<NodeId, HarnessError> {
        let sources = self.ids(sources)?;
        self.add(name, NodeKind::Clone { sources, scale })
    }

    // ── Sketch Features ─────────────────────────────────────────────────

    pub fn sketch(&mut self, name: &str, sketch: Sketch) -> Result<NodeId, HarnessError> {
        self.add(name, NodeKind::Sketch(sketch))
    }

    /// Straight extrusion along the sketch normal.
    pub fn extrude(&mut self, name: &str, sketch: &str, length: f64) -> Result<NodeId, HarnessError> {
        let base = self.consume(&[sketch])?[0];
        self.add(
            name,
            NodeKind::Extrusion(ExtrusionParams {
                base,
                length_fwd: length,
                length_rev: 0.0,
                symmetric: false,
                reversed: false,
                dir_mode: DirMode::Normal,
                taper_angle: 0.0,
                taper_angle_rev: 0.0,
            }),
        )
    }

    pub fn pad(&mut self, name: &str, sketch: &str, length: f64) -> Result<NodeId, HarnessError> {
        let profile = self.consume(&[sketch])?[0];
        self.add(name, NodeKind::Pad(pad_pocket(profile, length, None)))
    }

    /// Pocket cut into `base` (the previous solid feature), if any.
    pub fn pocket(
        &mut self,
        name: &str,
        sketch: &str,
        length: f64,
        base: Option<&str>,
    ) -> Result<NodeId, HarnessError> {
        let profile = self.consume(&[sketch])?[0];
        let base = base.map(|b| self.id(b)).transpose()?;
        self.add(name, NodeKind::Pocket(pad_pocket(profile, length, base)))
    }

    /// PartDesign body owning `features`, with `tip` as its result.
    pub fn body(&mut self, name: &str, features: &[&str], tip: &str) -> Result<NodeId, HarnessError> {
        let children = self.ids(features)?;
        let tip = self.id(tip)?;
        self.add_with_children(name, NodeKind::Body { tip: Some(tip) }, children)
    }

    // ── Node Edits ──────────────────────────────────────────────────────

    pub fn place(&mut self, name: &str, placement: Placement) -> Result<&mut Self, HarnessError> {
        self.node_mut(name)?.placement = placement;
        Ok(self)
    }

    pub fn hide(&mut self, name: &str) -> Result<&mut Self, HarnessError> {
        self.node_mut(name)?.visible = false;
        Ok(self)
    }

    pub fn color(&mut self, name: &str, rgb: [f32; 3]) -> Result<&mut Self, HarnessError> {
        self.node_mut(name)?.view.shape_color = rgb;
        Ok(self)
    }

    pub fn label(&mut self, name: &str, label: &str) -> Result<&mut Self, HarnessError> {
        self.node_mut(name)?.label = label.into();
        Ok(self)
    }

    /// Append `child` to `parent`'s children, even if that closes a cycle.
    pub fn link(&mut self, parent: &str, child: &str) -> Result<&mut Self, HarnessError> {
        let child = self.id(child)?;
        self.node_mut(parent)?.children.push(child);
        Ok(self)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn id(&self, name: &str) -> Result<NodeId, HarnessError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| HarnessError::NodeNotFound { name: name.into() })
    }

    pub fn node(&self, name: &str) -> Result<&SceneNode, HarnessError> {
        let id = self.id(name)?;
        self.doc
            .get(id)
            .ok_or_else(|| HarnessError::NodeNotFound { name: name.into() })
    }

    pub fn document(&self) -> &SceneDocument {
        &self.doc
    }

    pub fn tessellator(&self) -> &MockTessellator {
        &self.tessellator
    }

    pub fn context(&self) -> RenderContext {
        RenderContext::new(self.settings.clone(), self.camera.clone())
            .with_resources(self.user_inc.clone(), self.texture_inc.clone())
    }

    // ── Export ──────────────────────────────────────────────────────────

    /// Assemble the whole document.
    pub fn export(&mut self) -> Result<ExportArtifacts, HarnessError> {
        let ctx = self.context();
        Ok(assemble(&self.doc, &ctx, &mut self.tessellator)?)
    }

    /// Compile a single node with every flag set.
    pub fn compile_node(&mut self, name: &str) -> Result<(String, MeshSideBuffer), HarnessError> {
        let id = self.id(name)?;
        let ctx = self.context();
        let mut side = MeshSideBuffer::new();
        let code = SceneCompiler::new(&self.doc, &ctx, &mut self.tessellator)
            .compile(id, Flags::ALL, &mut side)?;
        Ok((code, side))
    }

    /// Export and run every structural oracle over the result.
    pub fn check_export(&mut self) -> Result<Vec<OracleVerdict>, HarnessError> {
        let artifacts = self.export()?;
        Ok(oracle::check_all(&artifacts))
    }

    /// Export and describe what each root node became.
    pub fn report(&mut self) -> Result<ExportReport, HarnessError> {
        let artifacts = self.export()?;
        Ok(ExportReport::build(&self.doc, &artifacts, self.tessellator.calls().len()))
    }

    // ── Persistence ─────────────────────────────────────────────────────

    /// Serialize the document and camera as a project file.
    pub fn save(&self, project_name: &str) -> Result<String, HarnessError> {
        save_project(&self.doc, &self.camera, &ProjectMetadata::new(project_name))
            .map_err(|e| HarnessError::Project(e.to_string()))
    }

    /// Builder over a loaded project file. Every node is addressable by its
    /// internal name.
    pub fn from_project(json: &str) -> Result<Self, HarnessError> {
        let loaded = load_project(json).map_err(|e| HarnessError::Project(e.to_string()))?;
        let names = loaded
            .document
            .iter()
            .map(|(id, node)| (node.name.clone(), id))
            .collect();
        Ok(Self {
            doc: loaded.document,
            camera: loaded.camera,
            names,
            ..Self::new()
        })
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn add(&mut self, name: &str, kind: NodeKind) -> Result<NodeId, HarnessError> {
        self.add_with_children(name, kind, Vec::new())
    }

    fn add_with_children(
        &mut self,
        name: &str,
        kind: NodeKind,
        children: Vec<NodeId>,
    ) -> Result<NodeId, HarnessError> {
        if self.names.contains_key(name) {
            return Err(HarnessError::DuplicateName { name: name.into() });
        }
        let mut node = SceneNode::new(name, kind);
        node.children = children;
        let id = self.doc.add(node);
        self.names.insert(name.to_string(), id);
        Ok(id)
    }

    fn ids(&self, names: &[&str]) -> Result<Vec<NodeId>, HarnessError> {
        names.iter().map(|n| self.id(n)).collect()
    }

    /// Resolve `names` and hide those nodes.
    fn consume(&mut self, names: &[&str]) -> Result<Vec<NodeId>, HarnessError> {
        let ids = self.ids(names)?;
        for &id in &ids {
            if let Some(node) = self.doc.get_mut(id) {
                node.visible = false;
            }
        }
        Ok(ids)
    }

    fn node_mut(&mut self, name: &str) -> Result<&mut SceneNode, HarnessError> {
        let id = self.id(name)?;
        self.doc
            .get_mut(id)
            .ok_or_else(|| HarnessError::NodeNotFound { name: name.into() })
    }
}

fn pad_pocket(profile: NodeId, length: f64, base_feature: Option<NodeId>) -> PadPocket {
    PadPocket {
        profile,
        length,
        midplane: false,
        reversed: false,
        length_type: LengthType::Length,
        base_feature,
    }
}
