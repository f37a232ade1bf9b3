//! The recursive scene graph compiler.
//!
//! [`SceneCompiler::compile`] dispatches on the node kind, compiles children
//! recursively and appends the trailing clauses (material, photons, placement,
//! closing brace) selected by [`Flags`]. Nodes and configurations without an
//! exact POV-Ray form go through [`mesh::mesh_fallback`]; those branches
//! return immediately because the mesh already carries its placement.

use scene_types::{
    AreaLightParams, ArrayLayout, ArrayParams, BooleanOp, LightParams, NodeId, NodeKind,
    PadPocket, SceneDocument, SceneNode, SpotLightParams,
};
use tessellator::Tessellator;
use tracing::{debug, warn};

use crate::context::RenderContext;
use crate::encoder;
use crate::error::CompileError;
use crate::fmt::{any_nonzero, indent, num, vec3};
use crate::material::{material, photons};
use crate::mesh::{self, MeshSideBuffer};
use crate::names::{capitalize, sanitize};
use crate::placement::{rotation, translation};
use crate::spline::{compile_profile, BezierSpline};
use crate::support;

/// Deepest nesting the compiler follows before giving up.
pub const MAX_DEPTH: usize = 256;

/// Which optional parts of a node's statement to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// `rotate` and `translate` from the node's placement.
    pub placement: bool,
    /// Material or pigment.
    pub pigment: bool,
    /// Photon block.
    pub photons: bool,
    /// Closing brace of the statement.
    pub close: bool,
    /// `//----- Label -----` comment.
    pub label: bool,
    /// Declare the mesh of a tessellated node in the side buffer.
    pub mesh_def: bool,
}

impl Flags {
    pub const ALL: Flags = Flags {
        placement: true,
        pigment: true,
        photons: true,
        close: true,
        label: true,
        mesh_def: true,
    };

    pub const NONE: Flags = Flags {
        placement: false,
        pigment: false,
        photons: false,
        close: false,
        label: false,
        mesh_def: false,
    };
}

impl Default for Flags {
    fn default() -> Self {
        Flags::ALL
    }
}

/// Compiles nodes of one document with one render context.
pub struct SceneCompiler<'a> {
    doc: &'a SceneDocument,
    ctx: &'a RenderContext,
    tessellator: &'a mut dyn Tessellator,
    /// Nodes currently being compiled, outermost first.
    path: Vec<NodeId>,
}

impl<'a> SceneCompiler<'a> {
    pub fn new(
        doc: &'a SceneDocument,
        ctx: &'a RenderContext,
        tessellator: &'a mut dyn Tessellator,
    ) -> Self {
        Self {
            doc,
            ctx,
            tessellator,
            path: Vec::new(),
        }
    }

    /// Compile one node. Meshes needed along the way are declared in `side`.
    ///
    /// A reference to a node that no longer exists compiles to nothing.
    pub fn compile(
        &mut self,
        id: NodeId,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        let doc = self.doc;
        let Some(node) = doc.get(id) else {
            warn!(?id, "reference to a missing node skipped");
            return Ok(String::new());
        };
        if self.path.contains(&id) {
            return Err(CompileError::Cycle {
                name: node.name.clone(),
            });
        }
        if self.path.len() >= MAX_DEPTH {
            return Err(CompileError::DepthExceeded {
                name: node.name.clone(),
                limit: MAX_DEPTH,
            });
        }

        self.path.push(id);
        let result = self.compile_node(id, node, flags, side);
        self.path.pop();
        result
    }

    fn fallback(
        &mut self,
        id: NodeId,
        node: &SceneNode,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> String {
        mesh::mesh_fallback(self.doc, self.ctx, &mut *self.tessellator, side, id, node, flags)
    }

    fn compile_node(
        &mut self,
        id: NodeId,
        node: &'a SceneNode,
        mut flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        debug!(node = %node.name, kind = node.kind.type_id(), "compiling");
        let mut code = if flags.label {
            format!("\n//----- {} -----", sanitize(&node.label))
        } else {
            String::new()
        };

        match &node.kind {
            NodeKind::Box { .. }
            | NodeKind::Sphere { .. }
            | NodeKind::Ellipsoid { .. }
            | NodeKind::Cone { .. }
            | NodeKind::Cylinder { .. }
            | NodeKind::Torus { .. }
            | NodeKind::Plane { .. } => {
                code.push_str(&encoder::encode(&node.kind).unwrap_or_default());
            }
            NodeKind::ImagePlane { .. } => {
                code.push_str(&encoder::encode(&node.kind).unwrap_or_default());
                flags.pigment = false;
            }
            NodeKind::Boolean { op } => {
                code.push_str(&self.boolean(*op, node, flags, side)?);
            }
            NodeKind::Part | NodeKind::Group => {
                code.push_str(&self.container(node, flags, side)?);
                flags.pigment = false;
            }
            NodeKind::Array(params) => match self.array(node, params, flags, side)? {
                Some(body) => {
                    code.push_str("\nunion {\n");
                    code.push_str(&indent(&body));
                    flags.pigment = false;
                    flags.placement = false;
                    flags.photons = false;
                }
                None => {
                    code.push_str(&self.fallback(id, node, flags, side));
                    return Ok(code);
                }
            },
            NodeKind::Clone { sources, scale } => {
                code.push_str(&self.clone_sources(sources, *scale, side)?);
            }
            NodeKind::Extrusion(_) => match self.extrusion(node) {
                Some(prism) => code.push_str(&prism),
                None => {
                    code.push_str(&self.fallback(id, node, flags, side));
                    return Ok(code);
                }
            },
            NodeKind::Pad(params) => {
                return self.pad_pocket(code, id, node, params, false, flags, side);
            }
            NodeKind::Pocket(params) => {
                return self.pad_pocket(code, id, node, params, true, flags, side);
            }
            NodeKind::Body { tip } => {
                if !support::is_body_supported(self.doc, id) {
                    debug!(node = %node.name, "body has unsupported features");
                    code.push_str(&self.fallback(id, node, flags, side));
                    return Ok(code);
                }
                let Some(tip) = tip else {
                    return Ok(String::new());
                };
                let tip_code = self.compile(*tip, Flags::ALL, side)?;
                code.push_str("\nunion {\n");
                code.push_str(&indent(&tip_code));
            }
            NodeKind::PointLight(light) => {
                code.push_str(&light_source(light, ""));
                flags.pigment = false;
            }
            NodeKind::AreaLight(area) => {
                code.push_str(&light_source(&area.light, &area_light(area)));
                flags.pigment = false;
            }
            NodeKind::SpotLight(spot) => {
                code.push_str(&light_source(&spot.light, &spot_light(spot)));
                flags.pigment = false;
            }
            NodeKind::Sketch(_)
            | NodeKind::Datum { .. }
            | NodeKind::Mesh(_)
            | NodeKind::Other { .. } => {
                code.push_str(&self.fallback(id, node, flags, side));
                return Ok(code);
            }
        }

        code.push('\n');
        code.push_str(&self.trailing(node, flags));
        Ok(code)
    }

    /// Material, photons, rotation, translation and closing brace.
    fn trailing(&self, node: &SceneNode, flags: Flags) -> String {
        let mut out = String::new();
        if flags.pigment {
            let m = material(self.ctx, node);
            if !m.is_empty() {
                out.push_str(&indent(&m));
                out.push('\n');
            }
        }
        if flags.photons {
            let p = photons(self.ctx, node);
            if !p.is_empty() {
                out.push_str(&indent(&p));
                out.push('\n');
            }
        }
        if flags.placement {
            let r = rotation(self.doc, node);
            if !r.is_empty() {
                out.push_str(&format!("\t{r}\n"));
            }
            let t = translation(node);
            if !t.is_empty() {
                out.push_str(&format!("\t{t}\n"));
            }
        }
        if flags.close {
            out.push_str("}\n");
        }
        out
    }

    fn boolean(
        &mut self,
        op: BooleanOp,
        node: &SceneNode,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        let keyword = match op {
            BooleanOp::Cut => "difference",
            BooleanOp::Fuse | BooleanOp::MultiFuse | BooleanOp::Compound => "merge",
            BooleanOp::Common | BooleanOp::MultiCommon => "intersection",
        };
        let child_flags = Flags {
            placement: true,
            close: true,
            label: true,
            ..flags
        };

        let mut out = format!("\n{keyword} {{\n");
        for child in &node.children {
            if !self.doc.contains(*child) {
                warn!(node = %node.name, "boolean operand missing, skipped");
                continue;
            }
            out.push_str(&indent(&self.compile(*child, child_flags, side)?));
        }
        Ok(out)
    }

    /// `union` over the visible children of a part or group.
    fn container(
        &mut self,
        node: &SceneNode,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        let child_flags = Flags {
            placement: true,
            close: true,
            ..flags
        };
        let mut out = String::from("\nunion {\n");
        for child in &node.children {
            let visible = self.doc.get(*child).is_some_and(|c| c.visible);
            if visible {
                out.push_str(&indent(&self.compile(*child, child_flags, side)?));
            }
        }
        Ok(out)
    }

    /// Loop unrolling code of an array, or `None` when the array has to be
    /// tessellated.
    fn array(
        &mut self,
        node: &SceneNode,
        params: &ArrayParams,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<Option<String>, CompileError> {
        let doc = self.doc;
        let Some(base) = doc.get(params.base) else {
            debug!(node = %node.name, "array base missing");
            return Ok(None);
        };
        let decl = sanitize(&format!("{}_{}", capitalize(&base.label), base.name));

        match &params.layout {
            ArrayLayout::Polar {
                center,
                axis,
                interval_axis,
                count,
                angle,
            } => {
                let scale = axis
                    .iter()
                    .copied()
                    .max_by(|a, b| a.abs().total_cmp(&b.abs()))
                    .unwrap_or(0.0)
                    .abs();
                if scale == 0.0 {
                    debug!(node = %node.name, "polar array without axis");
                    return Ok(None);
                }
                let axis = axis.map(|c| c / scale);

                let child_flags = Flags {
                    placement: true,
                    close: true,
                    ..flags
                };
                let child = self.compile(params.base, child_flags, side)?;

                let mut out = format!("\n#declare {decl} = {child}");
                out.push_str("\n#declare i = 0;\n");
                out.push_str(&format!("#declare endNo = {count};\n"));
                out.push_str(&format!("#declare axis = {};\n", vec3(axis)));
                out.push_str(&format!("#declare arrAngle = {};\n", num(*angle)));
                out.push_str("#while (i < endNo)\n");
                out.push_str(&format!("\tobject {{ {decl}\n"));
                let centered = any_nonzero(center);
                if centered {
                    out.push_str(&format!("\t\ttranslate -{}\n", vec3(*center)));
                }
                out.push_str("\t\t#declare rotAngle = i * arrAngle / endNo;\n");
                out.push_str("\t\t#local vX = vaxis_rotate(x, axis, rotAngle);\n");
                out.push_str("\t\t#local vY = vaxis_rotate(y, axis, rotAngle);\n");
                out.push_str("\t\t#local vZ = vaxis_rotate(z, axis, rotAngle);\n");
                out.push_str("\t\ttransform {\n");
                out.push_str(
                    "\t\t\tmatrix <vX.x, vX.y, vX.z, vY.x, vY.y, vY.z, vZ.x, vZ.y, vZ.z, 0, 0, 0>\n",
                );
                out.push_str("\t\t}\n");
                if centered {
                    out.push_str(&format!("\t\ttranslate {}\n", vec3(*center)));
                }
                if flags.placement {
                    let r = rotation(doc, node);
                    if !r.is_empty() {
                        out.push_str(&format!("\t\t{r}\n"));
                    }
                }
                if any_nonzero(interval_axis) {
                    out.push_str(&format!("\t\ttranslate {} * i\n", vec3(*interval_axis)));
                }
                if flags.placement {
                    let t = translation(node);
                    if !t.is_empty() {
                        out.push_str(&format!("\t\t{t}\n"));
                    }
                }
                out.push_str(&self.iteration_clauses(node, flags));
                out.push_str("\t}\n\t#declare i = i + 1;\n#end\n");
                Ok(Some(out))
            }
            ArrayLayout::Ortho {
                interval_x,
                interval_y,
                interval_z,
                number_x,
                number_y,
                number_z,
            } => {
                let child_flags = Flags {
                    placement: true,
                    close: true,
                    mesh_def: true,
                    ..flags
                };
                let child = self.compile(params.base, child_flags, side)?;

                let mut out = format!("\n#declare {decl} = {child}");
                out.push_str(&format!("#declare intervalX = {};\n", vec3(*interval_x)));
                out.push_str(&format!("#declare intervalY = {};\n", vec3(*interval_y)));
                out.push_str(&format!("#declare intervalZ = {};\n\n", vec3(*interval_z)));
                out.push_str(&format!("#declare numX = {};\n", (*number_x).max(1)));
                out.push_str("#declare ix = 0;\n#while (ix < numX)\n");
                out.push_str(&format!("\t#declare numY = {};\n", (*number_y).max(1)));
                out.push_str("\t#declare iy = 0;\n\t#while (iy < numY)\n");
                out.push_str(&format!("\t\t#declare numZ = {};\n", (*number_z).max(1)));
                out.push_str("\t\t#declare iz = 0;\n\t\t#while (iz < numZ)\n");
                out.push_str(&format!("\t\t\tobject {{ {decl}\n"));
                out.push_str("\t\t\t\ttranslate intervalX * ix\n");
                out.push_str("\t\t\t\ttranslate intervalY * iy\n");
                out.push_str("\t\t\t\ttranslate intervalZ * iz\n");
                if flags.placement {
                    let r = rotation(doc, node);
                    if !r.is_empty() {
                        out.push_str(&format!("\t\t\t\t{r}\n"));
                    }
                    let t = translation(node);
                    if !t.is_empty() {
                        out.push_str(&format!("\t\t\t\t{t}\n"));
                    }
                }
                out.push_str(&self.iteration_clauses(node, flags));
                out.push_str("\t\t\t}\n");
                out.push_str("\t\t\t#declare iz = iz + 1;\n\t\t#end\n");
                out.push_str("\t\t#declare iy = iy + 1;\n\t#end\n");
                out.push_str("\t#declare ix = ix + 1;\n#end\n");
                Ok(Some(out))
            }
            ArrayLayout::Other { array_type } => {
                debug!(node = %node.name, %array_type, "array layout has no loop form");
                Ok(None)
            }
        }
    }

    /// Material and photons applied to every array instance.
    fn iteration_clauses(&self, node: &SceneNode, flags: Flags) -> String {
        let mut out = String::new();
        if flags.pigment {
            let m = material(self.ctx, node);
            if !m.is_empty() {
                out.push_str(&format!("\t{m}\n"));
            }
        }
        if flags.photons {
            let p = photons(self.ctx, node);
            if !p.is_empty() {
                out.push_str(&format!("\t{p}\n"));
            }
        }
        out
    }

    /// Sources of a clone, left open so the clone's own clauses apply to them.
    fn clone_sources(
        &mut self,
        sources: &[NodeId],
        scale: [f64; 3],
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        let source_flags = Flags {
            mesh_def: true,
            ..Flags::NONE
        };
        let mut out = String::new();
        for source in sources {
            if !self.doc.contains(*source) {
                warn!("clone source missing, skipped");
                continue;
            }
            out.push_str(&self.compile(*source, source_flags, side)?);
        }
        if scale.iter().any(|s| *s != 1.0) {
            out.push_str(&format!("\n\tscale {}", vec3(scale)));
        }
        Ok(out)
    }

    /// The profile sketch node and its spline, when it compiles.
    fn profile(&self, node: &SceneNode, profile: NodeId) -> Option<(&'a SceneNode, BezierSpline)> {
        let doc = self.doc;
        let sketch_node = doc.get(profile)?;
        let sketch = support::sketch_of(doc, profile)?;
        match compile_profile(sketch) {
            Ok(spline) => Some((sketch_node, spline)),
            Err(err) => {
                debug!(node = %node.name, error = %err, "profile not usable");
                None
            }
        }
    }

    fn extrusion(&self, node: &SceneNode) -> Option<String> {
        let NodeKind::Extrusion(params) = &node.kind else {
            return None;
        };
        if !support::is_extrusion_supported(self.doc, &node.kind) {
            debug!(node = %node.name, "extrusion options unsupported");
            return None;
        }
        let (sketch_node, spline) = self.profile(node, params.base)?;

        let mut start = 0.0;
        let mut end = params.length_fwd;
        if params.symmetric {
            end /= 2.0;
            start = -end;
        }
        start -= params.length_rev;
        if !params.reversed {
            start = -start;
            end = -end;
        }

        let mut out = format!(
            "\nprism {{\n\tbezier_spline\n\t{}, {}, {}",
            num(start),
            num(end),
            spline.point_count()
        );
        out.push_str(&indent(&spline.to_pov()));
        out.push('\n');
        let r = rotation(self.doc, sketch_node);
        if !r.is_empty() {
            out.push_str(&format!("\t{r}\n"));
        }
        let t = translation(sketch_node);
        if !t.is_empty() {
            out.push_str(&format!("\t{t}\n"));
        }
        Some(out)
    }

    #[allow(clippy::too_many_arguments)]
    fn pad_pocket(
        &mut self,
        mut code: String,
        id: NodeId,
        node: &SceneNode,
        params: &PadPocket,
        pocket: bool,
        flags: Flags,
        side: &mut MeshSideBuffer,
    ) -> Result<String, CompileError> {
        let prepared = if support::is_pad_pocket_supported(self.doc, params) {
            self.profile(node, params.profile)
        } else {
            debug!(node = %node.name, "pad/pocket options unsupported");
            None
        };
        let Some((sketch_node, spline)) = prepared else {
            let mesh_flags = Flags {
                pigment: true,
                ..flags
            };
            code.push_str(&self.fallback(id, node, mesh_flags, side));
            return Ok(code);
        };

        let mut start = if pocket { -0.0001 } else { 0.0 };
        let mut end = params.length;
        if params.midplane {
            end /= 2.0;
            start = -end;
        }
        if !params.reversed {
            start = -start;
            end = -end;
        }
        if pocket {
            start = -start;
            end = -end;
        }

        code.push_str(if pocket { "\ndifference {\n" } else { "\nunion {\n" });
        if let Some(base) = params.base_feature {
            let base_code = self.compile(base, Flags::ALL, side)?;
            code.push_str(&indent(&base_code));
        }

        code.push_str(&format!(
            "\n\tprism {{\n\t\tbezier_spline\n\t\t{}, {}, {}",
            num(start),
            num(end),
            spline.point_count()
        ));
        code.push_str(&spline.to_pov().replace('\n', "\n\t\t"));
        code.push('\n');

        if flags.placement {
            let r = rotation(self.doc, sketch_node);
            if !r.is_empty() {
                code.push_str(&format!("\t\t{r}\n"));
            }
            let t = translation(sketch_node);
            if !t.is_empty() {
                code.push_str(&format!("\t\t{t}\n"));
            }
        } else {
            code.push_str("\t\trotate <-90, 0, 0>");
        }
        code.push_str("\n\t}\n");
        if flags.close {
            code.push_str("\n}\n");
        }
        Ok(code)
    }
}

/// `light_source` with color, kind specific lines and optional fading. Left
/// open for the trailing clauses.
fn light_source(light: &LightParams, specifics: &str) -> String {
    let [r, g, b] = light.color;
    let mut out = format!(
        "\nlight_source {{ <0, 0, 0>\n\tcolor rgb<{}, {}, {}>",
        num(r),
        num(g),
        num(b)
    );
    out.push_str(specifics);
    if light.fade_distance != 0.0 && light.fade_power != 0.0 {
        out.push_str(&format!(
            "\n\tfade_distance {}\n\tfade_power {}",
            num(light.fade_distance),
            num(light.fade_power)
        ));
    }
    out
}

fn area_light(area: &AreaLightParams) -> String {
    let mut out = format!(
        "\n\tarea_light\n\t<{}, 0, 0>, <0, {}, 0>\n\t{}, {}\n\tadaptive {}",
        num(area.length),
        num(area.width),
        area.length_lights,
        area.width_lights,
        area.adaptive
    );
    if area.area_illumination {
        out.push_str("\n\tarea_illumination on");
    }
    if area.jitter {
        out.push_str("\n\tjitter");
    }
    out
}

fn spot_light(spot: &SpotLightParams) -> String {
    format!(
        "\n\tspotlight\n\tpoint_at <0, -1, 0>\n\tradius {}\n\tfalloff {}\n\ttightness {}",
        num(spot.radius),
        num(spot.falloff),
        num(spot.tightness)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CameraPose;
    use crate::settings::ExportSettings;
    use scene_types::{Placement, Rotation};
    use tessellator::MockTessellator;

    fn cube(name: &str, l: f64) -> SceneNode {
        SceneNode::new(
            name,
            NodeKind::Box {
                length: l,
                width: l,
                height: l,
            },
        )
    }

    fn compile_one(doc: &SceneDocument, id: NodeId) -> (Result<String, CompileError>, MeshSideBuffer) {
        let ctx = RenderContext::new(ExportSettings::default(), CameraPose::default());
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();
        let result = SceneCompiler::new(doc, &ctx, &mut tess).compile(id, Flags::ALL, &mut side);
        (result, side)
    }

    #[test]
    fn placed_box() {
        let mut doc = SceneDocument::new();
        let mut b = cube("Box", 2.0);
        b.placement = Placement::new([1.0, 2.0, 3.0], Rotation::from_axis_angle([1.0, 0.0, 0.0], 90.0));
        let id = doc.add(b);
        let (code, side) = compile_one(&doc, id);
        assert_eq!(
            code.unwrap(),
            "\n//----- Box -----\nbox { <0,0,0>, <2, 2, 2>\n\trotate <90, 0, 0>\n\ttranslate <1, 2, 3>\n}\n"
        );
        assert!(side.is_empty());
    }

    #[test]
    fn flags_suppress_clauses() {
        let mut doc = SceneDocument::new();
        let mut b = cube("Box", 2.0);
        b.placement = Placement::from_translation([1.0, 0.0, 0.0]);
        let id = doc.add(b);
        let ctx = RenderContext::new(ExportSettings::default(), CameraPose::default());
        let mut tess = MockTessellator::new();
        let mut side = MeshSideBuffer::new();
        let code = SceneCompiler::new(&doc, &ctx, &mut tess)
            .compile(id, Flags::NONE, &mut side)
            .unwrap();
        assert_eq!(code, "\nbox { <0,0,0>, <2, 2, 2>\n");
    }

    #[test]
    fn point_light_with_fade() {
        let mut doc = SceneDocument::new();
        let id = doc.add(SceneNode::new(
            "PointLight",
            NodeKind::PointLight(LightParams {
                color: [1.0, 0.5, 0.0],
                fade_distance: 100.0,
                fade_power: 2.0,
            }),
        ));
        let (code, _) = compile_one(&doc, id);
        assert_eq!(
            code.unwrap(),
            "\n//----- PointLight -----\nlight_source { <0, 0, 0>\n\tcolor rgb<1, 0.5, 0>\n\tfade_distance 100\n\tfade_power 2\n}\n"
        );
    }

    #[test]
    fn area_and_spot_lights() {
        let mut doc = SceneDocument::new();
        let area = doc.add(SceneNode::new(
            "AreaLight",
            NodeKind::AreaLight(AreaLightParams {
                light: LightParams::default(),
                length: 100.0,
                width: 50.0,
                length_lights: 5,
                width_lights: 3,
                adaptive: 1,
                area_illumination: true,
                jitter: true,
            }),
        ));
        let (code, _) = compile_one(&doc, area);
        let code = code.unwrap();
        assert!(code.contains("\n\tarea_light\n\t<100, 0, 0>, <0, 50, 0>\n\t5, 3\n\tadaptive 1"));
        assert!(code.contains("\n\tarea_illumination on\n\tjitter"));
        assert!(!code.contains("fade_distance"));

        let spot = doc.add(SceneNode::new(
            "SpotLight",
            NodeKind::SpotLight(SpotLightParams {
                light: LightParams::default(),
                radius: 15.0,
                falloff: 20.0,
                tightness: 0.0,
            }),
        ));
        let (code, _) = compile_one(&doc, spot);
        assert!(code
            .unwrap()
            .contains("\n\tspotlight\n\tpoint_at <0, -1, 0>\n\tradius 15\n\tfalloff 20\n\ttightness 0"));
    }

    #[test]
    fn part_skips_hidden_children() {
        let mut doc = SceneDocument::new();
        let shown = doc.add(cube("Shown", 1.0));
        let mut hidden = cube("Hidden", 1.0);
        hidden.visible = false;
        let hidden = doc.add(hidden);
        let mut part = SceneNode::new("Part", NodeKind::Part);
        part.children = vec![shown, hidden];
        let part = doc.add(part);

        let code = compile_one(&doc, part).0.unwrap();
        assert!(code.starts_with("\n//----- Part -----\nunion {\n"));
        assert!(code.contains("Shown"));
        assert!(!code.contains("Hidden"));
        assert!(code.ends_with("}\n\t\n}\n"));
    }

    #[test]
    fn clone_scales_its_source() {
        let mut doc = SceneDocument::new();
        let src = doc.add(cube("Box", 1.0));
        let clone = doc.add(SceneNode::new(
            "Clone",
            NodeKind::Clone {
                sources: vec![src],
                scale: [2.0, 1.0, 1.0],
            },
        ));
        let code = compile_one(&doc, clone).0.unwrap();
        assert_eq!(
            code,
            "\n//----- Clone -----\nbox { <0,0,0>, <1, 1, 1>\n\n\tscale <2, 1, 1>\n}\n"
        );
    }

    #[test]
    fn cycles_are_reported() {
        let mut doc = SceneDocument::new();
        let a = doc.add(SceneNode::new("A", NodeKind::Part));
        let b = doc.add(SceneNode::new("B", NodeKind::Part));
        doc.get_mut(a).unwrap().children = vec![b];
        doc.get_mut(b).unwrap().children = vec![a];

        assert_eq!(
            compile_one(&doc, a).0,
            Err(CompileError::Cycle { name: "A".into() })
        );
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut doc = SceneDocument::new();
        let mut inner = doc.add(cube("Box", 1.0));
        for i in 0..=MAX_DEPTH {
            let mut part = SceneNode::new(format!("Part{i}"), NodeKind::Part);
            part.children = vec![inner];
            inner = doc.add(part);
        }
        assert!(matches!(
            compile_one(&doc, inner).0,
            Err(CompileError::DepthExceeded { .. })
        ));
    }

    #[test]
    fn shared_child_is_not_a_cycle() {
        let mut doc = SceneDocument::new();
        let shared = doc.add(cube("Box", 1.0));
        let mut fuse = SceneNode::new("Fusion", NodeKind::Boolean { op: BooleanOp::Fuse });
        fuse.children = vec![shared, shared];
        let fuse = doc.add(fuse);
        let code = compile_one(&doc, fuse).0.unwrap();
        assert_eq!(code.matches("box {").count(), 2);
    }

    #[test]
    fn unknown_array_layout_is_meshed() {
        let mut doc = SceneDocument::new();
        let base = doc.add(cube("Box", 1.0));
        let arr = doc.add(SceneNode::new(
            "Array",
            NodeKind::Array(ArrayParams {
                base,
                layout: ArrayLayout::Other {
                    array_type: "circular".into(),
                },
            }),
        ));
        let (code, side) = compile_one(&doc, arr);
        assert_eq!(code.unwrap(), "\n//----- Array -----\nobject { Array_mesh\n}\n");
        assert!(side.is_declared("Array_mesh"));
    }
}
