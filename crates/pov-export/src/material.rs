//! Pigment, material and photon blocks.
//!
//! Lookups go through the two include files. The texture library may supply
//! `<Label>_material_hollow`, `<Label>_material`, `<Label>_texture` or
//! `<Label>_pigment`; the user include may override the material and enable
//! photons. Without any declaration the node's own view colors are used.

use scene_types::{SceneNode, ViewStyle, BLACK, DEFAULT_AMBIENT};

use crate::context::RenderContext;
use crate::fmt::{num, rgb, unpack_color};
use crate::names::sanitize;

/// Material clause for `node`, or an empty string when the document-wide
/// default pigment already covers it.
pub fn material(ctx: &RenderContext, node: &SceneNode) -> String {
    let label = sanitize(&node.label);
    let tex = &ctx.texture_inc;

    let mut material = if tex.declares(&format!("{label}_material_hollow")) {
        format!("\nhollow\nmaterial {{{label}_material_hollow }}\n")
    } else if tex.declares(&format!("{label}_material")) {
        format!("\nmaterial {{{label}_material }}\n")
    } else if tex.declares(&format!("{label}_texture")) {
        format!("\ntexture {{{label}_texture }}\n")
    } else if tex.declares(&format!("{label}_pigment")) {
        format!("\npigment {{{label}_pigment }}\n")
    } else {
        let default_color = unpack_color(ctx.settings.view.default_shape_color);
        format!("{}{}", pigment(&node.view, default_color), finish(&node.view))
    };

    if ctx.user_inc.declares(&format!("{label}_material")) {
        material = format!("\nmaterial {{{label}_material }}\n");
    }
    material
}

/// Inline pigment from the shape color, only when it differs from the default
/// or the shape is transparent.
fn pigment(view: &ViewStyle, default_color: [f32; 3]) -> String {
    let color = rgb(view.shape_color);
    let transmit = if view.transparency != 0 {
        format!(" transmit {}", num(f64::from(view.transparency) / 100.0))
    } else {
        String::new()
    };
    if transmit.is_empty() && color == rgb(default_color) {
        return String::new();
    }
    format!("\tpigment {{ color rgb {color}{transmit} }}\n")
}

/// Finish block from ambient, emissive and specular colors, only when one of
/// them differs from the host's defaults.
fn finish(view: &ViewStyle) -> String {
    let m = &view.shape_material;
    let rgb3 = |c: [f32; 4]| format!("{:.3}, {:.3}, {:.3}", c[0], c[1], c[2]);

    let ambient = if m.ambient_color != DEFAULT_AMBIENT {
        format!("ambient rgb<{}>", rgb3(m.ambient_color))
    } else {
        String::new()
    };
    let emission = if m.emissive_color != BLACK {
        format!("emission rgb<{}>", rgb3(m.emissive_color))
    } else {
        String::new()
    };
    let phong = if m.specular_color != BLACK {
        let s = m.specular_color;
        let avg = (f64::from(s[0]) + f64::from(s[1]) + f64::from(s[2])) / 3.0;
        format!("phong {:.2} phong_size {} ", avg, num(m.shininess * 50.0))
    } else {
        String::new()
    };

    if ambient.is_empty() && emission.is_empty() && phong.is_empty() {
        return String::new();
    }
    format!("finish {{\n\t{ambient}\n\t{emission}\n\t{phong}\n}}\n")
}

/// Photon block, present only when the user include declares
/// `<Label>_photons`. Each optional clause needs its own declaration; lights
/// are never photon targets.
pub fn photons(ctx: &RenderContext, node: &SceneNode) -> String {
    let label = sanitize(&node.label);
    let user = &ctx.user_inc;
    if !user.declares(&format!("{label}_photons")) {
        return String::new();
    }

    let mut block = String::from("\nphotons {");
    if !node.kind.is_light() {
        block.push_str("\n\ttarget");
    }
    for clause in ["reflection", "refraction", "collect"] {
        let ident = format!("{label}_photons_{clause}");
        if user.declares(&ident) {
            block.push_str(&format!("\n\t{clause} {ident}"));
        }
    }
    block.push_str("\n}\n");
    block
}
