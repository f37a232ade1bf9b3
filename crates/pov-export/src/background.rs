//! Scene background: an HDR sky sphere or the viewport's background colors.

use tracing::warn;

use crate::camera::{camera_angles, ortho_extent};
use crate::context::{CameraKind, RenderContext};
use crate::fmt::{num, rgb, unpack_color, vec3};
use crate::settings::{BackgroundStyle, EnvironmentOption, ViewPreferences};

/// Distance of the orthographic backdrop behind the camera.
const BACKDROP_DISTANCE: f64 = 100_000.0;

fn color(packed: u32) -> String {
    format!("color rgb{}", rgb(unpack_color(packed)))
}

/// Background statements for the configured environment option.
pub fn environment(ctx: &RenderContext) -> String {
    let env = &ctx.settings.environment;
    match env.option {
        EnvironmentOption::Hdri => {
            if env.hdr_path.is_empty() {
                warn!("HDRI environment selected without an image, no background written");
                return String::new();
            }
            let mut out = String::from("// HDRI Environment ----------------------------------\n");
            out.push_str("sky_sphere {\n\tpigment {\n");
            out.push_str(&format!("\t\timage_map {{ hdr \"{}\"\n", env.hdr_path));
            out.push_str("\t\t\tgamma 1.1\n");
            out.push_str("\t\t\tmap_type 1 interpolate 2\n");
            out.push_str("\t\t}\n\t}\n");
            out.push_str(&format!("\trotate {}\n", vec3(env.rotation)));
            out.push_str(&format!("\ttranslate {}\n", vec3(env.translation)));
            out.push_str("}\n");
            out
        }
        EnvironmentOption::FreeCadBackground => {
            let mut out = String::new();
            if ctx.camera.kind == CameraKind::Orthographic {
                out.push_str(&backdrop(ctx));
            }
            out.push_str(&sky_sphere(ctx));
            out
        }
    }
}

/// Gradient stops from bottom to top, with the optional middle color.
fn color_map(view: &ViewPreferences, stops: [&str; 4], indent: &str) -> String {
    let mut out = format!("{indent}color_map {{\n");
    let mut stop = |at: &str, packed: u32| {
        out.push_str(&format!("{indent}\t[ {at}  {} ]\n", color(packed)));
    };
    stop(stops[0], view.background_color3);
    stop(stops[1], view.background_color3);
    if view.use_background_color_mid {
        stop("0.50", view.background_color4);
    }
    stop(stops[2], view.background_color2);
    stop(stops[3], view.background_color2);
    out.push_str(&format!("{indent}}}\n"));
    out
}

/// A flat polygon far behind an orthographic camera; a sky sphere alone
/// would show a single color there.
fn backdrop(ctx: &RenderContext) -> String {
    let view = &ctx.settings.view;
    let (right, up) = ortho_extent(ctx);
    let (r, u) = (right / 2.0, up / 2.0);

    let mut out = String::from("\npolygon {\n");
    out.push_str(&format!(
        "\t5, <{}, {}>, <{}, {}>, <{}, {}>, <{}, {}>, <{}, {}>\n",
        num(-r),
        num(-u),
        num(-r),
        num(u),
        num(r),
        num(u),
        num(r),
        num(-u),
        num(-r),
        num(-u)
    ));
    out.push_str("\tpigment {");
    match view.background_style {
        BackgroundStyle::Simple => {
            out.push_str(&format!(" {} }}\n", color(view.background_color)));
        }
        BackgroundStyle::Gradient => {
            out.push_str("\n\t\tgradient y\n");
            out.push_str(&color_map(view, ["0.00", "0.05", "0.95", "1.00"], "\t\t"));
            out.push_str(&format!("\t\tscale <1,{},1>\n", num(up)));
            out.push_str(&format!("\t\ttranslate <0,{},0>\n", num(-u)));
            out.push_str("\t}\n");
        }
    }
    out.push_str("\tfinish { ambient 1 diffuse 0 }\n");

    let [rx, ry, rz] = camera_angles(ctx);
    out.push_str(&format!("\trotate {}\n", vec3([rx + 90.0, ry, rz])));
    out.push_str(&format!("\ttranslate {}\n", vec3(ctx.camera.position)));
    out.push_str(&format!(
        "\ttranslate {}\n",
        vec3(ctx.camera.view_direction.map(|c| c * BACKDROP_DISTANCE))
    ));
    out.push_str("}\n");
    out
}

fn sky_sphere(ctx: &RenderContext) -> String {
    let view = &ctx.settings.view;
    let mut out = String::from("sky_sphere {\n\tpigment {\n");
    match view.background_style {
        BackgroundStyle::Simple => {
            out.push_str(&format!("\t\t{}\n", color(view.background_color)));
        }
        BackgroundStyle::Gradient => {
            out.push_str("\t\tgradient z\n");
            out.push_str(&color_map(view, ["0.00", "0.30", "0.70", "1.00"], "\t\t"));
            out.push_str("\t\tscale 2\n");
            out.push_str("\t\ttranslate -1\n");
            let [rx, ry, rz] = camera_angles(ctx);
            out.push_str(&format!(
                "\t\trotate<{}, {}, {}>\n",
                num(rx),
                num(ry),
                num(rz)
            ));
        }
    }
    out.push_str("\t}\n}\n");
    out
}
