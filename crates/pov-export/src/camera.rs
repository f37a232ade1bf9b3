//! Camera and headlight statements derived from the viewport camera.

use crate::context::{CameraKind, RenderContext};
use crate::fmt::{num, vec3};
use crate::placement::euler_degrees;

/// Distance from the eye to the image plane of the host's perspective camera,
/// in units of the image height.
const FOCAL_DISTANCE: f64 = 1.2071067812;

/// Horizontal and vertical extent of an orthographic view: the camera height
/// spans the shorter image side.
pub(crate) fn ortho_extent(ctx: &RenderContext) -> (f64, f64) {
    let aspect = ctx.settings.aspect_ratio();
    let height = ctx.camera.height;
    if aspect >= 1.0 {
        (height * aspect, height)
    } else {
        (height, height / aspect)
    }
}

/// `CamRotation` angles: the host camera looks along -Z, POV-Ray's along +Y.
pub(crate) fn camera_angles(ctx: &RenderContext) -> [f64; 3] {
    let [x, y, z] = euler_degrees(&ctx.camera.orientation);
    [x - 90.0, y, z]
}

/// `#declare`s for the camera vectors followed by the `camera` block. The block
/// is commented out when the user include defines its own camera.
pub fn camera_block(ctx: &RenderContext) -> String {
    let aspect = ctx.settings.aspect_ratio();

    let (kind_line, up, right, angle_line) = match ctx.camera.kind {
        CameraKind::Perspective => {
            let angle = if aspect <= 1.0 {
                45.0
            } else {
                (aspect / 2.0).atan2(FOCAL_DISTANCE).to_degrees() * 2.0
            };
            (
                "",
                "<0, 0, 1>".to_string(),
                format!("<{aspect:.2}, 0, 0>"),
                format!("\tangle {angle:.2}\n"),
            )
        }
        CameraKind::Orthographic => {
            let (right, up) = ortho_extent(ctx);
            (
                "\torthographic\n",
                format!("< 0, 0, {up:.2}>"),
                format!("<{right:.2}, 0, 0>"),
                String::new(),
            )
        }
    };

    let [rx, ry, rz] = camera_angles(ctx);
    let mut out = format!("#declare CamUp = {up};\n");
    out.push_str(&format!("#declare CamRight = {right};\n"));
    out.push_str(&format!(
        "#declare CamRotation = <{}, {}, {}>;\n",
        num(rx),
        num(ry),
        num(rz)
    ));
    out.push_str(&format!(
        "#declare CamPosition = {};\n",
        vec3(ctx.camera.position)
    ));

    let user_camera = ctx.user_inc.mentions("camera");
    if user_camera {
        out.push_str("/*");
    }
    out.push_str("camera {\n");
    out.push_str(kind_line);
    out.push_str("\tlocation <0, 0, 0>\n");
    out.push_str("\tdirection <0, 1, 0>\n");
    out.push_str("\tup CamUp\n");
    out.push_str("\tright CamRight\n");
    out.push_str("\trotate CamRotation\n");
    out.push_str("\ttranslate CamPosition\n");
    out.push_str(&angle_line);
    out.push_str("}\n");
    if user_camera {
        out.push_str("*/\n");
    }
    out
}

/// A grey light at the camera position, like the viewport's headlight.
pub fn freecad_light() -> &'static str {
    "light_source { CamPosition color rgb <0.5, 0.5, 0.5> }\n"
}
