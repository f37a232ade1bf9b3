//! Parametric primitives to POV-Ray statements.
//!
//! Every statement is left open (no closing brace) so the compiler can append
//! material, placement and the brace itself.

use scene_types::NodeKind;

use crate::fmt::{indent, num, vec3};

/// Encode a primitive node kind. Returns `None` for kinds that are not
/// primitives.
pub fn encode(kind: &NodeKind) -> Option<String> {
    let code = match kind {
        NodeKind::Box {
            length,
            width,
            height,
        } => format!("\nbox {{ <0,0,0>, {}", vec3([*length, *width, *height])),
        NodeKind::Sphere { radius } => format!("\nsphere {{ <0, 0, 0> {}", num(*radius)),
        NodeKind::Ellipsoid {
            radius1,
            radius2,
            radius3,
        } => format!(
            "\nsphere {{ <0, 0, 0> 1\n\tscale {}",
            vec3([*radius2, *radius3, *radius1])
        ),
        NodeKind::Cone {
            radius1,
            radius2,
            height,
        } => format!(
            "\ncone {{ <0, 0, 0>, {}\n    <0, 0, {}>, {}",
            num(*radius1),
            num(*height),
            num(*radius2)
        ),
        NodeKind::Cylinder { radius, height } => format!(
            "\ncylinder {{ <0, 0, 0>, <0, 0, {}>, {}",
            num(*height),
            num(*radius)
        ),
        NodeKind::Torus { radius1, radius2 } => {
            format!("\ntorus {{ {}, {}", num(*radius1), num(*radius2))
        }
        NodeKind::Plane { length, width } => format!("\n{}", polygon(*length, *width)),
        NodeKind::ImagePlane {
            image_file,
            x_size,
            y_size,
        } => image_plane(image_file, *x_size, *y_size),
        _ => return None,
    };
    Some(code)
}

/// Closed rectangle in the XY plane with one corner at the origin.
fn polygon(length: f64, width: f64) -> String {
    let (l, w) = (num(length), num(width));
    format!("polygon {{ 5, <0, 0>, <{l}, 0>, <{l}, {w}>, <0, {w}>, <0, 0>")
}

/// A rectangle carrying the image as its pigment, centred on the origin.
fn image_plane(image_file: &str, x_size: f64, y_size: f64) -> String {
    let pigment = format!(
        "\npigment {{\n\timage_map {{\n\t\t{} \"{}\"\n\t\tmap_type 0\n\t}}\n\tscale <{}, {}, 1>\n}}\n",
        image_type(image_file),
        image_file,
        num(x_size),
        num(y_size)
    );
    format!(
        "\n{}{}\ttranslate -<{}, {}, 0>\n",
        polygon(x_size, y_size),
        indent(&pigment),
        num(x_size / 2.0),
        num(y_size / 2.0)
    )
}

/// POV-Ray image type keyword from the file extension (`png`, `jpeg`, ...).
fn image_type(image_file: &str) -> String {
    let ext = image_file
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" => "jpeg".to_string(),
        "tif" => "tiff".to_string(),
        _ => ext,
    }
}
