//! Number and vector formatting for POV-Ray text.

/// Decimal places kept by [`num`]. Hides floating point noise such as
/// `89.99999999999999` coming out of angle conversions.
const PRECISION: f64 = 1e9;

/// Round to nine decimals.
pub fn round9(value: f64) -> f64 {
    if value.abs() >= 1e9 {
        return value;
    }
    let rounded = (value * PRECISION).round() / PRECISION;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to three decimals, the resolution of sketch coordinates.
pub fn round3(value: f64) -> f64 {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Format a number in its shortest form: `10`, `2.5`, `-0.0001`.
///
/// Non-finite values are written as `0` so the scene still parses.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    format!("{}", round9(value))
}

/// `<x, y>`
pub fn vec2(v: [f64; 2]) -> String {
    format!("<{}, {}>", num(v[0]), num(v[1]))
}

/// `<x, y, z>`
pub fn vec3(v: [f64; 3]) -> String {
    format!("<{}, {}, {}>", num(v[0]), num(v[1]), num(v[2]))
}

/// Color components with three fixed decimals: `<0.800, 0.800, 0.800>`.
pub fn rgb(c: [f32; 3]) -> String {
    format!("<{:.3}, {:.3}, {:.3}>", c[0], c[1], c[2])
}

/// Unpack a host color stored as `0xRRGGBBAA` into `0.0..=1.0` components.
pub fn unpack_color(packed: u32) -> [f32; 3] {
    let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
    [channel(24), channel(16), channel(8)]
}

/// Indent generated code one level: a tab after every newline.
pub fn indent(code: &str) -> String {
    code.replace('\n', "\n\t")
}

/// True when any component is non-zero.
pub fn any_nonzero(v: &[f64]) -> bool {
    v.iter().any(|c| *c != 0.0)
}
