//! Helper functions: error type, sketch profile builders, text scanning.

use pov_export::CompileError;
use scene_types::{Segment, Sketch, SketchGeometry};

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("node not found: {name}")]
    NodeNotFound { name: String },

    #[error("duplicate name: {name}")]
    DuplicateName { name: String },

    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("project file error: {0}")]
    Project(String),

    #[error("assertion failed: {detail}")]
    AssertionFailed { detail: String },

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Profile Builders ────────────────────────────────────────────────────────

/// Closed polyline through `points`, back to the first one.
pub fn polygon_profile(points: &[[f64; 2]]) -> Sketch {
    let n = points.len();
    Sketch::new(
        (0..n)
            .map(|i| SketchGeometry::new(Segment::line(points[i], points[(i + 1) % n])))
            .collect(),
    )
}

/// Axis-aligned rectangle with its lower-left corner at `(x, y)`.
pub fn rect_profile(x: f64, y: f64, w: f64, h: f64) -> Sketch {
    polygon_profile(&[[x, y], [x + w, y], [x + w, y + h], [x, y + h]])
}

/// A single full circle.
pub fn circle_profile(cx: f64, cy: f64, r: f64) -> Sketch {
    Sketch::new(vec![SketchGeometry::new(Segment::circle([cx, cy], r))])
}

/// Rectangle with a rounded right side: three lines and a half-circle arc.
pub fn slot_profile(w: f64, h: f64) -> Sketch {
    let r = h / 2.0;
    let mut sketch = polygon_profile(&[[w, h], [0.0, h], [0.0, 0.0], [w, 0.0]]);
    sketch.geometry.pop();
    sketch.geometry.push(SketchGeometry::new(Segment::arc(
        [w, r],
        r,
        -std::f64::consts::FRAC_PI_2,
        std::f64::consts::FRAC_PI_2,
    )));
    sketch
}

/// `base` plus a curve kind no analytic rule handles.
pub fn with_unsupported_curve(mut base: Sketch, kind: &str) -> Sketch {
    base.geometry
        .push(SketchGeometry::new(Segment::Unsupported { kind: kind.into() }));
    base
}

// ── Text Scanning ───────────────────────────────────────────────────────────

/// Non-overlapping occurrences of `needle` in `text`.
pub fn count_occurrences(text: &str, needle: &str) -> usize {
    text.matches(needle).count()
}

/// The code emitted for the node labelled `label`: from its
/// `//----- label -----` marker up to the next marker at the same depth or the
/// end of the text.
pub fn node_section<'a>(text: &'a str, label: &str) -> Option<&'a str> {
    let marker = format!("//----- {label} -----");
    let start = text.find(&marker)?;
    let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
    let indent = &text[line_start..start];
    let rest = &text[start + marker.len()..];
    let next = format!("\n{indent}//----- ");
    let end = rest.find(&next).map_or(text.len(), |i| start + marker.len() + i);
    Some(&text[start..end])
}

/// Identifiers of every `object { <ident>` reference to a declared mesh.
pub fn mesh_references(text: &str) -> Vec<&str> {
    text.match_indices("object { ")
        .filter_map(|(i, m)| {
            let rest = &text[i + m.len()..];
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let ident = &rest[..end];
            ident.ends_with("_mesh").then_some(ident)
        })
        .collect()
}
