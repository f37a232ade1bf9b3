//! Sketch profiles to closed cubic bezier splines for `prism { bezier_spline }`.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use scene_types::{ArcOrientation, Segment, Sketch};
use tracing::debug;

use crate::error::ProfileError;
use crate::fmt::{round3, vec2};

/// Slack when deciding how many quarter turns an arc spans.
const SPAN_EPSILON: f64 = 1e-9;

/// Which sketch entity a quadruple was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadKind {
    Line,
    Circle,
    Arc,
}

impl QuadKind {
    fn comment(self) -> &'static str {
        match self {
            QuadKind::Line => "line",
            QuadKind::Circle => "circle",
            QuadKind::Arc => "arc",
        }
    }
}

/// One cubic segment: start, two control points, end.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierQuad {
    pub points: [[f64; 2]; 4],
    pub kind: QuadKind,
}

/// An ordered set of closed loops, ready to be written as a POV-Ray
/// `bezier_spline`.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierSpline {
    quads: Vec<BezierQuad>,
}

impl BezierSpline {
    pub fn quads(&self) -> &[BezierQuad] {
        &self.quads
    }

    /// Number of points the prism header must announce.
    pub fn point_count(&self) -> usize {
        self.quads.len() * 4
    }

    /// Point list, one quadruple per line, each line preceded by a newline.
    pub fn to_pov(&self) -> String {
        let mut out = String::from("\n");
        for quad in &self.quads {
            let pts: Vec<String> = quad.points.iter().copied().map(vec2).collect();
            out.push_str(&pts.join(", "));
            out.push_str("//");
            out.push_str(quad.kind.comment());
            out.push('\n');
        }
        out
    }
}

/// Compile a sketch into a bezier spline.
///
/// Construction geometry and bare points are ignored. The remaining segments
/// are chained head to tail into closed loops; a sketch may hold several loops.
pub fn compile_profile(sketch: &Sketch) -> Result<BezierSpline, ProfileError> {
    let mut pending = Vec::new();
    for segment in sketch.profile_segments() {
        match segment {
            Segment::Point { .. } => {}
            Segment::Unsupported { kind } => {
                return Err(ProfileError::UnsupportedGeometry { kind: kind.clone() })
            }
            other => pending.push(other.clone()),
        }
    }
    if pending.is_empty() {
        return Err(ProfileError::Empty);
    }

    let ordered = order_loops(pending)?;
    let mut quads = Vec::new();
    for segment in &ordered {
        emit(segment, &mut quads);
    }
    debug!(segments = ordered.len(), points = quads.len() * 4, "profile compiled");
    Ok(BezierSpline { quads })
}

/// Equal after rounding each axis to three decimals.
fn same_point(a: [f64; 2], b: [f64; 2]) -> bool {
    round3(a[0]) == round3(b[0]) && round3(a[1]) == round3(b[1])
}

fn order_loops(mut pending: Vec<Segment>) -> Result<Vec<Segment>, ProfileError> {
    let mut ordered = Vec::with_capacity(pending.len());
    while !pending.is_empty() {
        let first = pending.remove(0);
        let (Some(loop_start), Some(mut end)) = (first.start_point(), first.end_point()) else {
            // Full circles are loops on their own.
            ordered.push(first);
            continue;
        };
        ordered.push(first);

        while !same_point(loop_start, end) {
            let next = pending.iter().position(|s| {
                s.start_point().is_some_and(|p| same_point(p, end))
                    || s.end_point().is_some_and(|p| same_point(p, end))
            });
            let Some(idx) = next else {
                return Err(ProfileError::OpenLoop {
                    x: round3(end[0]),
                    y: round3(end[1]),
                });
            };
            let mut segment = pending.remove(idx);
            if segment.end_point().is_some_and(|p| same_point(p, end)) {
                segment = segment.reversed();
            }
            // Both ends exist: the position() above only matches open segments.
            end = segment.end_point().unwrap_or(end);
            ordered.push(segment);
        }
    }
    Ok(ordered)
}

fn emit(segment: &Segment, quads: &mut Vec<BezierQuad>) {
    match segment {
        Segment::Line { start, end } => quads.push(BezierQuad {
            points: [r(*start), r(*start), r(*end), r(*end)],
            kind: QuadKind::Line,
        }),
        Segment::Circle { center, radius } => emit_circle(*center, *radius, quads),
        Segment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            orientation,
        } => emit_arc(*center, *radius, *start_angle, *end_angle, *orientation, quads),
        Segment::Point { .. } | Segment::Unsupported { .. } => {}
    }
}

fn r(p: [f64; 2]) -> [f64; 2] {
    [round3(p[0]), round3(p[1])]
}

/// Four quarter arcs starting at the top, running clockwise.
fn emit_circle(center: [f64; 2], radius: f64, quads: &mut Vec<BezierQuad>) {
    let [cx, cy] = r(center);
    let d = round3((4.0 / 3.0) * (PI / 8.0).tan() * radius);

    let top = [cx, cy + radius];
    let right = [cx + radius, cy];
    let bottom = [cx, cy - radius];
    let left = [cx - radius, cy];

    let arcs = [
        [top, [cx + d, cy + radius], [cx + radius, cy + d], right],
        [right, [cx + radius, cy - d], [cx + d, cy - radius], bottom],
        [bottom, [cx - d, cy - radius], [cx - radius, cy - d], left],
        [left, [cx - radius, cy + d], [cx - d, cy + radius], top],
    ];
    for pts in arcs {
        quads.push(BezierQuad {
            points: pts.map(r),
            kind: QuadKind::Circle,
        });
    }
}

/// Split into sub-arcs of at most a quarter turn, one cubic each.
fn emit_arc(
    center: [f64; 2],
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    orientation: ArcOrientation,
    quads: &mut Vec<BezierQuad>,
) {
    let sign = match orientation {
        ArcOrientation::CounterClockwise => 1.0,
        ArcOrientation::Clockwise => -1.0,
    };
    let mut span = (sign * (end_angle - start_angle)).rem_euclid(TAU);
    if span < SPAN_EPSILON {
        span = TAU;
    }
    let count = ((span / FRAC_PI_2) - SPAN_EPSILON).ceil().max(1.0) as usize;
    let step = span / count as f64;
    let per_circle = TAU / step;
    let control = (4.0 / 3.0) * (PI / (2.0 * per_circle)).tan() * radius;

    for i in 0..count {
        let a0 = start_angle + sign * i as f64 * step;
        let a1 = start_angle + sign * (i + 1) as f64 * step;

        let start = r([
            center[0] + radius * a0.cos(),
            center[1] + radius * a0.sin(),
        ]);
        let end = r([
            center[0] + radius * a1.cos(),
            center[1] + radius * a1.sin(),
        ]);
        // Tangents in travel direction at both ends.
        let start_ctl = [
            start[0] - sign * a0.sin() * control,
            start[1] + sign * a0.cos() * control,
        ];
        let end_ctl = [
            end[0] + sign * a1.sin() * control,
            end[1] - sign * a1.cos() * control,
        ];

        quads.push(BezierQuad {
            points: [start, r(start_ctl), r(end_ctl), end],
            kind: QuadKind::Arc,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scene_types::SketchGeometry;

    fn sketch(segments: Vec<Segment>) -> Sketch {
        Sketch::new(segments.into_iter().map(SketchGeometry::new).collect())
    }

    fn square() -> Vec<Segment> {
        vec![
            Segment::line([0.0, 0.0], [10.0, 0.0]),
            Segment::line([10.0, 0.0], [10.0, 10.0]),
            Segment::line([10.0, 10.0], [0.0, 10.0]),
            Segment::line([0.0, 10.0], [0.0, 0.0]),
        ]
    }

    #[test]
    fn lines_give_four_points_each() {
        let spline = compile_profile(&sketch(square())).unwrap();
        assert_eq!(spline.point_count(), 16);
        assert_eq!(spline.quads()[0].points, [[0.0, 0.0], [0.0, 0.0], [10.0, 0.0], [10.0, 0.0]]);
    }

    #[test]
    fn reversed_segments_are_chained() {
        let mut segs = square();
        segs[2] = segs[2].reversed();
        let spline = compile_profile(&sketch(segs)).unwrap();
        assert_eq!(spline.quads()[2].points[0], [10.0, 10.0]);
        assert_eq!(spline.quads()[2].points[3], [0.0, 10.0]);
    }

    #[test]
    fn full_circle_gives_sixteen_points() {
        let spline = compile_profile(&sketch(vec![Segment::circle([0.0, 0.0], 5.0)])).unwrap();
        assert_eq!(spline.point_count(), 16);
        assert_eq!(spline.quads()[0].points[0], [0.0, 5.0]);
        assert_eq!(spline.quads()[0].points[3], [5.0, 0.0]);
        assert_relative_eq!(spline.quads()[0].points[1][0], 2.761, epsilon = 1e-9);
    }

    #[test]
    fn half_circle_arc_splits_in_two() {
        let segs = vec![
            Segment::arc([0.0, 0.0], 1.0, 0.0, PI),
            Segment::line([-1.0, 0.0], [1.0, 0.0]),
        ];
        let spline = compile_profile(&sketch(segs)).unwrap();
        let arcs: Vec<_> = spline.quads().iter().filter(|q| q.kind == QuadKind::Arc).collect();
        assert_eq!(arcs.len(), 2);
        assert_eq!(arcs[0].points[0], [1.0, 0.0]);
        assert_eq!(arcs[0].points[3], [0.0, 1.0]);
        // Tangent at the start of a counter-clockwise arc points up.
        assert_relative_eq!(arcs[0].points[1][0], 1.0);
        assert!(arcs[0].points[1][1] > 0.0);
    }

    #[test]
    fn clockwise_arc_travels_backwards() {
        let arc = Segment::Arc {
            center: [0.0, 0.0],
            radius: 2.0,
            start_angle: FRAC_PI_2,
            end_angle: 0.0,
            orientation: ArcOrientation::Clockwise,
        };
        let segs = vec![
            arc,
            Segment::line([2.0, 0.0], [0.0, 0.0]),
            Segment::line([0.0, 0.0], [0.0, 2.0]),
        ];
        let spline = compile_profile(&sketch(segs)).unwrap();
        let q = &spline.quads()[0];
        assert_eq!(q.points[0], [0.0, 2.0]);
        assert_eq!(q.points[3], [2.0, 0.0]);
        // Leaving the top clockwise means heading towards +X.
        assert!(q.points[1][0] > 0.0);
        assert_relative_eq!(q.points[1][1], 2.0);
    }

    #[test]
    fn quarter_arc_is_one_segment() {
        let segs = vec![
            Segment::arc([0.0, 0.0], 1.0, 0.0, FRAC_PI_2),
            Segment::line([0.0, 1.0], [0.0, 0.0]),
            Segment::line([0.0, 0.0], [1.0, 0.0]),
        ];
        let spline = compile_profile(&sketch(segs)).unwrap();
        assert_eq!(spline.point_count(), 12);
    }

    #[test]
    fn construction_and_points_are_ignored() {
        let mut geometry: Vec<SketchGeometry> = square().into_iter().map(SketchGeometry::new).collect();
        geometry.push(SketchGeometry::construction(Segment::line([0.0, 0.0], [10.0, 10.0])));
        geometry.push(SketchGeometry::new(Segment::Point { at: [3.0, 3.0] }));
        let spline = compile_profile(&Sketch::new(geometry)).unwrap();
        assert_eq!(spline.point_count(), 16);
    }

    #[test]
    fn open_profile_is_rejected() {
        let segs = vec![
            Segment::line([0.0, 0.0], [10.0, 0.0]),
            Segment::line([10.0, 0.0], [10.0, 10.0]),
        ];
        assert!(matches!(
            compile_profile(&sketch(segs)),
            Err(ProfileError::OpenLoop { .. })
        ));
    }

    #[test]
    fn unsupported_and_empty_profiles() {
        let segs = vec![Segment::Unsupported {
            kind: "BSplineCurve".into(),
        }];
        assert_eq!(
            compile_profile(&sketch(segs)),
            Err(ProfileError::UnsupportedGeometry {
                kind: "BSplineCurve".into()
            })
        );
        assert_eq!(compile_profile(&Sketch::default()), Err(ProfileError::Empty));
    }

    #[test]
    fn outer_loop_and_hole() {
        let mut segs = square();
        segs.push(Segment::circle([5.0, 5.0], 2.0));
        let spline = compile_profile(&sketch(segs)).unwrap();
        assert_eq!(spline.point_count(), 32);
    }

    #[test]
    fn pov_text_has_one_quad_per_line() {
        let spline = compile_profile(&sketch(square())).unwrap();
        let text = spline.to_pov();
        assert!(text.starts_with("\n<0, 0>, <0, 0>, <10, 0>, <10, 0>//line\n"));
        assert_eq!(text.matches("//line\n").count(), 4);
    }
}
