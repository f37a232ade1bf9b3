use serde::{Deserialize, Serialize};

/// A 2D sketch: solved geometry in the sketch plane, positioned in 3D by the
/// owning node's placement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sketch {
    pub geometry: Vec<SketchGeometry>,
}

impl Sketch {
    pub fn new(geometry: Vec<SketchGeometry>) -> Self {
        Self { geometry }
    }

    /// Geometry that takes part in the profile (construction lines excluded).
    pub fn profile_segments(&self) -> impl Iterator<Item = &Segment> {
        self.geometry
            .iter()
            .filter(|g| !g.construction)
            .map(|g| &g.segment)
    }
}

/// A sketch entity plus its construction flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchGeometry {
    pub segment: Segment,
    #[serde(default)]
    pub construction: bool,
}

impl SketchGeometry {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            construction: false,
        }
    }

    pub fn construction(segment: Segment) -> Self {
        Self {
            segment,
            construction: true,
        }
    }
}

/// Travel direction of a circular arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcOrientation {
    /// Sketch normal along +Z.
    CounterClockwise,
    /// Sketch normal along -Z.
    Clockwise,
}

impl ArcOrientation {
    pub fn flipped(self) -> Self {
        match self {
            ArcOrientation::CounterClockwise => ArcOrientation::Clockwise,
            ArcOrientation::Clockwise => ArcOrientation::CounterClockwise,
        }
    }
}

/// A 2D curve segment in sketch coordinates (millimetres, radians).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Segment {
    Point {
        at: [f64; 2],
    },
    Line {
        start: [f64; 2],
        end: [f64; 2],
    },
    Circle {
        center: [f64; 2],
        radius: f64,
    },
    /// Arc from `start_angle` to `end_angle` (angles measured counter-clockwise
    /// from +X), travelled in `orientation`.
    Arc {
        center: [f64; 2],
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        orientation: ArcOrientation,
    },
    /// Geometry the exporter has no analytic rule for (B-spline, ellipse, ...).
    Unsupported {
        kind: String,
    },
}

impl Segment {
    pub fn line(start: [f64; 2], end: [f64; 2]) -> Self {
        Segment::Line { start, end }
    }

    pub fn circle(center: [f64; 2], radius: f64) -> Self {
        Segment::Circle { center, radius }
    }

    /// Counter-clockwise arc.
    pub fn arc(center: [f64; 2], radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Segment::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            orientation: ArcOrientation::CounterClockwise,
        }
    }

    /// Start point, for segments that have one.
    pub fn start_point(&self) -> Option<[f64; 2]> {
        match self {
            Segment::Line { start, .. } => Some(*start),
            Segment::Arc {
                center,
                radius,
                start_angle,
                ..
            } => Some(polar(*center, *radius, *start_angle)),
            _ => None,
        }
    }

    /// End point, for segments that have one.
    pub fn end_point(&self) -> Option<[f64; 2]> {
        match self {
            Segment::Line { end, .. } => Some(*end),
            Segment::Arc {
                center,
                radius,
                end_angle,
                ..
            } => Some(polar(*center, *radius, *end_angle)),
            _ => None,
        }
    }

    /// The same segment travelled in the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Segment::Line { start, end } => Segment::Line {
                start: *end,
                end: *start,
            },
            Segment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                orientation,
            } => Segment::Arc {
                center: *center,
                radius: *radius,
                start_angle: *end_angle,
                end_angle: *start_angle,
                orientation: orientation.flipped(),
            },
            other => other.clone(),
        }
    }

    /// Human-readable geometry type, as reported by the host.
    pub fn type_name(&self) -> &str {
        match self {
            Segment::Point { .. } => "Point",
            Segment::Line { .. } => "LineSegment",
            Segment::Circle { .. } => "Circle",
            Segment::Arc { .. } => "ArcOfCircle",
            Segment::Unsupported { kind } => kind,
        }
    }
}

fn polar(center: [f64; 2], radius: f64, angle: f64) -> [f64; 2] {
    [
        center[0] + radius * angle.cos(),
        center[1] + radius * angle.sin(),
    ]
}
