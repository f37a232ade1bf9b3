use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::mesh::TriMesh;
use crate::placement::Placement;
use crate::sketch::Sketch;
use crate::view::ViewStyle;

new_key_type! {
    /// Stable handle of a node inside a [`crate::SceneDocument`].
    pub struct NodeId;
}

/// A node of the scene graph. Nodes never own their children; the document does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Unique internal name (`Box001`).
    pub name: String,
    /// User-visible name, used to derive POV-Ray identifiers.
    pub label: String,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Ordered child references (boolean operands, container members).
    #[serde(default)]
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    #[serde(default)]
    pub view: ViewStyle,
}

fn default_visible() -> bool {
    true
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            placement: Placement::default(),
            visible: true,
            children: Vec::new(),
            kind,
            view: ViewStyle::default(),
        }
    }
}

/// Boolean combination flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Cut,
    Fuse,
    MultiFuse,
    Compound,
    Common,
    MultiCommon,
}

/// Reference geometry that may live inside a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatumKind {
    Origin,
    OriginLine,
    OriginPlane,
    Point,
    Line,
    Plane,
}

/// Direction mode of a Part extrusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirMode {
    Normal,
    Custom,
    Edge,
}

/// Parameters of a Part extrusion of a 2D profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtrusionParams {
    pub base: NodeId,
    pub length_fwd: f64,
    #[serde(default)]
    pub length_rev: f64,
    #[serde(default)]
    pub symmetric: bool,
    #[serde(default)]
    pub reversed: bool,
    pub dir_mode: DirMode,
    /// Degrees.
    #[serde(default)]
    pub taper_angle: f64,
    /// Degrees.
    #[serde(default)]
    pub taper_angle_rev: f64,
}

/// How the length of a pad or pocket is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthType {
    Length,
    ThroughAll,
    UpToFirst,
    UpToFace,
    TwoLengths,
}

/// Parameters shared by PartDesign pads and pockets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PadPocket {
    pub profile: NodeId,
    pub length: f64,
    #[serde(default)]
    pub midplane: bool,
    #[serde(default)]
    pub reversed: bool,
    pub length_type: LengthType,
    /// Previous solid feature in the body this feature is applied to.
    #[serde(default)]
    pub base_feature: Option<NodeId>,
}

/// Layout of a Draft array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArrayLayout {
    Polar {
        center: [f64; 3],
        axis: [f64; 3],
        interval_axis: [f64; 3],
        count: u32,
        /// Degrees.
        angle: f64,
    },
    Ortho {
        interval_x: [f64; 3],
        interval_y: [f64; 3],
        interval_z: [f64; 3],
        number_x: u32,
        number_y: u32,
        number_z: u32,
    },
    /// Any other array type the host supports (circular, path, ...).
    Other { array_type: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrayParams {
    pub base: NodeId,
    pub layout: ArrayLayout,
}

/// Settings shared by every light kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightParams {
    pub color: [f64; 3],
    /// Millimetres; zero disables fading.
    #[serde(default)]
    pub fade_distance: f64,
    #[serde(default)]
    pub fade_power: f64,
}

impl Default for LightParams {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            fade_distance: 0.0,
            fade_power: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaLightParams {
    pub light: LightParams,
    pub length: f64,
    pub width: f64,
    pub length_lights: u32,
    pub width_lights: u32,
    pub adaptive: u32,
    #[serde(default)]
    pub area_illumination: bool,
    #[serde(default)]
    pub jitter: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotLightParams {
    pub light: LightParams,
    /// Degrees.
    pub radius: f64,
    /// Degrees.
    pub falloff: f64,
    pub tightness: f64,
}

/// Typed payload of a node. Each variant carries exactly the parameters that
/// are valid for that kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Box {
        length: f64,
        width: f64,
        height: f64,
    },
    Sphere {
        radius: f64,
    },
    Ellipsoid {
        radius1: f64,
        radius2: f64,
        radius3: f64,
    },
    Cone {
        radius1: f64,
        radius2: f64,
        height: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Torus {
        radius1: f64,
        radius2: f64,
    },
    Plane {
        length: f64,
        width: f64,
    },
    ImagePlane {
        image_file: String,
        x_size: f64,
        y_size: f64,
    },
    Boolean {
        op: BooleanOp,
    },
    /// Standard part container.
    Part,
    /// Document folder; never exported on its own.
    Group,
    Array(ArrayParams),
    Clone {
        sources: Vec<NodeId>,
        scale: [f64; 3],
    },
    Extrusion(ExtrusionParams),
    Sketch(Sketch),
    Pad(PadPocket),
    Pocket(PadPocket),
    Body {
        tip: Option<NodeId>,
    },
    Datum {
        datum: DatumKind,
    },
    PointLight(LightParams),
    AreaLight(AreaLightParams),
    SpotLight(SpotLightParams),
    /// A node that is natively a triangle mesh.
    Mesh(TriMesh),
    /// Anything the exporter has no dedicated rule for.
    Other {
        type_id: String,
    },
}

impl NodeKind {
    /// The host's type identifier for this kind.
    pub fn type_id(&self) -> &str {
        match self {
            NodeKind::Box { .. } => "Part::Box",
            NodeKind::Sphere { .. } => "Part::Sphere",
            NodeKind::Ellipsoid { .. } => "Part::Ellipsoid",
            NodeKind::Cone { .. } => "Part::Cone",
            NodeKind::Cylinder { .. } => "Part::Cylinder",
            NodeKind::Torus { .. } => "Part::Torus",
            NodeKind::Plane { .. } => "Part::Plane",
            NodeKind::ImagePlane { .. } => "Image::ImagePlane",
            NodeKind::Boolean { op } => match op {
                BooleanOp::Cut => "Part::Cut",
                BooleanOp::Fuse => "Part::Fuse",
                BooleanOp::MultiFuse => "Part::MultiFuse",
                BooleanOp::Compound => "Part::Compound",
                BooleanOp::Common => "Part::Common",
                BooleanOp::MultiCommon => "Part::MultiCommon",
            },
            NodeKind::Part => "App::Part",
            NodeKind::Group => "App::DocumentObjectGroup",
            NodeKind::Array(_) => "Part::FeaturePython",
            NodeKind::Clone { .. } => "Part::FeaturePython",
            NodeKind::Extrusion(_) => "Part::Extrusion",
            NodeKind::Sketch(_) => "Sketcher::SketchObject",
            NodeKind::Pad(_) => "PartDesign::Pad",
            NodeKind::Pocket(_) => "PartDesign::Pocket",
            NodeKind::Body { .. } => "PartDesign::Body",
            NodeKind::Datum { datum } => match datum {
                DatumKind::Origin => "App::Origin",
                DatumKind::OriginLine => "App::Line",
                DatumKind::OriginPlane => "App::Plane",
                DatumKind::Point => "PartDesign::Point",
                DatumKind::Line => "PartDesign::Line",
                DatumKind::Plane => "PartDesign::Plane",
            },
            NodeKind::PointLight(_) | NodeKind::AreaLight(_) | NodeKind::SpotLight(_) => {
                "Part::FeaturePython"
            }
            NodeKind::Mesh(_) => "Mesh::Feature",
            NodeKind::Other { type_id } => type_id,
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(
            self,
            NodeKind::PointLight(_) | NodeKind::AreaLight(_) | NodeKind::SpotLight(_)
        )
    }

    /// Nodes referenced through kind parameters rather than `children`.
    pub fn references(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Array(params) => vec![params.base],
            NodeKind::Clone { sources, .. } => sources.clone(),
            NodeKind::Extrusion(params) => vec![params.base],
            NodeKind::Pad(params) | NodeKind::Pocket(params) => {
                let mut refs = vec![params.profile];
                refs.extend(params.base_feature);
                refs
            }
            NodeKind::Body { tip } => tip.iter().copied().collect(),
            _ => Vec::new(),
        }
    }
}
