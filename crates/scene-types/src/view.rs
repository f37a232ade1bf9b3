use serde::{Deserialize, Serialize};

/// RGBA color with components in `0.0..=1.0`, as stored by the host's view
/// providers (single precision).
pub type Rgba = [f32; 4];

/// Ambient color every new shape material starts with.
pub const DEFAULT_AMBIENT: Rgba = [0.2, 0.2, 0.2, 0.0];
/// Black, the default emissive and specular color.
pub const BLACK: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Display material of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeMaterial {
    pub ambient_color: Rgba,
    pub diffuse_color: Rgba,
    pub emissive_color: Rgba,
    pub specular_color: Rgba,
    pub shininess: f64,
}

impl Default for ShapeMaterial {
    fn default() -> Self {
        Self {
            ambient_color: DEFAULT_AMBIENT,
            diffuse_color: [0.8, 0.8, 0.8, 0.0],
            emissive_color: BLACK,
            specular_color: BLACK,
            shininess: 0.2,
        }
    }
}

/// How a node is drawn in the host's viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewStyle {
    /// RGB shape color.
    pub shape_color: [f32; 3],
    /// Transparency in percent, `0..=100`.
    pub transparency: u8,
    pub shape_material: ShapeMaterial,
    /// Linear deviation used when the shape is tessellated for display.
    pub deviation: f64,
    /// Angular deflection in radians, when the view provider has one.
    pub angular_deflection: Option<f64>,
}

impl Default for ViewStyle {
    fn default() -> Self {
        Self {
            shape_color: [0.8, 0.8, 0.8],
            transparency: 0,
            shape_material: ShapeMaterial::default(),
            deviation: 0.5,
            angular_deflection: None,
        }
    }
}

impl ViewStyle {
    pub fn with_color(color: [f32; 3]) -> Self {
        Self {
            shape_color: color,
            ..Self::default()
        }
    }
}
