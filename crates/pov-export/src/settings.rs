use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Everything the user configures for one export. Stored as JSON; missing
/// fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Base name of every generated file.
    pub project_name: String,
    /// Output directory, also the renderer's working directory.
    pub directory: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Add a light source at the camera position.
    pub export_light: bool,
    /// Re-normalise placement rotations before compiling.
    pub repair_rotation: bool,
    /// Save a snapshot of the viewport next to the scene.
    pub export_fc_view: bool,
    pub radiosity: Option<RadiositySettings>,
    pub environment: EnvironmentSettings,
    pub view: ViewPreferences,
    pub renderer: RendererSettings,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            project_name: "scene".to_string(),
            directory: PathBuf::from("."),
            width: 800,
            height: 600,
            export_light: true,
            repair_rotation: false,
            export_fc_view: false,
            radiosity: None,
            environment: EnvironmentSettings::default(),
            view: ViewPreferences::default(),
            renderer: RendererSettings::default(),
        }
    }
}

impl ExportSettings {
    /// Width over height. A zero height is treated as a square image.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / self.height as f64
    }
}

/// A preset from `rad_def.inc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiositySettings {
    /// Preset name passed to `Rad_Settings`, e.g. `Radiosity_Normal`.
    pub preset: String,
    /// Zero the default ambient so only radiosity lights the scene.
    #[serde(default)]
    pub ambient_to_zero: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnvironmentOption {
    /// An HDR image mapped on the sky sphere.
    Hdri,
    /// The host viewport's background colors.
    #[default]
    FreeCadBackground,
}

/// Background of the rendered image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub enabled: bool,
    pub option: EnvironmentOption,
    pub hdr_path: String,
    /// Degrees.
    pub rotation: [f64; 3],
    pub translation: [f64; 3],
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            option: EnvironmentOption::FreeCadBackground,
            hdr_path: String::new(),
            rotation: [0.0; 3],
            translation: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundStyle {
    Simple,
    #[default]
    Gradient,
}

/// Host viewport preferences the scene depends on. Colors are packed
/// `0xRRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
    /// Color of newly created shapes; nodes using it get no pigment of their own.
    pub default_shape_color: u32,
    pub background_style: BackgroundStyle,
    /// Simple background color.
    pub background_color: u32,
    /// Gradient bottom color.
    pub background_color2: u32,
    /// Gradient top color.
    pub background_color3: u32,
    /// Gradient middle color.
    pub background_color4: u32,
    pub use_background_color_mid: bool,
}

impl Default for ViewPreferences {
    fn default() -> Self {
        Self {
            default_shape_color: 0xCCCC_CC00,
            background_style: BackgroundStyle::Gradient,
            background_color: 0x1414_A3FF,
            background_color2: 0x3333_65FF,
            background_color3: 0x9797_AAFF,
            background_color4: 0x6F6F_93FF,
            use_background_color_mid: false,
        }
    }
}

/// How the renderer process is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecMode {
    /// Block until rendering finishes, then inspect the error log.
    #[default]
    Wait,
    /// Start the renderer and return immediately.
    Detach,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Path to the POV-Ray executable.
    pub executable: PathBuf,
    pub exec_mode: ExecMode,
    /// Extra options appended verbatim to the `.ini` file.
    pub render_parameters: String,
}
