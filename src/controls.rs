//! Data behind the debug panel: camera modes, lighting presets and per-layer
//! visibility/color. The panel widgets themselves live on the JS side.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    Flat,
    Perspective,
    Isometric,
}

impl CameraMode {
    pub const ALL: [CameraMode; 3] = [
        CameraMode::Flat,
        CameraMode::Perspective,
        CameraMode::Isometric,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Flat => "Flat",
            CameraMode::Perspective => "Perspective",
            CameraMode::Isometric => "Isometric",
        }
    }

    /// Camera type string understood by the renderer's style document.
    pub fn style_type(self) -> &'static str {
        match self {
            CameraMode::Flat => "flat",
            CameraMode::Perspective => "perspective",
            CameraMode::Isometric => "isometric",
        }
    }

    pub fn from_style_type(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.style_type() == kind)
    }
}

/// Light block written into the renderer's styles when a preset is picked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lighting {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outer_angle: Option<f64>,
    pub ambient: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backlight: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightingPreset {
    pub name: &'static str,
    pub lighting: Lighting,
}

/// Presets in menu order.
pub fn lighting_presets() -> Vec<LightingPreset> {
    vec![
        LightingPreset {
            name: "Point",
            lighting: Lighting {
                kind: "point",
                position: Some([0.0, 0.0, 200.0]),
                direction: None,
                inner_angle: None,
                outer_angle: None,
                ambient: 0.5,
                backlight: Some(true),
            },
        },
        LightingPreset {
            name: "Directional",
            lighting: Lighting {
                kind: "directional",
                position: None,
                direction: Some([-1.0, 0.0, -0.5]),
                inner_angle: None,
                outer_angle: None,
                ambient: 0.5,
                backlight: None,
            },
        },
        LightingPreset {
            name: "Spotlight",
            lighting: Lighting {
                kind: "spotlight",
                position: Some([0.0, 0.0, 500.0]),
                direction: Some([0.0, 0.0, -1.0]),
                inner_angle: Some(20.0),
                outer_angle: Some(25.0),
                ambient: 0.2,
                backlight: None,
            },
        },
        LightingPreset {
            name: "Night",
            lighting: Lighting {
                kind: "point",
                position: Some([0.0, 0.0, 50.0]),
                direction: None,
                inner_angle: None,
                outer_angle: None,
                ambient: 0.0,
                backlight: Some(false),
            },
        },
    ]
}

pub fn lighting_preset(name: &str) -> Option<LightingPreset> {
    lighting_presets().into_iter().find(|p| p.name == name)
}

/// Initial menu selection for the scene's current light: the first preset
/// of the same light type.
pub fn preset_for_type(kind: &str) -> Option<&'static str> {
    lighting_presets()
        .into_iter()
        .find(|p| p.lighting.kind == kind)
        .map(|p| p.name)
}

/// Visibility and color of one style layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerControl {
    pub name: String,
    pub visible: bool,
    /// Renderer color space, each channel in `0.0..=1.0`.
    pub color: [f64; 3],
}

impl LayerControl {
    /// A layer is visible unless its style says `visible: false`.
    pub fn new(name: impl Into<String>, visible: Option<bool>, color: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            visible: visible != Some(false),
            color,
        }
    }

    /// Color picker space, each channel in `0.0..=255.0`.
    pub fn to_rgb255(&self) -> [f64; 3] {
        unit_to_rgb255(self.color)
    }

    pub fn set_rgb255(&mut self, rgb: [f64; 3]) {
        self.color = rgb255_to_unit(rgb);
    }
}

/// One row of the layer folder: the control plus its picker color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerPanelEntry {
    #[serde(flatten)]
    pub control: LayerControl,
    pub rgb255: [f64; 3],
}

impl From<LayerControl> for LayerPanelEntry {
    fn from(control: LayerControl) -> Self {
        let rgb255 = control.to_rgb255();
        Self { control, rgb255 }
    }
}

pub fn unit_to_rgb255(color: [f64; 3]) -> [f64; 3] {
    color.map(|c| c * 255.0)
}

pub fn rgb255_to_unit(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(|c| c / 255.0)
}
