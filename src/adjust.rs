//! Per-color adjustment pipeline used by the preview tool.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Color, wrap_hue};
use crate::color_blind::ColorBlindMode;
use crate::error::PaletteError;

/// Slider values for one adjustment session. Zero in every field is the
/// identity.
///
/// Out-of-range values are clamped when applied: hue to ±180, saturation,
/// brightness and contrast to ±50, temperature to ±100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParameters {
    pub hue: i32,
    pub saturation: i32,
    pub brightness: i32,
    pub contrast: i32,
    pub temperature: i32,
}

impl AdjustmentParameters {
    pub fn clamped(self) -> Self {
        AdjustmentParameters {
            hue: self.hue.clamp(-180, 180),
            saturation: self.saturation.clamp(-50, 50),
            brightness: self.brightness.clamp(-50, 50),
            contrast: self.contrast.clamp(-50, 50),
            temperature: self.temperature.clamp(-100, 100),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == AdjustmentParameters::default()
    }
}

/// A saved adjustment session as the host persists it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentSession {
    #[serde(flatten)]
    pub adjustments: AdjustmentParameters,
    pub color_blind_mode: ColorBlindMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Vivid,
    Soft,
    Warm,
    Cool,
    Reset,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Vivid,
        Preset::Soft,
        Preset::Warm,
        Preset::Cool,
        Preset::Reset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Vivid => "vivid",
            Preset::Soft => "soft",
            Preset::Warm => "warm",
            Preset::Cool => "cool",
            Preset::Reset => "reset",
        }
    }

    pub fn parameters(self) -> AdjustmentParameters {
        let base = AdjustmentParameters::default();
        match self {
            Preset::Vivid => AdjustmentParameters {
                saturation: 30,
                contrast: 20,
                ..base
            },
            Preset::Soft => AdjustmentParameters {
                saturation: -20,
                brightness: 10,
                contrast: -15,
                ..base
            },
            Preset::Warm => AdjustmentParameters {
                saturation: 10,
                temperature: 40,
                ..base
            },
            Preset::Cool => AdjustmentParameters {
                saturation: 5,
                temperature: -40,
                ..base
            },
            Preset::Reset => base,
        }
    }

    /// The full session a preset selects. Only `reset` touches the
    /// color-blind mode, switching it off; other presets keep `current`.
    pub fn session(self, current: ColorBlindMode) -> AdjustmentSession {
        AdjustmentSession {
            adjustments: self.parameters(),
            color_blind_mode: match self {
                Preset::Reset => ColorBlindMode::None,
                _ => current,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| PaletteError::unknown("preset", s))
    }
}

/// `factor * (c - 128) + 128` with the usual 259-based contrast factor.
fn contrast_channel(c: u8, contrast: f64) -> f64 {
    let factor = (259.0 * (contrast + 255.0)) / (255.0 * (259.0 - contrast));
    factor * (f64::from(c) - 128.0) + 128.0
}

/// Run `color` through the adjustment pipeline.
///
/// The order is fixed: hue rotation, saturation, lightness (all in HSL),
/// then contrast and temperature on RGB channels, then the color-blind
/// simulation.
pub fn adjust_color(color: Color, adjustments: &AdjustmentParameters, mode: ColorBlindMode) -> Color {
    let adj = adjustments.clamped();
    let mut out = color;

    if adj.hue != 0 || adj.saturation != 0 || adj.brightness != 0 {
        let mut hsl = out.to_hsl();
        hsl.h = wrap_hue(hsl.h + f64::from(adj.hue));
        hsl.s = (hsl.s + f64::from(adj.saturation)).clamp(0.0, 100.0);
        hsl.l = (hsl.l + f64::from(adj.brightness)).clamp(0.0, 100.0);
        out = hsl.to_color();
    }

    if adj.contrast != 0 {
        let k = f64::from(adj.contrast);
        out = Color::from_channels(
            contrast_channel(out.r, k),
            contrast_channel(out.g, k),
            contrast_channel(out.b, k),
        );
    }

    if adj.temperature != 0 {
        let shift = f64::from(adj.temperature) * 0.3;
        out = Color::from_channels(
            f64::from(out.r) + shift,
            f64::from(out.g),
            f64::from(out.b) - shift,
        );
    }

    mode.simulate(out)
}

/// Hex-string entry point; `None` for a malformed color.
pub fn apply_color_adjustments(
    hex: &str,
    adjustments: &AdjustmentParameters,
    mode: ColorBlindMode,
) -> Option<String> {
    let color = Color::from_hex(hex)?;
    Some(adjust_color(color, adjustments, mode).to_hex())
}
