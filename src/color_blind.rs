use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PaletteError;

/// Color vision deficiency to simulate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindMode {
    #[default]
    None,
    Protanopia,
    Deuteranopia,
    Tritanopia,
    Achromatopsia,
    Protanomaly,
    Deuteranomaly,
    Tritanomaly,
}

type Matrix = [[f64; 3]; 3];

// Row-major, applied to gamma-encoded channels in [0, 1].
const PROTANOPIA: Matrix = [[0.567, 0.433, 0.0], [0.558, 0.442, 0.0], [0.0, 0.242, 0.758]];
const PROTANOMALY: Matrix = [[0.817, 0.183, 0.0], [0.333, 0.667, 0.0], [0.0, 0.125, 0.875]];
const DEUTERANOPIA: Matrix = [[0.625, 0.375, 0.0], [0.7, 0.3, 0.0], [0.0, 0.3, 0.7]];
const DEUTERANOMALY: Matrix = [[0.8, 0.2, 0.0], [0.258, 0.742, 0.0], [0.0, 0.142, 0.858]];
const TRITANOPIA: Matrix = [[0.95, 0.05, 0.0], [0.0, 0.433, 0.567], [0.0, 0.475, 0.525]];
const TRITANOMALY: Matrix = [[0.967, 0.033, 0.0], [0.0, 0.733, 0.267], [0.0, 0.183, 0.817]];
const ACHROMATOPSIA: Matrix = [
    [0.299, 0.587, 0.114],
    [0.299, 0.587, 0.114],
    [0.299, 0.587, 0.114],
];

impl ColorBlindMode {
    pub const ALL: [ColorBlindMode; 8] = [
        ColorBlindMode::None,
        ColorBlindMode::Protanopia,
        ColorBlindMode::Deuteranopia,
        ColorBlindMode::Tritanopia,
        ColorBlindMode::Achromatopsia,
        ColorBlindMode::Protanomaly,
        ColorBlindMode::Deuteranomaly,
        ColorBlindMode::Tritanomaly,
    ];

    fn matrix(self) -> Option<&'static Matrix> {
        match self {
            ColorBlindMode::None => None,
            ColorBlindMode::Protanopia => Some(&PROTANOPIA),
            ColorBlindMode::Deuteranopia => Some(&DEUTERANOPIA),
            ColorBlindMode::Tritanopia => Some(&TRITANOPIA),
            ColorBlindMode::Achromatopsia => Some(&ACHROMATOPSIA),
            ColorBlindMode::Protanomaly => Some(&PROTANOMALY),
            ColorBlindMode::Deuteranomaly => Some(&DEUTERANOMALY),
            ColorBlindMode::Tritanomaly => Some(&TRITANOMALY),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorBlindMode::None => "none",
            ColorBlindMode::Protanopia => "protanopia",
            ColorBlindMode::Deuteranopia => "deuteranopia",
            ColorBlindMode::Tritanopia => "tritanopia",
            ColorBlindMode::Achromatopsia => "achromatopsia",
            ColorBlindMode::Protanomaly => "protanomaly",
            ColorBlindMode::Deuteranomaly => "deuteranomaly",
            ColorBlindMode::Tritanomaly => "tritanomaly",
        }
    }

    /// Apply the simulation matrix. `None` leaves the color untouched.
    pub fn simulate(self, color: Color) -> Color {
        let Some(m) = self.matrix() else {
            return color;
        };
        let v = [
            f64::from(color.r) / 255.0,
            f64::from(color.g) / 255.0,
            f64::from(color.b) / 255.0,
        ];
        let row = |i: usize| m[i][0] * v[0] + m[i][1] * v[1] + m[i][2] * v[2];
        Color::from_unit(row(0), row(1), row(2))
    }
}

impl fmt::Display for ColorBlindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorBlindMode {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name.is_empty() || name == "normal" {
            return Ok(ColorBlindMode::None);
        }
        ColorBlindMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == name)
            .ok_or_else(|| PaletteError::unknown("color-blind mode", s))
    }
}

/// Simulate how `hex` looks under the named deficiency.
///
/// Returns `None` for a malformed color. An unknown mode name leaves the
/// color unchanged.
pub fn simulate_color_blindness(hex: &str, mode: &str) -> Option<String> {
    let color = Color::from_hex(hex)?;
    let mode = mode.parse().unwrap_or(ColorBlindMode::None);
    Some(ColorBlindMode::simulate(mode, color).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn none_is_identity() {
        let c = Color::new(12, 200, 99);
        assert_eq!(ColorBlindMode::None.simulate(c), c);
    }

    #[test]
    fn matrices_preserve_white_and_black() {
        // Every row sums to 1, so neutrals survive every simulation.
        for mode in ColorBlindMode::ALL {
            assert_eq!(mode.simulate(Color::WHITE), Color::WHITE, "{mode}");
            assert_eq!(mode.simulate(Color::BLACK), Color::BLACK, "{mode}");
        }
    }

    #[test]
    fn achromatopsia_collapses_to_gray() {
        let gray = ColorBlindMode::Achromatopsia.simulate(Color::new(255, 0, 0));
        assert_eq!(gray, Color::new(76, 76, 76));
    }

    #[test]
    fn protanopia_pulls_red_and_green_together() {
        assert_eq!(simulate_color_blindness("#FF0000", "protanopia").as_deref(), Some("#918E00"));
    }

    #[test]
    fn unknown_mode_returns_input() {
        assert_eq!(simulate_color_blindness("#123456", "martian").as_deref(), Some("#123456"));
        assert_eq!(simulate_color_blindness("#12345", "protanopia"), None);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("Deuteranomaly".parse::<ColorBlindMode>().ok(), Some(ColorBlindMode::Deuteranomaly));
        assert_eq!("".parse::<ColorBlindMode>().ok(), Some(ColorBlindMode::None));
        assert!("martian".parse::<ColorBlindMode>().is_err());
    }
}
