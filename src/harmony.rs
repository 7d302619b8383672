//! Palettes derived from a single seed color by fixed hue rotations.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::color::{Color, Hsl, random_color};
use crate::error::PaletteError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemeType {
    Analogous,
    Complementary,
    Triadic,
    Tetradic,
    Monochromatic,
    SplitComplementary,
    /// Hues spread evenly around the wheel.
    Even,
}

impl SchemeType {
    pub const ALL: [SchemeType; 7] = [
        SchemeType::Analogous,
        SchemeType::Complementary,
        SchemeType::Triadic,
        SchemeType::Tetradic,
        SchemeType::Monochromatic,
        SchemeType::SplitComplementary,
        SchemeType::Even,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemeType::Analogous => "analogous",
            SchemeType::Complementary => "complementary",
            SchemeType::Triadic => "triadic",
            SchemeType::Tetradic => "tetradic",
            SchemeType::Monochromatic => "monochromatic",
            SchemeType::SplitComplementary => "split-complementary",
            SchemeType::Even => "even",
        }
    }

    /// Scheme for a name coming from the host. Unknown names fall back to
    /// evenly spaced hues.
    pub fn from_name(name: &str) -> SchemeType {
        name.parse().unwrap_or(SchemeType::Even)
    }

    /// HSL of the `i`-th color of a `count`-color palette built from `base`.
    fn nth(self, base: Hsl, i: usize, count: usize) -> Hsl {
        let Hsl { h, s, l } = base;
        let fi = i as f64;
        let hue = |offset: f64| Hsl::new((h + offset) % 360.0, s, l);
        match self {
            SchemeType::Analogous => hue(fi * 30.0),
            SchemeType::Complementary => hue(if i % 2 == 0 { 0.0 } else { 180.0 }),
            SchemeType::Triadic => hue(fi * 120.0),
            SchemeType::Tetradic => hue(fi * 90.0),
            SchemeType::Monochromatic => {
                let shift = (fi - count as f64 / 2.0) * 15.0;
                Hsl::new(h, s, (l + shift).clamp(20.0, 80.0))
            }
            SchemeType::SplitComplementary => match i {
                0 => hue(0.0),
                1 => hue(150.0),
                2 => hue(210.0),
                _ => hue(fi * 60.0),
            },
            SchemeType::Even => hue(fi * 360.0 / count as f64),
        }
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeType {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('_', "-");
        SchemeType::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == name)
            .ok_or_else(|| PaletteError::unknown("scheme", s))
    }
}

/// Build a `count`-color palette around `base_hex`.
///
/// The first entry is always the base color itself (uppercased); the rest
/// follow the scheme's hue or lightness rule. Returns `None` when `base_hex`
/// is not a valid `#RRGGBB` color.
pub fn generate_harmonious_palette(
    base_hex: &str,
    count: usize,
    scheme: SchemeType,
) -> Option<Vec<String>> {
    let base = Color::from_hex(base_hex)?;
    Some(generate_from_color(base, count, scheme))
}

pub fn generate_from_color(base: Color, count: usize, scheme: SchemeType) -> Vec<String> {
    let hsl = base.to_hsl();
    (0..count)
        .map(|i| {
            if i == 0 {
                base.to_hex()
            } else {
                scheme.nth(hsl, i, count).to_hex()
            }
        })
        .collect()
}

/// Named starting points for a new palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Nature,
    Ocean,
    Sunset,
    Medical,
    Minimal,
    Tropical,
}

impl Theme {
    fn seed(self) -> (Color, SchemeType) {
        match self {
            Theme::Nature => (Color::new(0x2D, 0x5A, 0x27), SchemeType::Analogous),
            Theme::Ocean => (Color::new(0x00, 0x3F, 0x5C), SchemeType::Monochromatic),
            Theme::Sunset => (Color::new(0xFF, 0x6B, 0x6B), SchemeType::Complementary),
            Theme::Medical => (Color::new(0xE7, 0x4C, 0x3C), SchemeType::Triadic),
            Theme::Minimal => (Color::new(0x2C, 0x3E, 0x50), SchemeType::Monochromatic),
            Theme::Tropical => (Color::new(0x00, 0xB8, 0x94), SchemeType::Analogous),
        }
    }

    /// Unknown names map to [`Theme::Nature`].
    pub fn from_name(name: &str) -> Theme {
        match name.trim().to_ascii_lowercase().as_str() {
            "ocean" => Theme::Ocean,
            "sunset" => Theme::Sunset,
            "medical" => Theme::Medical,
            "minimal" => Theme::Minimal,
            "tropical" => Theme::Tropical,
            _ => Theme::Nature,
        }
    }
}

pub fn theme_palette(theme: Theme, count: usize) -> Vec<String> {
    let (base, scheme) = theme.seed();
    generate_from_color(base, count, scheme)
}

const RANDOM_SCHEMES: [SchemeType; 4] = [
    SchemeType::Analogous,
    SchemeType::Complementary,
    SchemeType::Triadic,
    SchemeType::Monochromatic,
];

/// Regenerate `current` from a random seed and scheme, keeping the colors
/// at the `locked` indices.
pub fn random_palette<R: Rng + ?Sized>(
    current: &[String],
    locked: &[usize],
    rng: &mut R,
) -> Vec<String> {
    let base = random_color(rng);
    let scheme = RANDOM_SCHEMES
        .choose(rng)
        .copied()
        .unwrap_or(SchemeType::Analogous);
    let fresh = generate_from_color(base, current.len(), scheme);
    current
        .iter()
        .zip(fresh)
        .enumerate()
        .map(|(i, (old, new))| if locked.contains(&i) { old.clone() } else { new })
        .collect()
}
