//! Color space conversions shared by the quantizer, the palette generator
//! and the harmony analyzer.
//!
//! Hex output is always uppercase `#RRGGBB`. Functions that take a hex string
//! from the caller return `None` for malformed input instead of an error, since
//! half-typed values from an editing field are the normal case.

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsl as SrgbHsl, Srgb, encoding};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ParseColorError;

/// An opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent.
///
/// Values are kept unrounded so chained edits do not drift; call
/// [`Hsl::rounded`] for display.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// CMYK percentages, rounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cmyk {
    pub c: u8,
    pub m: u8,
    pub y: u8,
    pub k: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Build a color from real-valued channels in 0-255, clamping and rounding each.
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        let q = |c: f64| c.clamp(0.0, 255.0).round() as u8;
        Color::new(q(r), q(g), q(b))
    }

    /// Build a color from channels normalized to `[0, 1]`.
    pub fn from_unit(r: f64, g: f64, b: f64) -> Self {
        Color::from_channels(r * 255.0, g * 255.0, b * 255.0)
    }

    /// Strict parse of `#RRGGBB` (the `#` is optional, case-insensitive).
    ///
    /// Shorthand `#RGB` is rejected here; run it through [`expand_hex`] first.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Color::new(r, g, b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// CSS functional notation, e.g. `rgb(255, 0, 0)`.
    pub fn to_css_rgb(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    pub fn to_hsl(self) -> Hsl {
        let rgb = Srgb::<u8>::from(self).into_format::<f64>();
        let hsl = SrgbHsl::<encoding::Srgb, f64>::from_color(rgb);
        Hsl {
            h: hsl.hue.into_positive_degrees() % 360.0,
            s: hsl.saturation * 100.0,
            l: hsl.lightness * 100.0,
        }
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(self) -> f64 {
        let linear = |c: u8| {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(self.r) + 0.7152 * linear(self.g) + 0.0722 * linear(self.b)
    }

    /// Perceived brightness `(299R + 587G + 114B) / 1000`, in 0-255.
    pub fn brightness(self) -> f64 {
        (299.0 * f64::from(self.r) + 587.0 * f64::from(self.g) + 114.0 * f64::from(self.b))
            / 1000.0
    }

    /// Whether light text reads better on this color.
    pub fn is_dark(self) -> bool {
        self.brightness() < 128.0
    }

    pub fn contrast_ratio(self, other: Color) -> f64 {
        let (a, b) = (self.luminance(), other.luminance());
        let (lighter, darker) = if a >= b { (a, b) } else { (b, a) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Linear interpolation towards `other`; `ratio` is clamped to `[0, 1]`.
    pub fn blend(self, other: Color, ratio: f64) -> Color {
        let t = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let mix = |a: u8, b: u8| f64::from(a) * (1.0 - t) + f64::from(b) * t;
        Color::from_channels(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }

    pub fn to_cmyk(self) -> Cmyk {
        let c = 1.0 - f64::from(self.r) / 255.0;
        let m = 1.0 - f64::from(self.g) / 255.0;
        let y = 1.0 - f64::from(self.b) / 255.0;
        let k = c.min(m).min(y);
        let part = |v: f64| {
            if k >= 1.0 {
                0
            } else {
                (((v - k) / (1.0 - k)) * 100.0).round() as u8
            }
        };
        Cmyk {
            c: part(c),
            m: part(m),
            y: part(y),
            k: (k * 100.0).round() as u8,
        }
    }

    /// Squared Euclidean distance in RGB space.
    pub fn distance_squared(self, other: Color) -> u32 {
        let d = |a: u8, b: u8| {
            let d = i32::from(a) - i32::from(b);
            (d * d) as u32
        };
        d(self.r, other.r) + d(self.g, other.g) + d(self.b, other.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Lenient parse accepting `#RGB`, `#RRGGBB` and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseColorError::Empty);
        }
        let expanded = expand_hex(s);
        let digits = expanded.strip_prefix('#').unwrap_or(&expanded);
        if digits.len() != 6 {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }
        Color::from_hex(digits).ok_or_else(|| ParseColorError::InvalidHex(s.to_string()))
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Hsl { h, s, l }
    }

    /// Nearest-integer form used for display and for hue comparisons.
    pub fn rounded(self) -> Hsl {
        Hsl {
            h: self.h.round() % 360.0,
            s: self.s.round(),
            l: self.l.round(),
        }
    }

    pub fn to_color(self) -> Color {
        let hsl = SrgbHsl::<encoding::Srgb, f64>::new(
            wrap_hue(self.h),
            (self.s / 100.0).clamp(0.0, 1.0),
            (self.l / 100.0).clamp(0.0, 1.0),
        );
        let rgb = Srgb::<f64>::from_color(hsl);
        Color::from_unit(rgb.red, rgb.green, rgb.blue)
    }

    pub fn to_hex(self) -> String {
        self.to_color().to_hex()
    }
}

/// Wrap any hue in degrees into `[0, 360)`.
pub fn wrap_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 { 0.0 } else { h }
}

/// Expand `#RGB` shorthand into `#RRGGBB`. Anything else is returned as is.
pub fn expand_hex(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        let mut out = String::with_capacity(7);
        out.push('#');
        for ch in digits.chars() {
            out.push(ch);
            out.push(ch);
        }
        out
    } else {
        hex.to_string()
    }
}

/// `#` followed by exactly 3 or 6 hex digits.
pub fn is_valid_hex(hex: &str) -> bool {
    match hex.strip_prefix('#') {
        Some(d) => (d.len() == 3 || d.len() == 6) && d.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn hex_to_rgb(hex: &str) -> Option<Color> {
    Color::from_hex(hex)
}

pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Color::from_channels(r, g, b).to_hex()
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    Color::new(r, g, b).to_hsl()
}

pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    Color::from_hex(hex).map(Color::to_hsl)
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    Hsl::new(h, s, l).to_hex()
}

pub fn get_luminance(hex: &str) -> Option<f64> {
    Color::from_hex(hex).map(Color::luminance)
}

/// `(L_lighter + 0.05) / (L_darker + 0.05)`, symmetric in its arguments.
pub fn get_contrast_ratio(a: &str, b: &str) -> Option<f64> {
    Some(Color::from_hex(a)?.contrast_ratio(Color::from_hex(b)?))
}

pub fn is_dark(hex: &str) -> Option<bool> {
    Color::from_hex(hex).map(Color::is_dark)
}

/// Black or white, whichever reads on `background`.
pub fn text_color(background: &str) -> Option<&'static str> {
    is_dark(background).map(|dark| if dark { "#FFFFFF" } else { "#000000" })
}

pub fn blend_colors(a: &str, b: &str, ratio: f64) -> Option<String> {
    Some(Color::from_hex(a)?.blend(Color::from_hex(b)?, ratio).to_hex())
}

pub fn complementary(hex: &str) -> Option<String> {
    let hsl = hex_to_hsl(hex)?;
    Some(hsl_to_hex(hsl.h + 180.0, hsl.s, hsl.l))
}

pub fn adjust_brightness(hex: &str, amount: f64) -> Option<String> {
    let hsl = hex_to_hsl(hex)?;
    Some(hsl_to_hex(hsl.h, hsl.s, (hsl.l + amount).clamp(0.0, 100.0)))
}

pub fn adjust_saturation(hex: &str, amount: f64) -> Option<String> {
    let hsl = hex_to_hsl(hex)?;
    Some(hsl_to_hex(hsl.h, (hsl.s + amount).clamp(0.0, 100.0), hsl.l))
}

/// `steps` colors from `start` to `end` inclusive.
pub fn generate_gradient(start: Color, end: Color, steps: usize) -> Vec<Color> {
    match steps {
        0 => Vec::new(),
        1 => vec![start],
        _ => (0..steps)
            .map(|i| start.blend(end, i as f64 / (steps - 1) as f64))
            .collect(),
    }
}

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let v: u32 = rng.random_range(0..=0x00FF_FFFF);
    Color::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Cmyk,
}

impl FromStr for ColorFormat {
    type Err = crate::error::PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(ColorFormat::Hex),
            "rgb" => Ok(ColorFormat::Rgb),
            "rgba" => Ok(ColorFormat::Rgba),
            "hsl" => Ok(ColorFormat::Hsl),
            "cmyk" => Ok(ColorFormat::Cmyk),
            _ => Err(crate::error::PaletteError::unknown("color format", s)),
        }
    }
}

/// Render a color in one of the notations the color picker offers for copying.
pub fn format_color(hex: &str, format: ColorFormat) -> Option<String> {
    let color: Color = hex.parse().ok()?;
    Some(match format {
        ColorFormat::Hex => color.to_hex(),
        ColorFormat::Rgb => color.to_css_rgb(),
        ColorFormat::Rgba => format!("rgba({}, {}, {}, 1)", color.r, color.g, color.b),
        ColorFormat::Hsl => {
            let hsl = color.to_hsl().rounded();
            format!("hsl({}, {}%, {}%)", hsl.h, hsl.s, hsl.l)
        }
        ColorFormat::Cmyk => {
            let cmyk = color.to_cmyk();
            format!("cmyk({}%, {}%, {}%, {}%)", cmyk.c, cmyk.m, cmyk.y, cmyk.k)
        }
    })
}

const NAMED_COLORS: [(Color, &str); 12] = [
    (Color::new(0xFF, 0x00, 0x00), "red"),
    (Color::new(0x00, 0xFF, 0x00), "green"),
    (Color::new(0x00, 0x00, 0xFF), "blue"),
    (Color::new(0xFF, 0xFF, 0x00), "yellow"),
    (Color::new(0xFF, 0x00, 0xFF), "magenta"),
    (Color::new(0x00, 0xFF, 0xFF), "cyan"),
    (Color::new(0x00, 0x00, 0x00), "black"),
    (Color::new(0xFF, 0xFF, 0xFF), "white"),
    (Color::new(0x80, 0x80, 0x80), "gray"),
    (Color::new(0xFF, 0xA5, 0x00), "orange"),
    (Color::new(0x80, 0x00, 0x80), "purple"),
    (Color::new(0xFF, 0xC0, 0xCB), "pink"),
];

/// Closest basic color name by RGB distance.
pub fn color_name(hex: &str) -> Option<&'static str> {
    let target = Color::from_hex(hex)?;
    NAMED_COLORS
        .iter()
        .min_by_key(|(c, _)| c.distance_squared(target))
        .map(|&(_, name)| name)
}
