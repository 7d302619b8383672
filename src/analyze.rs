//! Heuristic harmony scoring and descriptive tags for a palette.

use log::warn;
use serde::Serialize;

use crate::color::{Color, Hsl};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyType {
    Single,
    Analogous,
    Triadic,
    Complementary,
    Custom,
}

impl HarmonyType {
    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyType::Single => "single",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Triadic => "triadic",
            HarmonyType::Complementary => "complementary",
            HarmonyType::Custom => "custom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyReport {
    pub score: u8,
    #[serde(rename = "type")]
    pub kind: HarmonyType,
    pub avg_hue_difference: f64,
}

/// Rounded HSL of each color. Unparseable entries count as hue 0,
/// saturation 0.
fn display_hsl(colors: &[impl AsRef<str>]) -> Vec<Hsl> {
    colors
        .iter()
        .map(|c| {
            let hex = c.as_ref();
            match Color::from_hex(hex) {
                Some(color) => color.to_hsl().rounded(),
                None => {
                    warn!("ignoring hue of unparseable color {hex:?}");
                    Hsl::new(0.0, 0.0, 0.0)
                }
            }
        })
        .collect()
}

/// Shorter arc between two hues, in degrees.
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

/// Score how well consecutive colors relate by hue.
///
/// The average shorter-arc hue step between neighbours picks the type:
/// under 30° is analogous (95), within 20° of 120° triadic (90), within 20°
/// of 180° complementary (85). Anything else scores `100 - avg/2`, floored
/// at 50.
pub fn analyze_harmony(colors: &[impl AsRef<str>]) -> HarmonyReport {
    if colors.len() < 2 {
        return HarmonyReport {
            score: 100,
            kind: HarmonyType::Single,
            avg_hue_difference: 0.0,
        };
    }

    let hues: Vec<f64> = display_hsl(colors).iter().map(|hsl| hsl.h).collect();
    let steps: Vec<f64> = hues.windows(2).map(|w| hue_distance(w[0], w[1])).collect();
    let avg = steps.iter().sum::<f64>() / steps.len() as f64;

    let (kind, score) = if avg < 30.0 {
        (HarmonyType::Analogous, 95.0)
    } else if (avg - 120.0).abs() < 20.0 {
        (HarmonyType::Triadic, 90.0)
    } else if (avg - 180.0).abs() < 20.0 {
        (HarmonyType::Complementary, 85.0)
    } else {
        (HarmonyType::Custom, (100.0 - avg / 2.0).max(50.0))
    };

    HarmonyReport {
        score: score.round() as u8,
        kind,
        avg_hue_difference: avg,
    }
}

/// Short labels describing a palette: its size, dominant hue family and,
/// when pronounced, its saturation level.
pub fn palette_tags(colors: &[impl AsRef<str>]) -> Vec<String> {
    let size = match colors.len() {
        1 => "1 color".to_string(),
        n => format!("{n} colors"),
    };
    let mut tags = vec![size];
    if colors.is_empty() {
        return tags;
    }

    let hsl = display_hsl(colors);
    let n = hsl.len() as f64;
    let avg_hue = hsl.iter().map(|c| c.h).sum::<f64>() / n;
    let avg_sat = hsl.iter().map(|c| c.s).sum::<f64>() / n;

    let family = match avg_hue {
        h if h < 30.0 || h > 330.0 => "red",
        h if h < 90.0 => "orange-yellow",
        h if h < 150.0 => "green",
        h if h < 210.0 => "cyan",
        h if h < 270.0 => "blue",
        _ => "purple",
    };
    tags.push(family.to_string());

    if avg_sat > 70.0 {
        tags.push("high-saturation".to_string());
    } else if avg_sat < 30.0 {
        tags.push("low-saturation".to_string());
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_palettes_are_single() {
        let empty: [&str; 0] = [];
        assert_eq!(analyze_harmony(&empty).kind, HarmonyType::Single);
        let one = analyze_harmony(&["#FF0000"]);
        assert_eq!((one.score, one.kind), (100, HarmonyType::Single));
    }

    #[test]
    fn near_hues_are_analogous() {
        let r = analyze_harmony(&["#FF0000", "#FF1E00"]);
        assert_eq!(r.kind, HarmonyType::Analogous);
        assert!(r.score >= 90);
        assert_eq!(r.avg_hue_difference, 7.0);
    }

    #[test]
    fn opposite_hues_are_complementary() {
        let r = analyze_harmony(&["#FF0000", "#00FFFF"]);
        assert_eq!(r.kind, HarmonyType::Complementary);
        assert_eq!(r.score, 85);
        assert_eq!(r.avg_hue_difference, 180.0);
    }

    #[test]
    fn thirds_are_triadic() {
        let r = analyze_harmony(&["#FF0000", "#00FF00", "#0000FF"]);
        assert_eq!(r.kind, HarmonyType::Triadic);
        assert_eq!(r.score, 90);
    }

    #[test]
    fn wrap_around_uses_shorter_arc() {
        assert_eq!(hue_distance(350.0, 10.0), 20.0);
        let r = analyze_harmony(&["#FF002B", "#FF2B00"]);
        assert_eq!(r.kind, HarmonyType::Analogous);
    }

    #[test]
    fn other_spacings_are_custom() {
        // 60 degree steps: 100 - 60 / 2 = 70.
        let r = analyze_harmony(&["#FF0000", "#FFFF00", "#00FF00"]);
        assert_eq!(r.kind, HarmonyType::Custom);
        assert_eq!(r.score, 70);
    }

    #[test]
    fn report_serializes_like_the_host_expects() {
        let r = analyze_harmony(&["#FF0000", "#00FFFF"]);
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["type"], "complementary");
        assert_eq!(json["avgHueDifference"], 180.0);
    }

    #[test]
    fn tags_describe_family_and_saturation() {
        assert_eq!(
            palette_tags(&["#FF0000", "#FF1E00"]),
            vec!["2 colors", "red", "high-saturation"]
        );
        assert_eq!(
            palette_tags(&["#3355AA", "#334488"]),
            vec!["2 colors", "blue"]
        );
        assert_eq!(palette_tags(&["#808080"]), vec!["1 color", "red", "low-saturation"]);
        let empty: [&str; 0] = [];
        assert_eq!(palette_tags(&empty), vec!["0 colors"]);
    }
}
