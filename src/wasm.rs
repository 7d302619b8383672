//! Browser bindings. Names follow the JS callers (`quantizeDominantColors`, ...).
//!
//! Malformed colors come back as `null`/`undefined` rather than exceptions;
//! only undecodable images and bad buffer sizes throw.

use js_sys::{Array, Object, Reflect};
use rand::{SeedableRng, rngs::StdRng};
use wasm_bindgen::prelude::*;

use crate::adjust::{AdjustmentParameters, Preset, apply_color_adjustments};
use crate::analyze::{analyze_harmony, palette_tags};
use crate::color_blind::ColorBlindMode;
use crate::export::{ExportFormat, export_palette};
use crate::harmony::{SchemeType, generate_harmonious_palette};
use crate::quantize::{PaletteEntry, PixelBuffer, quantize_dominant_colors, quantize_dominant_colors_with_rng};

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn strings_from(array: &Array) -> Result<Vec<String>, JsValue> {
    array
        .iter()
        .map(|v| {
            v.as_string()
                .ok_or_else(|| JsValue::from_str("Palette values must be strings"))
        })
        .collect()
}

fn string_array(items: impl IntoIterator<Item = String>) -> Array {
    let out = Array::new();
    for item in items {
        out.push(&JsValue::from_str(&item));
    }
    out
}

fn entries_to_js(entries: &[PaletteEntry]) -> Result<Array, JsValue> {
    let out = Array::new();
    for entry in entries {
        let obj = Object::new();
        Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&entry.hex))?;
        Reflect::set(&obj, &JsValue::from_str("rgb"), &JsValue::from_str(&entry.rgb))?;
        if let Some(freq) = entry.frequency {
            Reflect::set(&obj, &JsValue::from_str("frequency"), &JsValue::from_f64(freq))?;
        }
        out.push(&obj);
    }
    Ok(out)
}

fn quantize(buffer: &PixelBuffer, max_colors: usize, seed: Option<u32>) -> Vec<PaletteEntry> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(u64::from(seed));
            quantize_dominant_colors_with_rng(buffer, max_colors, &mut rng)
        }
        None => quantize_dominant_colors(buffer, max_colors),
    }
}

/// Dominant colors of a canvas `ImageData` buffer.
#[wasm_bindgen(js_name = quantizeDominantColors)]
pub fn quantize_pixels(
    data: Vec<u8>,
    width: u32,
    height: u32,
    max_colors: usize,
    seed: Option<u32>,
) -> Result<Array, JsValue> {
    let buffer = PixelBuffer::from_rgba(width, height, data).map_err(to_js_error)?;
    entries_to_js(&quantize(&buffer, max_colors, seed))
}

/// Dominant colors of an encoded image file (PNG, JPEG, ...).
#[wasm_bindgen(js_name = extractDominantColors)]
pub fn extract_dominant_colors(
    input: Vec<u8>,
    max_colors: usize,
    seed: Option<u32>,
) -> Result<Array, JsValue> {
    let buffer = PixelBuffer::decode(&input).map_err(to_js_error)?;
    entries_to_js(&quantize(&buffer, max_colors, seed))
}

/// `null` when `base` is not a valid color.
#[wasm_bindgen(js_name = generateHarmoniousPalette)]
pub fn generate_harmonious_palette_js(base: &str, count: usize, scheme: &str) -> JsValue {
    match generate_harmonious_palette(base, count, SchemeType::from_name(scheme)) {
        Some(colors) => string_array(colors).into(),
        None => JsValue::NULL,
    }
}

#[wasm_bindgen(js_name = applyColorAdjustments)]
pub fn apply_color_adjustments_js(
    hex: &str,
    hue: i32,
    saturation: i32,
    brightness: i32,
    contrast: i32,
    temperature: i32,
    color_blind_mode: &str,
) -> Option<String> {
    let adjustments = AdjustmentParameters {
        hue,
        saturation,
        brightness,
        contrast,
        temperature,
    };
    let mode = color_blind_mode.parse().unwrap_or(ColorBlindMode::None);
    apply_color_adjustments(hex, &adjustments, mode)
}

#[wasm_bindgen(js_name = applyPreset)]
pub fn apply_preset(hex: &str, preset: &str, color_blind_mode: &str) -> Result<Option<String>, JsValue> {
    let preset: Preset = preset.parse().map_err(to_js_error)?;
    let current = color_blind_mode.parse().unwrap_or(ColorBlindMode::None);
    let session = preset.session(current);
    Ok(apply_color_adjustments(hex, &session.adjustments, session.color_blind_mode))
}

#[wasm_bindgen(js_name = simulateColorBlindness)]
pub fn simulate_color_blindness_js(hex: &str, mode: &str) -> Option<String> {
    crate::color_blind::simulate_color_blindness(hex, mode)
}

/// `{ score, type, avgHueDifference }`.
#[wasm_bindgen(js_name = analyzeHarmony)]
pub fn analyze_harmony_js(colors: Array) -> Result<Object, JsValue> {
    let colors = strings_from(&colors)?;
    let report = analyze_harmony(&colors);
    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("score"), &JsValue::from(report.score))?;
    Reflect::set(&result, &JsValue::from_str("type"), &JsValue::from_str(report.kind.as_str()))?;
    Reflect::set(
        &result,
        &JsValue::from_str("avgHueDifference"),
        &JsValue::from_f64(report.avg_hue_difference),
    )?;
    Ok(result)
}

#[wasm_bindgen(js_name = paletteTags)]
pub fn palette_tags_js(colors: Array) -> Result<Array, JsValue> {
    let colors = strings_from(&colors)?;
    Ok(string_array(palette_tags(&colors)))
}

#[wasm_bindgen(js_name = exportPalette)]
pub fn export_palette_js(colors: Array, format: &str) -> Result<String, JsValue> {
    let colors = strings_from(&colors)?;
    let format: ExportFormat = format.parse().map_err(to_js_error)?;
    Ok(export_palette(&colors, format))
}
