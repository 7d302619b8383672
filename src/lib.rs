//! Color engine behind the academic palette catalog.
//!
//! - [`quantize`]: dominant colors of a raster image via k-means.
//! - [`harmony`]: palettes derived from a seed color (analogous, triadic, ...).
//! - [`adjust`]: hue/saturation/brightness/contrast/temperature edits and
//!   color-blind previews.
//! - [`analyze`]: harmony score of an arbitrary palette.
//!
//! Every function is pure and reentrant. Randomness only enters through the
//! k-means seeding, which accepts any [`rand::Rng`].

pub mod adjust;
pub mod analyze;
pub mod color;
pub mod color_blind;
pub mod error;
pub mod export;
pub mod harmony;
pub mod quantize;
pub mod wasm;

mod domain_tests;

pub use adjust::{AdjustmentParameters, AdjustmentSession, Preset, adjust_color, apply_color_adjustments};
pub use analyze::{HarmonyReport, HarmonyType, analyze_harmony, palette_tags};
pub use color::{Color, Hsl};
pub use color_blind::{ColorBlindMode, simulate_color_blindness};
pub use error::{PaletteError, ParseColorError};
pub use export::{ExportFormat, export_palette};
pub use harmony::{SchemeType, generate_harmonious_palette};
pub use quantize::{
    PaletteEntry, PixelBuffer, QuantizeOptions, quantize_dominant_colors,
    quantize_dominant_colors_with_rng,
};

/// Decode `input` and return its dominant colors, most frequent first.
///
/// A `seed` makes the k-means initialization reproducible. Native only; the
/// browser hands over decoded `ImageData` through [`wasm`].
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_bytes(
    input: &[u8],
    max_colors: usize,
    seed: Option<u64>,
) -> Result<Vec<PaletteEntry>, PaletteError> {
    use rand::SeedableRng;

    let buffer = PixelBuffer::decode(input)?;
    Ok(match seed {
        Some(seed) => {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            quantize_dominant_colors_with_rng(&buffer, max_colors, &mut rng)
        }
        None => quantize_dominant_colors(&buffer, max_colors),
    })
}
