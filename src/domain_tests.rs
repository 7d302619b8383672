//! Cross-module properties of the color engine.
//!
//! Each test states what a failure would mean for the palette tool.

#[cfg(test)]
mod domain_tests {
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::adjust::{AdjustmentParameters, apply_color_adjustments};
    use crate::analyze::{HarmonyType, analyze_harmony};
    use crate::color::{Color, get_contrast_ratio, hex_to_hsl, hex_to_rgb, hsl_to_hex, rgb_to_hex};
    use crate::color_blind::ColorBlindMode;
    use crate::harmony::{SchemeType, generate_harmonious_palette};
    use crate::quantize::{
        KMeans, PixelBuffer, QuantizeOptions, quantize_dominant_colors_with_rng,
    };

    // ========================================================================
    // Conversions
    // ========================================================================

    /// If this breaks, hex strings stored by the host no longer map back to
    /// the channels they were made from.
    ///
    /// Channels are formatted independently, so every value of each channel
    /// is swept against a few fixed values of the other two.
    #[test]
    fn test_hex_round_trip_every_channel_value() {
        let round_trip = |c: Color| {
            let hex = rgb_to_hex(f64::from(c.r), f64::from(c.g), f64::from(c.b));
            assert_eq!(hex_to_rgb(&hex), Some(c), "{hex}");
        };
        for v in 0..=255u8 {
            for other in [0u8, 1, 127, 128, 254, 255] {
                round_trip(Color::new(v, other, other));
                round_trip(Color::new(other, v, other));
                round_trip(Color::new(other, other, v));
            }
        }
    }

    /// If this breaks, HSL edits with zero delta visibly shift colors.
    #[test]
    fn test_hsl_round_trip_within_one_unit() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        for _ in 0..5000 {
            let c = Color::new(rng.random(), rng.random(), rng.random());
            let hsl = hex_to_hsl(&c.to_hex()).unwrap();
            let back = hex_to_rgb(&hsl_to_hex(hsl.h, hsl.s, hsl.l)).unwrap();
            for (a, b) in [(c.r, back.r), (c.g, back.g), (c.b, back.b)] {
                assert!(a.abs_diff(b) <= 1, "{c} came back as {back}");
            }
        }
    }

    #[test]
    fn test_contrast_ratio_is_symmetric() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let a = Color::new(rng.random(), rng.random(), rng.random()).to_hex();
            let b = Color::new(rng.random(), rng.random(), rng.random()).to_hex();
            assert_eq!(get_contrast_ratio(&a, &b), get_contrast_ratio(&b, &a));
        }
    }

    // ========================================================================
    // Quantizer
    // ========================================================================

    /// 10x10, first 70 pixels red and last 30 blue.
    fn red_blue_image() -> PixelBuffer {
        let mut data = Vec::with_capacity(400);
        for i in 0..100 {
            let px = if i < 70 { [255, 0, 0, 255] } else { [0, 0, 255, 255] };
            data.extend_from_slice(&px);
        }
        PixelBuffer::from_rgba(10, 10, data).unwrap()
    }

    /// If this breaks, the clustering core no longer separates two flat
    /// colors when seeded with one of each.
    #[test]
    fn test_red_blue_scenario_from_fixed_seeds() {
        let samples = QuantizeOptions::default().sample(&red_blue_image());
        // Every 4th pixel: indices 0..=68 are red (18), 72..=96 blue (7).
        assert_eq!(samples.len(), 25);

        let red = Color::new(255, 0, 0);
        let blue = Color::new(0, 0, 255);
        let clusters = KMeans::default().run_from(&samples, vec![blue, red]);
        assert_eq!(clusters.len(), 2);
        let red_cluster = clusters.iter().find(|c| c.center == red).unwrap();
        let blue_cluster = clusters.iter().find(|c| c.center == blue).unwrap();
        assert_eq!(red_cluster.members.len(), 18);
        assert_eq!(blue_cluster.members.len(), 7);
    }

    /// If this breaks, random seeding produces palettes that are not the
    /// image's colors or are ordered wrongly.
    #[test]
    fn test_red_blue_scenario_across_seeds() {
        let image = red_blue_image();
        let mut two_color_runs = 0;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = quantize_dominant_colors_with_rng(&image, 2, &mut rng);
            assert!(!out.is_empty() && out.len() <= 2);
            if out.len() == 2 {
                two_color_runs += 1;
                assert_eq!(out[0].hex, "#FF0000");
                assert_eq!(out[1].hex, "#0000FF");
                let f0 = out[0].frequency.unwrap();
                let f1 = out[1].frequency.unwrap();
                assert!((f0 - 0.7).abs() < 0.05, "red frequency {f0}");
                assert!((f1 - 0.3).abs() < 0.05, "blue frequency {f1}");
            }
        }
        // Both seeds pick the same color 60% of the time; 64 tries never all do.
        assert!(two_color_runs > 0);
    }

    /// If this breaks, the UI can receive more swatches than it asked for
    /// or an empty list it cannot render.
    #[test]
    fn test_quantizer_output_bounds_and_frequency_sum() {
        let mut rng = StdRng::seed_from_u64(42);
        let (w, h) = (37u32, 23u32);
        let data: Vec<u8> = (0..w * h)
            .flat_map(|_| [rng.random(), rng.random(), rng.random(), 255u8])
            .collect();
        let image = PixelBuffer::from_rgba(w, h, data).unwrap();

        for k in [0usize, 1, 2, 5, 8, 16] {
            let out = quantize_dominant_colors_with_rng(&image, k, &mut rng);
            assert!(!out.is_empty());
            assert!(out.len() <= k.max(1), "k={k} gave {}", out.len());
            let sum: f64 = out.iter().filter_map(|e| e.frequency).sum();
            assert!((sum - 1.0).abs() < 1e-9, "k={k} sums to {sum}");
            assert!(out.windows(2).all(|w| w[0].frequency >= w[1].frequency));
        }
    }

    /// If this breaks, the CLI can no longer read image files.
    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_extract_from_encoded_png() {
        use std::io::Cursor;

        let img = image::RgbaImage::from_pixel(12, 12, image::Rgba([10, 120, 200, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let out = crate::extract_palette_bytes(&bytes, 3, Some(9)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].hex, "#0A78C8");
        assert_eq!(out[0].frequency, Some(1.0));

        let err = crate::extract_palette_bytes(b"not an image", 3, None).unwrap_err();
        assert!(matches!(err, crate::PaletteError::Decode(_)));
    }

    /// If this breaks, large photos cost proportionally more to quantize.
    #[test]
    fn test_large_images_are_downsampled() {
        let image = PixelBuffer::from_rgba(1000, 10, [90u8, 60, 30, 255].repeat(10_000)).unwrap();
        let samples = QuantizeOptions::default().sample(&image);
        assert_eq!(samples.len(), 200 * 2 / 4);
    }

    // ========================================================================
    // Generator, adjustments, analyzer
    // ========================================================================

    #[test]
    fn test_generated_palettes_are_deterministic() {
        for scheme in SchemeType::ALL {
            let a = generate_harmonious_palette("#2D5A27", 6, scheme);
            let b = generate_harmonious_palette("#2D5A27", 6, scheme);
            assert_eq!(a, b, "{scheme}");
        }
    }

    /// If this breaks, opening the adjustment panel alters the palette
    /// before the user touches a slider.
    #[test]
    fn test_zero_adjustment_is_identity() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..2000 {
            let hex = Color::new(rng.random(), rng.random(), rng.random()).to_hex();
            let out = apply_color_adjustments(
                &hex,
                &AdjustmentParameters::default(),
                ColorBlindMode::None,
            );
            assert_eq!(out.as_deref(), Some(hex.as_str()));
        }
    }

    /// Generated palettes should be recognized by the analyzer as the
    /// scheme they were built from.
    #[test]
    fn test_analyzer_recognizes_generated_schemes() {
        let triad = generate_harmonious_palette("#E74C3C", 3, SchemeType::Triadic).unwrap();
        assert_eq!(analyze_harmony(&triad).kind, HarmonyType::Triadic);

        let pair = generate_harmonious_palette("#E74C3C", 2, SchemeType::Complementary).unwrap();
        assert_eq!(analyze_harmony(&pair).kind, HarmonyType::Complementary);

        let mono = generate_harmonious_palette("#E74C3C", 5, SchemeType::Monochromatic).unwrap();
        assert_eq!(analyze_harmony(&mono).kind, HarmonyType::Analogous);
    }
}
