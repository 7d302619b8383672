use std::fs;
use std::path::PathBuf;

use academic_palette_wasm::adjust::AdjustmentSession;
use academic_palette_wasm::harmony::generate_from_color;
use academic_palette_wasm::{
    Color, ColorBlindMode, ExportFormat, Preset, SchemeType, adjust_color, analyze_harmony,
    export_palette, extract_palette_bytes, palette_tags,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, info};
use serde_json::json;

/// Extract, generate and adjust color palettes for figures.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dominant colors of one or more images
    Extract {
        /// One or more input image paths
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Maximum number of colors per image
        #[arg(short = 'k', long, default_value_t = 8)]
        max_colors: usize,

        /// Seed for reproducible clustering
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Palette derived from a base color
    Harmony {
        base: Color,

        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// analogous, complementary, triadic, tetradic, monochromatic,
        /// split-complementary or even
        #[arg(short, long, default_value = "analogous")]
        scheme: SchemeType,
    },

    /// Run colors through the adjustment pipeline
    Adjust {
        #[arg(required = true)]
        colors: Vec<Color>,

        /// Start from a named preset (vivid, soft, warm, cool, reset)
        #[arg(short, long, conflicts_with = "adjustments")]
        preset: Option<Preset>,

        /// Start from a saved adjustment session (JSON)
        #[arg(short, long)]
        adjustments: Option<PathBuf>,

        #[arg(long, allow_negative_numbers = true)]
        hue: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        saturation: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        contrast: Option<i32>,

        #[arg(long, allow_negative_numbers = true)]
        temperature: Option<i32>,

        #[arg(long)]
        color_blind: Option<ColorBlindMode>,
    },

    /// Harmony score and tags of a palette
    Analyze {
        #[arg(required = true)]
        colors: Vec<Color>,
    },

    /// Print a palette as json, css, scss or adobe text
    Export {
        #[arg(required = true)]
        colors: Vec<Color>,

        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
    },
}

fn hex_list(colors: &[Color]) -> Vec<String> {
    colors.iter().map(|c| c.to_hex()).collect()
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match args.command {
        Command::Extract {
            inputs,
            max_colors,
            seed,
        } => {
            let mut results = Vec::with_capacity(inputs.len());
            for input in &inputs {
                let bytes = fs::read(input)
                    .with_context(|| format!("reading {}", input.display()))?;
                let entries = extract_palette_bytes(&bytes, max_colors, seed)
                    .with_context(|| format!("extracting colors from {}", input.display()))?;
                info!("{}: {} colors", input.display(), entries.len());
                results.push(json!({ "file": input, "colors": entries }));
            }
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Harmony {
            base,
            count,
            scheme,
        } => {
            let palette = generate_from_color(base, count, scheme);
            println!("{}", serde_json::to_string_pretty(&palette)?);
        }
        Command::Adjust {
            colors,
            preset,
            adjustments,
            hue,
            saturation,
            brightness,
            contrast,
            temperature,
            color_blind,
        } => {
            let mut session = match (&adjustments, preset) {
                (Some(path), _) => {
                    let text = fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str::<AdjustmentSession>(&text)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                (None, Some(preset)) => preset.session(ColorBlindMode::None),
                (None, None) => AdjustmentSession::default(),
            };
            let adj = &mut session.adjustments;
            adj.hue = hue.unwrap_or(adj.hue);
            adj.saturation = saturation.unwrap_or(adj.saturation);
            adj.brightness = brightness.unwrap_or(adj.brightness);
            adj.contrast = contrast.unwrap_or(adj.contrast);
            adj.temperature = temperature.unwrap_or(adj.temperature);
            if let Some(mode) = color_blind {
                session.color_blind_mode = mode;
            }
            info!("adjusting with {session:?}");

            let adjusted: Vec<Color> = colors
                .iter()
                .map(|&c| adjust_color(c, &session.adjustments, session.color_blind_mode))
                .collect();
            println!("{}", serde_json::to_string_pretty(&hex_list(&adjusted))?);
        }
        Command::Analyze { colors } => {
            let hexes = hex_list(&colors);
            let report = json!({
                "harmony": analyze_harmony(&hexes),
                "tags": palette_tags(&hexes),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Export { colors, format } => {
            println!("{}", export_palette(&hex_list(&colors), format));
        }
    }

    Ok(())
}
