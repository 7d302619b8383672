//! Dominant-color extraction by k-means over sampled image pixels.

use image::{DynamicImage, RgbaImage, imageops::FilterType};
use log::{debug, trace};
use rand::Rng;
use serde::Serialize;

use crate::color::Color;
use crate::error::PaletteError;

/// An RGBA8 image handed over by the host after decoding.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes (`width * height * 4` of them, row-major).
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PaletteError> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        RgbaImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .map(|image| PixelBuffer { image })
            .ok_or(PaletteError::BufferSize { expected, actual })
    }

    /// Decode any raster format the `image` crate understands.
    pub fn decode(bytes: &[u8]) -> Result<Self, PaletteError> {
        let img = image::load_from_memory(bytes)?;
        Ok(PixelBuffer::from(&img))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Nearest-neighbour down-scale so the longest side is at most `max_side`.
    fn downsampled(&self, max_side: u32) -> std::borrow::Cow<'_, RgbaImage> {
        let (w, h) = self.image.dimensions();
        let longest = w.max(h);
        if longest <= max_side || max_side == 0 {
            return std::borrow::Cow::Borrowed(&self.image);
        }
        let ratio = max_side as f32 / longest as f32;
        let down_w = ((w as f32) * ratio).round().max(1.0) as u32;
        let down_h = ((h as f32) * ratio).round().max(1.0) as u32;
        debug!("downsampling {w}x{h} to {down_w}x{down_h}");
        std::borrow::Cow::Owned(image::imageops::resize(
            &self.image,
            down_w,
            down_h,
            FilterType::Nearest,
        ))
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        PixelBuffer { image }
    }
}

impl From<&DynamicImage> for PixelBuffer {
    fn from(img: &DynamicImage) -> Self {
        PixelBuffer {
            image: img.to_rgba8(),
        }
    }
}

/// One color of an output palette.
///
/// `frequency` is the share of surviving samples in the color's cluster and is
/// only set by the quantizer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub hex: String,
    pub rgb: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

impl PaletteEntry {
    pub fn new(color: Color, frequency: Option<f64>) -> Self {
        PaletteEntry {
            hex: color.to_hex(),
            rgb: color.to_css_rgb(),
            frequency,
        }
    }
}

/// Tunables for [`quantize_with_options`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizeOptions {
    /// Longest side of the working image.
    pub working_size: u32,
    /// Take every `stride`-th pixel of the working image.
    pub stride: usize,
    /// Samples need alpha strictly above this.
    pub min_alpha: u8,
    /// Exclusive window for the mean of r, g and b.
    pub brightness_window: (u16, u16),
    pub max_iterations: usize,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        QuantizeOptions {
            working_size: 200,
            stride: 4,
            min_alpha: 128,
            brightness_window: (20, 235),
            max_iterations: 10,
        }
    }
}

impl QuantizeOptions {
    fn keeps(&self, [r, g, b, a]: [u8; 4]) -> bool {
        if a <= self.min_alpha {
            return false;
        }
        // (r + g + b) / 3 strictly inside the window, without the division.
        let sum = u16::from(r) + u16::from(g) + u16::from(b);
        let (low, high) = self.brightness_window;
        sum > low * 3 && sum < high * 3
    }

    /// Stride-sampled, filtered pixels of the working image.
    pub fn sample(&self, buffer: &PixelBuffer) -> Vec<Color> {
        let working = buffer.downsampled(self.working_size);
        working
            .pixels()
            .step_by(self.stride.max(1))
            .map(|p| p.0)
            .filter(|&px| self.keeps(px))
            .map(|[r, g, b, _]| Color::new(r, g, b))
            .collect()
    }
}

/// A k-means cluster; lives for one run only.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    pub center: Color,
    pub members: Vec<Color>,
}

/// Lloyd's k-means in RGB space with integer centroids.
#[derive(Clone, Copy, Debug)]
pub struct KMeans {
    pub max_iterations: usize,
}

impl Default for KMeans {
    fn default() -> Self {
        KMeans { max_iterations: 10 }
    }
}

impl KMeans {
    /// Seed `k` centroids uniformly at random (with replacement) from `samples`
    /// and cluster.
    pub fn run<R: Rng + ?Sized>(&self, samples: &[Color], k: usize, rng: &mut R) -> Vec<Cluster> {
        if samples.is_empty() || k == 0 {
            return Vec::new();
        }
        let centroids = (0..k)
            .map(|_| samples[rng.random_range(0..samples.len())])
            .collect();
        self.run_from(samples, centroids)
    }

    /// Cluster starting from the given centroids. Empty clusters are dropped
    /// from the result.
    pub fn run_from(&self, samples: &[Color], mut centroids: Vec<Color>) -> Vec<Cluster> {
        if centroids.is_empty() {
            return Vec::new();
        }
        let mut assignments = vec![0usize; samples.len()];

        for iteration in 0..self.max_iterations.max(1) {
            for (slot, &sample) in assignments.iter_mut().zip(samples) {
                *slot = nearest(&centroids, sample);
            }

            let mut sums = vec![[0u64; 3]; centroids.len()];
            let mut counts = vec![0u64; centroids.len()];
            for (&cluster, sample) in assignments.iter().zip(samples) {
                sums[cluster][0] += u64::from(sample.r);
                sums[cluster][1] += u64::from(sample.g);
                sums[cluster][2] += u64::from(sample.b);
                counts[cluster] += 1;
            }

            let mut changed = false;
            for ((centroid, sum), &count) in centroids.iter_mut().zip(&sums).zip(&counts) {
                if count == 0 {
                    continue;
                }
                let mean = |s: u64| (s as f64 / count as f64).round() as u8;
                let updated = Color::new(mean(sum[0]), mean(sum[1]), mean(sum[2]));
                if updated != *centroid {
                    *centroid = updated;
                    changed = true;
                }
            }
            trace!("k-means iteration {iteration}: changed={changed}");

            if !changed {
                debug!("k-means converged after {} iterations", iteration + 1);
                break;
            }
        }

        let mut clusters: Vec<Cluster> = centroids
            .into_iter()
            .map(|center| Cluster {
                center,
                members: Vec::new(),
            })
            .collect();
        for (&cluster, &sample) in assignments.iter().zip(samples) {
            clusters[cluster].members.push(sample);
        }
        clusters.retain(|c| !c.members.is_empty());
        clusters
    }
}

/// Index of the closest centroid; ties go to the lower index.
fn nearest(centroids: &[Color], sample: Color) -> usize {
    let mut best = 0;
    let mut best_dist = u32::MAX;
    for (idx, c) in centroids.iter().enumerate() {
        let d = c.distance_squared(sample);
        if d < best_dist {
            best_dist = d;
            best = idx;
        }
    }
    best
}

/// Dominant colors of `buffer`, most frequent first, using the thread RNG for
/// centroid seeding.
pub fn quantize_dominant_colors(buffer: &PixelBuffer, max_colors: usize) -> Vec<PaletteEntry> {
    quantize_with_options(buffer, max_colors, &QuantizeOptions::default(), &mut rand::rng())
}

pub fn quantize_dominant_colors_with_rng<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    max_colors: usize,
    rng: &mut R,
) -> Vec<PaletteEntry> {
    quantize_with_options(buffer, max_colors, &QuantizeOptions::default(), rng)
}

/// Quantize `buffer` into at most `max_colors` entries.
///
/// Steps performed:
/// 1. Down-scale so the longest side is at most `working_size`.
/// 2. Take every `stride`-th pixel, dropping translucent and near-black/near-white ones.
/// 3. Run k-means with `k = min(max_colors, samples)`.
/// 4. Emit one entry per non-empty cluster, sorted by descending frequency.
///
/// When nothing survives filtering a single black entry with frequency 1 is
/// returned. `max_colors == 0` is treated as 1.
pub fn quantize_with_options<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    max_colors: usize,
    options: &QuantizeOptions,
    rng: &mut R,
) -> Vec<PaletteEntry> {
    let samples = options.sample(buffer);
    debug!(
        "{} samples survived filtering from a {}x{} image",
        samples.len(),
        buffer.width(),
        buffer.height()
    );

    if samples.is_empty() {
        return vec![PaletteEntry::new(Color::BLACK, Some(1.0))];
    }

    let k = max_colors.max(1).min(samples.len());
    let kmeans = KMeans {
        max_iterations: options.max_iterations,
    };
    let clusters = kmeans.run(&samples, k, rng);
    debug!("{} of {k} clusters are non-empty", clusters.len());

    let total = samples.len() as f64;
    let mut entries: Vec<(Color, f64)> = clusters
        .iter()
        .map(|c| (c.center, c.members.len() as f64 / total))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
        .into_iter()
        .map(|(color, freq)| PaletteEntry::new(color, Some(freq)))
        .collect()
}

/// Average color of a `precision`-wide square at (`x`, `y`), clipped to the
/// image. A precision of 1 reads the single pixel.
pub fn pick_color(buffer: &PixelBuffer, x: u32, y: u32, precision: u32) -> Option<Color> {
    let (w, h) = buffer.image.dimensions();
    if x >= w || y >= h {
        return None;
    }
    let size = precision.max(1);
    if size == 1 {
        let [r, g, b, _] = buffer.image.get_pixel(x, y).0;
        return Some(Color::new(r, g, b));
    }

    let half = size / 2;
    let x0 = x.saturating_sub(half);
    let y0 = y.saturating_sub(half);
    let x1 = (x0 + size).min(w);
    let y1 = (y0 + size).min(h);

    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for py in y0..y1 {
        for px in x0..x1 {
            let [r, g, b, _] = buffer.image.get_pixel(px, py).0;
            sum[0] += u64::from(r);
            sum[1] += u64::from(g);
            sum[2] += u64::from(b);
            count += 1;
        }
    }
    let avg = |s: u64| s as f64 / count as f64;
    Some(Color::from_channels(avg(sum[0]), avg(sum[1]), avg(sum[2])))
}
