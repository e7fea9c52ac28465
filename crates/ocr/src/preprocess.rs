use std::io::Cursor;

use image::{imageops::FilterType, DynamicImage, GrayImage, Luma};
use imageproc::contrast::adaptive_threshold;
use imageproc::filter::median_filter;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use thiserror::Error;

/// Recognition engines work best with the longer side at most this.
const MAX_LONG_SIDE: u32 = 3000;
/// And the shorter side at least this.
const MIN_SHORT_SIDE: u32 = 300;
/// Tile grid for local contrast equalization.
const CONTRAST_GRID: u32 = 8;
/// Histogram clip factor, as a multiple of the uniform bin height.
const CONTRAST_CLIP: f32 = 2.0;
/// Skew below this is left alone — rotation blurs near-upright pages
/// for no gain.
const DESKEW_MIN_DEGREES: f32 = 0.5;
/// Beyond this the principal axis is not a text-line direction.
const DESKEW_MAX_DEGREES: f32 = 45.0;
/// Window radius for the local-mean binarization threshold.
const THRESHOLD_BLOCK_RADIUS: u32 = 11;
/// Pixels darker than this count as foreground ink.
const FOREGROUND_CUTOFF: u8 = 128;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Image has no pixels")]
    EmptyImage,
}

/// Normalize a document image for recognition: size into the engines'
/// operating range, grayscale, denoise, local contrast, deskew,
/// binarize. If anything fails the original image is returned instead
/// — recognition on a raw image beats no recognition at all.
pub fn preprocess(image: &DynamicImage) -> DynamicImage {
    match try_preprocess(image) {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::warn!("preprocessing failed, using original image: {e}");
            image.clone()
        }
    }
}

fn try_preprocess(image: &DynamicImage) -> Result<DynamicImage, PreprocessError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PreprocessError::EmptyImage);
    }

    let resized = resize_to_operating_range(image);
    let gray = resized.to_luma8();
    let denoised = median_filter(&gray, 1, 1);
    let enhanced = equalize_tiles(&denoised, CONTRAST_GRID, CONTRAST_CLIP);
    let upright = deskew(&enhanced);
    let binary = adaptive_threshold(&upright, THRESHOLD_BLOCK_RADIUS);
    Ok(DynamicImage::ImageLuma8(binary))
}

/// Encode as PNG bytes for byte-oriented engine backends.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Downscale when the longer side exceeds the maximum, upscale when
/// the shorter side is below the minimum, otherwise pass through.
fn resize_to_operating_range(image: &DynamicImage) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    let long = w.max(h);
    let short = w.min(h);

    if long > MAX_LONG_SIDE {
        image.resize(MAX_LONG_SIDE, MAX_LONG_SIDE, FilterType::Lanczos3)
    } else if short < MIN_SHORT_SIDE {
        let scale = MIN_SHORT_SIDE as f32 / short as f32;
        let nw = ((w as f32 * scale).round() as u32).max(1);
        let nh = ((h as f32 * scale).round() as u32).max(1);
        image.resize(nw, nh, FilterType::Lanczos3)
    } else {
        image.clone()
    }
}

/// Clip-limited histogram equalization applied per tile of a
/// `grid`×`grid` layout. Tiles are equalized independently, without
/// cross-tile interpolation.
fn equalize_tiles(image: &GrayImage, grid: u32, clip: f32) -> GrayImage {
    let (w, h) = image.dimensions();
    let tile_w = w.div_ceil(grid);
    let tile_h = h.div_ceil(grid);
    let mut out = image.clone();

    for ty in 0..grid {
        for tx in 0..grid {
            let x0 = tx * tile_w;
            let y0 = ty * tile_h;
            if x0 >= w || y0 >= h {
                continue;
            }
            let x1 = (x0 + tile_w).min(w);
            let y1 = (y0 + tile_h).min(h);
            equalize_region(image, &mut out, x0, y0, x1, y1, clip);
        }
    }

    out
}

fn equalize_region(
    src: &GrayImage,
    dst: &mut GrayImage,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
    clip: f32,
) {
    let area = ((x1 - x0) * (y1 - y0)) as f32;

    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[src.get_pixel(x, y)[0] as usize] += 1;
        }
    }

    // Clip tall bins and spread the excess uniformly — bounds the
    // contrast amplification in near-uniform regions.
    let limit = ((clip * area / 256.0).max(1.0)) as u32;
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let bump = excess / 256;
    for bin in hist.iter_mut() {
        *bin += bump;
    }

    let total: u32 = hist.iter().sum();
    if total == 0 {
        return;
    }

    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (value, bin) in hist.iter().enumerate() {
        cumulative += bin;
        lut[value] = ((cumulative as f32 / total as f32) * 255.0).round().min(255.0) as u8;
    }

    for y in y0..y1 {
        for x in x0..x1 {
            let v = src.get_pixel(x, y)[0];
            dst.put_pixel(x, y, Luma([lut[v as usize]]));
        }
    }
}

/// Rotate the page upright when the estimated skew is significant.
fn deskew(image: &GrayImage) -> GrayImage {
    match principal_axis_degrees(image) {
        Some(deg) if deg.abs() > DESKEW_MIN_DEGREES && deg.abs() <= DESKEW_MAX_DEGREES => {
            tracing::info!("deskewing by {deg:.2} degrees");
            rotate_about_center(image, -deg.to_radians(), Interpolation::Bilinear, Luma([255u8]))
        }
        _ => image.clone(),
    }
}

/// Orientation of the dominant text direction relative to horizontal,
/// from the second-order central moments of dark foreground pixels.
/// Returns `None` when there is too little ink to estimate from.
fn principal_axis_degrees(image: &GrayImage) -> Option<f32> {
    let mut count = 0u64;
    let (mut sum_x, mut sum_y) = (0.0f64, 0.0f64);
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[0] < FOREGROUND_CUTOFF {
            count += 1;
            sum_x += x as f64;
            sum_y += y as f64;
        }
    }
    if count < 64 {
        return None;
    }

    let mean_x = sum_x / count as f64;
    let mean_y = sum_y / count as f64;
    let (mut sxx, mut syy, mut sxy) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[0] < FOREGROUND_CUTOFF {
            let dx = x as f64 - mean_x;
            let dy = y as f64 - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
    }

    let angle = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    Some(angle.to_degrees() as f32)
}
