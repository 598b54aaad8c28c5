//! Feature extraction for raster images.

use std::fs;
use std::path::Path;

use image::{DynamicImage, RgbImage};

use crate::features::{Dimensions, FileFeatures};
use crate::visual::visual_hash;
use crate::{short_hash, UniversalError};

/// Reduce a raster image file to its feature record.
///
/// The image is decoded and converted to RGB so that palette or alpha
/// encodings of the same pixels land on the same features. The content hash
/// covers the size, mode, visual hash, color hash, and byte size, so a
/// lossless re-save with identical pixels but different bytes changes only
/// `file_size` — the perceptual and color features keep matching.
pub fn image_features(path: &Path) -> Result<FileFeatures, UniversalError> {
    let meta = fs::metadata(path)?;
    let decoded = image::open(path)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let visual = visual_hash(&DynamicImage::ImageRgb8(rgb.clone()));
    let histogram = rgb_histogram(&rgb);
    let color_hash = short_hash(serde_json::to_string(&histogram)?.as_bytes());

    let content_lines = [
        format!("size:{width}x{height}"),
        "mode:RGB".to_string(),
        format!("visual_hash:{visual}"),
        format!("color_hash:{color_hash}"),
        format!("file_size:{}", meta.len()),
    ];
    let content_hash = short_hash(content_lines.join("\n").as_bytes());

    let (creation_time, modification_time) = super::generic::file_times(&meta);

    let mut features = FileFeatures::bare("IMAGE", meta.len(), content_hash);
    features.visual_hash = Some(visual);
    features.color_profile_hash = Some(color_hash);
    features.dimensions = Some(Dimensions::of_pixels(width, height));
    features.creation_time = creation_time;
    features.modification_time = modification_time;
    Ok(features)
}

/// 768-bin histogram: 256 bins per RGB channel, concatenated.
fn rgb_histogram(rgb: &RgbImage) -> Vec<u32> {
    let mut bins = vec![0u32; 768];
    for pixel in rgb.pixels() {
        bins[pixel.0[0] as usize] += 1;
        bins[256 + pixel.0[1] as usize] += 1;
        bins[512 + pixel.0[2] as usize] += 1;
    }
    bins
}
