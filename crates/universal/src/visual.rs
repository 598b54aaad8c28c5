//! Perceptual mean-threshold visual hash.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

use crate::short_hash;

/// Edge length of the reduced thumbnail; the signature is `EDGE²` bits.
const EDGE: u32 = 32;

const HEX_DIGITS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
];

/// Compute the perceptual visual hash of an image.
///
/// 1. Convert to 8-bit grayscale.
/// 2. Center-pad to a square with white on the short axis, so aspect-ratio
///    differences between renderings collapse.
/// 3. Resize to 32×32 with Lanczos resampling.
/// 4. Threshold every pixel against the mean, yielding a 1024-bit string.
/// 5. Hex-encode the bit string (zero-padded to 256 characters) and hash it
///    with SHA-256; the first 16 hex characters are the visual hash.
///
/// Stable across PNG/JPEG re-encoding at comparable quality and small
/// resampling; not stable under cropping or rotation.
pub fn visual_hash(image: &DynamicImage) -> String {
    let gray = image.to_luma8();
    let square = pad_to_square(&gray);
    let thumb = imageops::resize(&square, EDGE, EDGE, FilterType::Lanczos3);

    let pixels: Vec<u8> = thumb.pixels().map(|p| p.0[0]).collect();
    let mean = pixels.iter().map(|&p| f64::from(p)).sum::<f64>() / pixels.len() as f64;

    let mut bit_hex = String::with_capacity(pixels.len() / 4);
    for nibble_pixels in pixels.chunks(4) {
        let mut nibble = 0usize;
        for (bit, &pixel) in nibble_pixels.iter().enumerate() {
            if f64::from(pixel) >= mean {
                nibble |= 1 << (3 - bit);
            }
        }
        bit_hex.push(HEX_DIGITS[nibble]);
    }

    short_hash(bit_hex.as_bytes())
}

fn pad_to_square(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width == height {
        return gray.clone();
    }
    let edge = width.max(height);
    let mut canvas = GrayImage::from_pixel(edge, edge, Luma([255u8]));
    let x = i64::from((edge - width) / 2);
    let y = i64::from((edge - height) / 2);
    imageops::replace(&mut canvas, gray, x, y);
    canvas
}
