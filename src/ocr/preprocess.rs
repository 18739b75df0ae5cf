use image::{GrayImage, ImageBuffer, Luma};

use crate::config::RelativeRect;

/// Contrast factor applied before OCR (1.0 = unchanged).
const CONTRAST_FACTOR: f32 = 2.0;

/// 3×3 sharpening kernel, normalized by its sum (16).
const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-2, -2, -2], [-2, 32, -2], [-2, -2, -2]];

/// Grayscale contrast boost followed by a sharpen pass.
pub fn enhance_for_ocr(img: &GrayImage) -> GrayImage {
    sharpen(&stretch_contrast(img, CONTRAST_FACTOR))
}

/// Scales each pixel's distance from the mean gray level by `factor`.
pub fn stretch_contrast(img: &GrayImage, factor: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let pixel_count = (width as u64) * (height as u64);
    if pixel_count == 0 {
        return img.clone();
    }

    let sum: u64 = img.pixels().map(|p| p[0] as u64).sum();
    let mean = sum as f32 / pixel_count as f32;

    let mut output = ImageBuffer::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels() {
        let value = mean + (pixel[0] as f32 - mean) * factor;
        output.put_pixel(x, y, Luma([value.round().clamp(0.0, 255.0) as u8]));
    }
    output
}

/// Applies `SHARPEN_KERNEL`, repeating edge pixels at the borders.
pub fn sharpen(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = ImageBuffer::new(width, height);
    let kernel_sum: i32 = SHARPEN_KERNEL.iter().flatten().sum();

    for (x, y, _) in img.enumerate_pixels() {
        let mut acc = 0i32;
        for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
            for (kx, weight) in row.iter().enumerate() {
                let sx = (x as i64 + kx as i64 - 1).clamp(0, width as i64 - 1) as u32;
                let sy = (y as i64 + ky as i64 - 1).clamp(0, height as i64 - 1) as u32;
                acc += img.get_pixel(sx, sy)[0] as i32 * weight;
            }
        }
        let value = (acc as f32 / kernel_sum as f32).round().clamp(0.0, 255.0) as u8;
        output.put_pixel(x, y, Luma([value]));
    }
    output
}

/// Crops a sub-region from an image using relative coordinates.
///
/// Converts the relative rect (0.0–1.0) to absolute pixel coordinates,
/// clamps to image bounds, and returns the cropped sub-image.
pub fn crop_region(img: &GrayImage, region: &RelativeRect) -> GrayImage {
    let (w, h) = img.dimensions();

    let x0 = ((region.x.max(0.0) * w as f32) as u32).min(w);
    let y0 = ((region.y.max(0.0) * h as f32) as u32).min(h);
    let rw = ((region.width.max(0.0) * w as f32) as u32).min(w - x0);
    let rh = ((region.height.max(0.0) * h as f32) as u32).min(h - y0);

    image::imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}
