//! Color segmentation: blur, HSV conversion, and sensitivity-scaled
//! range thresholds producing the fire and smoke candidate masks.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::map::map_colors;

use crate::config::{DetectorConfig, HsvRange};

/// Scale a base HSV band by the current sensitivity.
///
/// Lower bound: `floor(s * min)` per channel. Upper bound:
/// `min(255, floor((2 - s) * max))` per channel.
///
/// The relationship is inverse to what the name suggests: at s = 1.0 the
/// band equals the base range, and *lowering* s pushes the lower bound
/// toward 0 and the upper bound toward 255, so the accepted band widens and
/// more pixels qualify. Raising the value narrows the band back down. This
/// direction is inherited behavior and is kept as-is rather than inverted.
pub fn scaled_range(base: HsvRange, sensitivity: f32) -> HsvRange {
    let mut min = [0u8; 3];
    let mut max = [0u8; 3];
    for c in 0..3 {
        min[c] = (sensitivity * base.min[c] as f32) as u8;
        max[c] = (((2.0 - sensitivity) * base.max[c] as f32) as i32).min(255) as u8;
    }
    HsvRange { min, max }
}

/// Convert one RGB pixel to HSV in the OpenCV 8-bit convention:
/// H in [0, 180], S and V in [0, 255].
pub fn rgb_to_hsv(rgb: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = rgb.0;
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v == 0 {
        0
    } else {
        ((delta as f32 * 255.0) / v as f32).round() as u8
    };

    let h = if delta == 0 {
        0.0
    } else {
        let delta = delta as f32;
        let mut degrees = if v == r {
            60.0 * (g as f32 - b as f32) / delta
        } else if v == g {
            120.0 + 60.0 * (b as f32 - r as f32) / delta
        } else {
            240.0 + 60.0 * (r as f32 - g as f32) / delta
        };
        if degrees < 0.0 {
            degrees += 360.0;
        }
        degrees / 2.0
    };

    Rgb([h.round() as u8, s, v])
}

/// Convert a frame to HSV. The result reuses the RGB container with
/// channels reinterpreted as (H, S, V).
pub fn to_hsv(rgb: &RgbImage) -> RgbImage {
    map_colors(rgb, rgb_to_hsv)
}

/// Binary mask of pixels inside the range on every channel (inclusive).
pub fn in_range(hsv: &RgbImage, range: HsvRange) -> GrayImage {
    map_colors(hsv, |p| {
        let inside = (0..3).all(|c| range.min[c] <= p.0[c] && p.0[c] <= range.max[c]);
        Luma([if inside { 255 } else { 0 }])
    })
}

/// Suppress sensor noise before thresholding.
pub fn blur(rgb: &RgbImage, sigma: f32) -> RgbImage {
    gaussian_blur_f32(rgb, sigma)
}

/// Run the full segmentation step: blur, convert to HSV, and threshold with
/// the sensitivity-scaled fire and smoke bands.
///
/// Returns `(fire_mask, smoke_mask)`, both binary (0 or 255).
pub fn segment(rgb: &RgbImage, config: &DetectorConfig, sensitivity: f32) -> (GrayImage, GrayImage) {
    let blurred = blur(rgb, config.blur_sigma);
    let hsv = to_hsv(&blurred);
    let fire = in_range(&hsv, scaled_range(config.fire_range, sensitivity));
    let smoke = in_range(&hsv, scaled_range(config.smoke_range, sensitivity));
    (fire, smoke)
}
