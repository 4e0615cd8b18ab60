//! Tunable constants for the detection pipeline.
//!
//! Everything here is a compile-time default: the pipeline exposes no CLI
//! flags and reads no config file. `DetectorConfig::default()` is the
//! canonical parameter set; tests and demos construct variants directly.

use serde::{Deserialize, Serialize};

/// Fire HSV lower bound (H, S, V), OpenCV convention: H in [0, 180].
pub const FIRE_HSV_MIN: [u8; 3] = [0, 100, 100];
/// Fire HSV upper bound.
pub const FIRE_HSV_MAX: [u8; 3] = [20, 255, 255];
/// Smoke HSV lower bound (pale, desaturated, bright).
pub const SMOKE_HSV_MIN: [u8; 3] = [0, 0, 200];
/// Smoke HSV upper bound.
pub const SMOKE_HSV_MAX: [u8; 3] = [180, 50, 255];

/// Gaussian blur kernel size applied before segmentation.
pub const BLUR_KERNEL_SIZE: u32 = 11;

/// Sigma derived from the kernel size: 0.3 * ((k - 1) / 2 - 1) + 0.8.
/// For an 11x11 kernel this is exactly 2.0.
pub const BLUR_SIGMA: f32 = 0.3 * ((BLUR_KERNEL_SIZE as f32 - 1.0) * 0.5 - 1.0) + 0.8;

/// Radius of the square structuring element for morphology.
/// Radius 2 under the L-infinity norm is the 5x5 all-ones element.
pub const MORPH_RADIUS: u8 = 2;

/// Minimum enclosed contour area (pixels) for a region to be reported.
/// Fixed, never rescaled by sensitivity.
pub const MIN_REGION_AREA: f32 = 500.0;

/// Number of grayscale frames the motion history holds.
pub const MOTION_HISTORY_LEN: usize = 10;

/// Per-pixel absolute-difference threshold for the motion mask.
pub const MOTION_DIFF_THRESHOLD: u8 = 25;

/// An inclusive HSV range, OpenCV convention (H in [0, 180], S/V in [0, 255]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub min: [u8; 3],
    pub max: [u8; 3],
}

impl HsvRange {
    pub const fn new(min: [u8; 3], max: [u8; 3]) -> Self {
        Self { min, max }
    }
}

/// Parameters of the per-frame detection pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Base fire color band, before sensitivity scaling.
    pub fire_range: HsvRange,
    /// Base smoke color band, before sensitivity scaling.
    pub smoke_range: HsvRange,
    /// Sigma of the pre-segmentation Gaussian blur.
    pub blur_sigma: f32,
    /// Structuring-element radius for mask cleanup.
    pub morph_radius: u8,
    /// Contours with enclosed area at or below this are discarded.
    pub min_region_area: f32,
    /// Depth of the grayscale motion history.
    pub motion_history_len: usize,
    /// Binarization threshold for the oldest-to-newest frame difference.
    pub motion_diff_threshold: u8,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            fire_range: HsvRange::new(FIRE_HSV_MIN, FIRE_HSV_MAX),
            smoke_range: HsvRange::new(SMOKE_HSV_MIN, SMOKE_HSV_MAX),
            blur_sigma: BLUR_SIGMA,
            morph_radius: MORPH_RADIUS,
            min_region_area: MIN_REGION_AREA,
            motion_history_len: MOTION_HISTORY_LEN,
            motion_diff_threshold: MOTION_DIFF_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_sigma_matches_kernel_derivation() {
        // 0.3 * ((11 - 1) * 0.5 - 1) + 0.8 = 2.0
        assert!((BLUR_SIGMA - 2.0).abs() < 1e-6);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = DetectorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: DetectorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
