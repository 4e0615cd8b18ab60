//! Mask cleanup with a 5x5 all-ones structuring element.
//!
//! Fire masks get a closing (dilate then erode) so the flickering,
//! fragmented appearance of flame merges into single regions. Smoke masks
//! get an opening (erode then dilate) so speckle noise from stray bright
//! pixels drops out before motion gating.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};

/// Close gaps in a fire candidate mask.
///
/// Radius `k` under the L-infinity norm is the (2k+1)x(2k+1) all-ones
/// element, so the default radius 2 is the 5x5 square.
pub fn clean_fire_mask(mask: &GrayImage, radius: u8) -> GrayImage {
    close(mask, Norm::LInf, radius)
}

/// Remove speckle noise from a smoke candidate mask.
pub fn clean_smoke_mask(mask: &GrayImage, radius: u8) -> GrayImage {
    open(mask, Norm::LInf, radius)
}
