//! Burn detected regions into an RGB frame as hollow rectangles.
//!
//! Text (labels, sensitivity readout) is the renderer's concern; this
//! module only draws the boxes so that image-file renderers and demos get
//! a usable visual without a text stack.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::regions::Region;

/// Rectangle outline thickness in pixels.
const BOX_THICKNESS: u32 = 2;

/// Draw one hollow rectangle per region, in the region's category color.
pub fn draw_regions(canvas: &mut RgbImage, regions: &[Region]) {
    for region in regions {
        let color = Rgb(region.category.color());
        for inset in 0..BOX_THICKNESS {
            if region.width <= 2 * inset || region.height <= 2 * inset {
                break;
            }
            let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32)
                .of_size(region.width - 2 * inset, region.height - 2 * inset);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}

/// Copy the frame and draw the regions onto the copy.
pub fn annotated(frame: &RgbImage, regions: &[Region]) -> RgbImage {
    let mut canvas = frame.clone();
    draw_regions(&mut canvas, regions);
    canvas
}
