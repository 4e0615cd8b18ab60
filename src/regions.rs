//! Region extraction: contours of a filtered mask become labeled,
//! area-filtered bounding boxes.

use std::fmt;

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;
use serde::{Deserialize, Serialize};

/// What a region is believed to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Fire,
    Smoke,
}

impl Category {
    /// Overlay color for this category: fire pure red, smoke light gray.
    pub fn color(self) -> [u8; 3] {
        match self {
            Category::Fire => [255, 0, 0],
            Category::Smoke => [200, 200, 200],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Fire => write!(f, "Fire"),
            Category::Smoke => write!(f, "Smoke"),
        }
    }
}

/// A detected candidate region, alive for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Enclosed contour area in pixels (Green's formula over the outer
    /// border, the same quantity OpenCV's `contourArea` reports).
    pub area: f32,
    pub category: Category,
}

impl Region {
    /// Overlay label, e.g. `"Fire 1234px"`.
    pub fn label(&self) -> String {
        format!("{} {:.0}px", self.category, self.area)
    }
}

/// Enclosed area of a closed contour polygon via the shoelace formula.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = &points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice_area.abs() as f64) / 2.0
}

/// Trace external contours of a binary mask and emit one region per
/// contour whose enclosed area exceeds `min_area`.
///
/// Hole borders are ignored; the emission order is the contour discovery
/// order and carries no meaning.
pub fn extract_regions(mask: &GrayImage, category: Category, min_area: f32) -> Vec<Region> {
    find_contours::<i32>(mask)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| {
            let area = contour_area(&contour.points) as f32;
            if area <= min_area {
                return None;
            }
            let min_x = contour.points.iter().map(|p| p.x).min()?;
            let max_x = contour.points.iter().map(|p| p.x).max()?;
            let min_y = contour.points.iter().map(|p| p.y).min()?;
            let max_y = contour.points.iter().map(|p| p.y).max()?;
            Some(Region {
                x: min_x as u32,
                y: min_y as u32,
                width: (max_x - min_x + 1) as u32,
                height: (max_y - min_y + 1) as u32,
                area,
                category,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn mask_with_rect(width: u32, height: u32, x0: u32, y0: u32, w: u32, h: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        mask
    }

    #[test]
    fn shoelace_of_unit_square() {
        let square = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(contour_area(&square), 100.0);
    }

    #[test]
    fn empty_mask_yields_no_regions() {
        let mask = GrayImage::new(64, 64);
        assert!(extract_regions(&mask, Category::Fire, 500.0).is_empty());
    }

    #[test]
    fn area_exactly_500_is_discarded() {
        // A filled 21x26 rectangle encloses a 20x25 border polygon: area 500.
        let mask = mask_with_rect(64, 64, 5, 5, 21, 26);
        let regions = extract_regions(&mask, Category::Fire, 500.0);
        assert!(regions.is_empty());
    }

    #[test]
    fn area_501_is_emitted_with_matching_bbox() {
        // A filled 4x168 rectangle encloses a 3x167 border polygon: area 501.
        let mask = mask_with_rect(16, 200, 2, 3, 4, 168);
        let regions = extract_regions(&mask, Category::Smoke, 500.0);
        assert_eq!(regions.len(), 1);
        let r = &regions[0];
        assert_eq!((r.x, r.y, r.width, r.height), (2, 3, 4, 168));
        assert_eq!(r.area, 501.0);
        assert_eq!(r.category, Category::Smoke);
        assert_eq!(r.label(), "Smoke 501px");
    }

    #[test]
    fn hole_borders_are_ignored() {
        // A 30x30 block with a 10x10 hole: one outer region, the hole's
        // border must not become a second one.
        let mut mask = mask_with_rect(64, 64, 10, 10, 30, 30);
        for y in 20..30 {
            for x in 20..30 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        let regions = extract_regions(&mask, Category::Fire, 500.0);
        assert_eq!(regions.len(), 1);
        assert_eq!(
            (regions[0].x, regions[0].y, regions[0].width, regions[0].height),
            (10, 10, 30, 30)
        );
    }

    #[test]
    fn separate_blobs_emit_separate_regions() {
        let mut mask = mask_with_rect(128, 128, 4, 4, 30, 30);
        for y in 60..100 {
            for x in 60..100 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let mut regions = extract_regions(&mask, Category::Fire, 500.0);
        regions.sort_by_key(|r| r.x);
        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].x, regions[0].y), (4, 4));
        assert_eq!((regions[1].x, regions[1].y), (60, 60));
    }
}
