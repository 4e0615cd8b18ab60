//! Owned RGB frame passed through the pipeline, one per tick.

use std::time::Instant;

use image::RgbImage;

/// A single captured frame: interleaved RGB8.
///
/// Produced once per tick by a frame source and discarded at the end of the
/// tick. Only a grayscale copy of it may outlive the tick, inside the
/// motion history.
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
    pub frame_id: u32,
}

impl Frame {
    /// Create a black frame (640x480)
    pub fn dummy() -> Self {
        Frame {
            data: vec![0u8; 640 * 480 * 3],
            width: 640,
            height: 480,
            timestamp: Instant::now(),
            frame_id: 0,
        }
    }

    /// Create a frame with specific data and dimensions.
    ///
    /// # Panics
    /// Panics if `data.len() != width * height * 3`.
    pub fn new_with_data(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 3) as usize,
            "frame data length must be width * height * 3"
        );
        Frame {
            data,
            width,
            height,
            timestamp: Instant::now(),
            frame_id: 0,
        }
    }

    /// Create a frame filled with one color (useful for pipeline tests)
    pub fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Frame::new_with_data(width, height, data)
    }

    /// Create a test pattern frame (useful for testing visualization)
    pub fn test_pattern(width: u32, height: u32, pattern_type: TestPattern) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for i in 0..(width * height) as usize {
            let x = i % width as usize;
            let y = i / width as usize;
            let rgb: [u8; 3] = match pattern_type {
                TestPattern::Gradient => {
                    let v = ((x + y) % 256) as u8;
                    [v, v, v]
                }
                TestPattern::Checkerboard => {
                    if (x / 32 + y / 32) % 2 == 0 {
                        [255, 255, 255]
                    } else {
                        [0, 0, 0]
                    }
                }
                TestPattern::Noise => {
                    use std::collections::hash_map::DefaultHasher;
                    use std::hash::{Hash, Hasher};

                    let mut hasher = DefaultHasher::new();
                    i.hash(&mut hasher);
                    let h = hasher.finish();
                    [(h % 256) as u8, ((h >> 8) % 256) as u8, ((h >> 16) % 256) as u8]
                }
            };
            data.extend_from_slice(&rgb);
        }

        Frame {
            data,
            width,
            height,
            timestamp: Instant::now(),
            frame_id: 0,
        }
    }

    /// Set frame ID for tracking
    pub fn with_frame_id(mut self, frame_id: u32) -> Self {
        self.frame_id = frame_id;
        self
    }

    /// Copy the pixel data into an `image::RgbImage` for processing.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
            .expect("frame buffer length matches dimensions")
    }

    /// Wrap an `image::RgbImage` as a frame, consuming the buffer.
    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Frame {
            data: image.into_raw(),
            width,
            height,
            timestamp: Instant::now(),
            frame_id: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    Gradient,
    Checkerboard,
    Noise,
}
