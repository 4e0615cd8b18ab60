//! Frame sources: where ticks get their frames from.
//!
//! The pipeline only ever sees the `FrameSource` trait. A real camera
//! backend plugs in the same way the built-in sources do; the crate ships
//! a synthetic generator for demos/tests and a directory player for
//! pre-recorded sequences.

use std::path::{Path, PathBuf};

use crate::error::{PyroError, PyroResult};
use crate::frame::{Frame, TestPattern};

/// Supplies one frame per tick. `None` means end of stream and terminates
/// the run loop; there is no retry.
pub trait FrameSource {
    fn next_frame(&mut self) -> Option<Frame>;
}

/// What the synthetic source should render.
#[derive(Debug, Clone, Copy)]
pub enum SyntheticScene {
    /// A static test pattern.
    Pattern(TestPattern),
    /// A flickering flame-colored blob plus a drifting pale blob, so both
    /// detection paths (and the motion gate) have something to chew on.
    FlameAndSmoke,
}

/// Deterministic frame generator for demos and tests.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    remaining: u32,
    next_id: u32,
    scene: SyntheticScene,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, frames: u32, scene: SyntheticScene) -> Self {
        Self {
            width,
            height,
            remaining: frames,
            next_id: 0,
            scene,
        }
    }

    fn render(&self, frame_id: u32) -> Frame {
        match self.scene {
            SyntheticScene::Pattern(pattern) => {
                Frame::test_pattern(self.width, self.height, pattern)
            }
            SyntheticScene::FlameAndSmoke => self.render_flame_and_smoke(frame_id),
        }
    }

    fn render_flame_and_smoke(&self, frame_id: u32) -> Frame {
        let (w, h) = (self.width, self.height);
        // Flame: fixed anchor, radius flickering between 18 and 25 px.
        let flicker = 18 + (frame_id * 7) % 8;
        let (fx, fy) = (w / 4, h / 2);
        // Smoke: pale disc drifting right, wrapping around.
        let (sx, sy) = ((w / 2 + frame_id * 3) % w, h / 3);
        let smoke_r = 22u32;

        let mut data = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                let in_flame = x.abs_diff(fx).pow(2) + y.abs_diff(fy).pow(2) <= flicker.pow(2);
                let in_smoke = x.abs_diff(sx).pow(2) + y.abs_diff(sy).pow(2) <= smoke_r.pow(2);
                let rgb: [u8; 3] = if in_flame {
                    [255, 90, 0]
                } else if in_smoke {
                    [225, 225, 225]
                } else {
                    [20, 24, 28]
                };
                data.extend_from_slice(&rgb);
            }
        }
        Frame::new_with_data(w, h, data)
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Option<Frame> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let frame_id = self.next_id;
        self.next_id += 1;
        Some(self.render(frame_id).with_frame_id(frame_id))
    }
}

/// Plays every decodable image in a directory, in sorted filename order.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next_index: usize,
}

impl ImageDirSource {
    pub fn new(dir: impl AsRef<Path>) -> PyroResult<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(PyroError::FrameSource(format!(
                "no frames found in {}",
                dir.display()
            )));
        }
        Ok(Self {
            paths,
            next_index: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Option<Frame> {
        let path = self.paths.get(self.next_index)?;
        let frame_id = self.next_index as u32;
        self.next_index += 1;
        match image::open(path) {
            Ok(img) => Some(Frame::from_rgb_image(img.to_rgb8()).with_frame_id(frame_id)),
            Err(e) => {
                // A broken frame ends the stream; the loop exits cleanly.
                eprintln!("source: failed to decode {}: {e}", path.display());
                None
            }
        }
    }
}
