//! Temporal motion gate for smoke discrimination.
//!
//! Smoke shares its pale, desaturated color signature with walls, sky, and
//! paper, so color alone is not discriminative. The gate keeps a
//! fixed-depth FIFO of grayscale frames and, once the history is full,
//! intersects the smoke mask with the pixels that changed between the
//! oldest and newest frame. Fire masks are never gated.

use std::collections::VecDeque;

use image::{GrayImage, Luma};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::map::map_colors2;

/// Fixed-capacity grayscale history with oldest-vs-newest differencing.
///
/// Lifecycle is the program lifetime: the history only resets at
/// construction. For the first `capacity - 1` frames the gate is cold and
/// smoke masks pass through ungated; early smoke false positives during
/// that window are expected and accepted.
pub struct MotionGate {
    history: VecDeque<GrayImage>,
    capacity: usize,
    diff_threshold: u8,
}

impl MotionGate {
    /// # Panics
    /// Panics if `capacity < 2` (there would be nothing to difference).
    pub fn new(capacity: usize, diff_threshold: u8) -> Self {
        assert!(capacity >= 2, "motion history needs at least two frames");
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            diff_threshold,
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// True once the history holds `capacity` frames; motion comparison is
    /// only valid from that point on.
    pub fn is_full(&self) -> bool {
        self.history.len() == self.capacity
    }

    /// Push a grayscale copy of the current frame, evicting the oldest
    /// entry once at capacity.
    ///
    /// # Panics
    /// Panics if the frame dimensions differ from the frames already in the
    /// history; the frame source is assumed to deliver consistent frames.
    pub fn observe(&mut self, gray: &GrayImage) {
        if let Some(front) = self.history.front() {
            assert_eq!(
                front.dimensions(),
                gray.dimensions(),
                "motion history frames must share dimensions"
            );
        }
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(gray.clone());
    }

    /// Binary mask of pixels whose intensity changed by more than the
    /// threshold between the oldest and newest frame. `None` while cold.
    pub fn motion_mask(&self) -> Option<GrayImage> {
        if !self.is_full() {
            return None;
        }
        let oldest = self.history.front().expect("history is full");
        let newest = self.history.back().expect("history is full");
        let diff = map_colors2(oldest, newest, |a, b| Luma([a.0[0].abs_diff(b.0[0])]));
        Some(threshold(&diff, self.diff_threshold, ThresholdType::Binary))
    }

    /// Observe the current frame, then gate the smoke mask: once the
    /// history is full only moving pixels survive; before that the mask is
    /// returned untouched.
    pub fn apply(&mut self, gray: &GrayImage, smoke_mask: GrayImage) -> GrayImage {
        self.observe(gray);
        match self.motion_mask() {
            Some(motion) => map_colors2(&smoke_mask, &motion, |s, m| Luma([s.0[0] & m.0[0]])),
            None => smoke_mask,
        }
    }

    /// Oldest frame in the history, if any. Exposed for inspection.
    pub fn oldest(&self) -> Option<&GrayImage> {
        self.history.front()
    }

    /// Newest frame in the history, if any.
    pub fn newest(&self) -> Option<&GrayImage> {
        self.history.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_gray(value: u8) -> GrayImage {
        GrayImage::from_pixel(16, 16, Luma([value]))
    }

    #[test]
    fn history_is_fifo_with_bounded_length() {
        let mut gate = MotionGate::new(10, 25);
        for i in 0..15u8 {
            gate.observe(&uniform_gray(i * 10));
        }
        assert_eq!(gate.len(), 10);
        // Frames 0..5 were evicted; the oldest survivor is frame 5.
        assert_eq!(gate.oldest().unwrap().get_pixel(0, 0).0, [50]);
        assert_eq!(gate.newest().unwrap().get_pixel(0, 0).0, [140]);
    }

    #[test]
    fn cold_gate_passes_mask_through() {
        let mut gate = MotionGate::new(10, 25);
        let mask = uniform_gray(255);
        for _ in 0..9 {
            let gated = gate.apply(&uniform_gray(0), mask.clone());
            assert_eq!(gated, mask, "mask must be ungated while the history fills");
        }
        assert!(!gate.is_full());
    }

    #[test]
    fn full_gate_blanks_static_scenes() {
        let mut gate = MotionGate::new(10, 25);
        let mask = uniform_gray(255);
        let mut last = mask.clone();
        for _ in 0..12 {
            last = gate.apply(&uniform_gray(80), mask.clone());
        }
        assert!(gate.is_full());
        assert!(last.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn full_gate_keeps_moving_pixels() {
        let mut gate = MotionGate::new(10, 25);
        let mask = uniform_gray(255);
        // Brightness ramps 20 per frame, so the oldest-vs-newest difference
        // exceeds the threshold everywhere once the history is full.
        let mut last = mask.clone();
        for i in 0..10u8 {
            last = gate.apply(&uniform_gray(i * 20), mask.clone());
        }
        assert!(gate.is_full());
        assert!(last.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn gated_mask_is_subset_of_input() {
        let mut gate = MotionGate::new(10, 25);
        let mut mask = GrayImage::new(16, 16);
        for y in 0..8 {
            for x in 0..8 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
        let mut last = mask.clone();
        for i in 0..11u8 {
            last = gate.apply(&uniform_gray((i as u16 * 30).min(255) as u8), mask.clone());
        }
        for (p, q) in last.pixels().zip(mask.pixels()) {
            assert!(p.0[0] <= q.0[0]);
        }
    }

    #[test]
    fn small_changes_stay_below_threshold() {
        let mut gate = MotionGate::new(2, 25);
        let mask = uniform_gray(255);
        gate.apply(&uniform_gray(100), mask.clone());
        // A difference of exactly 25 does not count as motion.
        let gated = gate.apply(&uniform_gray(125), mask.clone());
        assert!(gated.pixels().all(|p| p.0[0] == 0));

        let mut gate = MotionGate::new(2, 25);
        gate.apply(&uniform_gray(100), mask.clone());
        let gated = gate.apply(&uniform_gray(126), mask);
        assert!(gated.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    #[should_panic(expected = "share dimensions")]
    fn mismatched_dimensions_are_fatal() {
        let mut gate = MotionGate::new(10, 25);
        gate.observe(&GrayImage::new(16, 16));
        gate.observe(&GrayImage::new(8, 8));
    }
}
