//! Renderer collaborator: the system's only output channel.
//!
//! The contract per tick: show the frame with one rectangle per region in
//! its category color, a `"<Category> <area>px"` label just above each
//! rectangle, and a persistent readout of the current sensitivity. How
//! that is presented is the renderer's business; the pipeline never owns a
//! window.

use crate::detector::DetectionReport;
use crate::error::PyroResult;
use crate::frame::Frame;

/// Displays one annotated tick. Must not block the loop.
pub trait Renderer {
    fn show(&mut self, frame: &Frame, report: &DetectionReport) -> PyroResult<()>;
}

/// Discards everything. For headless runs and benchmarks.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn show(&mut self, _frame: &Frame, _report: &DetectionReport) -> PyroResult<()> {
        Ok(())
    }
}
