//! Headless demo: runs the detector over a synthetic flame-and-smoke
//! scene and prints one JSON report line per frame.

use pyrowatch::{
    DetectionReport, Detector, Frame, NoInput, PyroResult, Renderer, SyntheticScene,
    SyntheticSource, run,
};

/// Prints each tick's report as a JSON line instead of opening a viewer.
struct JsonLineRenderer;

impl Renderer for JsonLineRenderer {
    fn show(&mut self, _frame: &Frame, report: &DetectionReport) -> PyroResult<()> {
        let line = serde_json::to_string(report)
            .map_err(|e| pyrowatch::PyroError::Render(format!("serialize report: {e}")))?;
        println!("{line}");
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("pyrowatch synthetic demo: 60 frames, flame + drifting smoke blob");

    let mut source = SyntheticSource::new(320, 240, 60, SyntheticScene::FlameAndSmoke);
    let mut detector = Detector::default();
    let mut renderer = JsonLineRenderer;
    let mut input = NoInput;

    let stats = run(&mut source, &mut detector, &mut renderer, &mut input)?;

    eprintln!(
        "done: {} frames, {} fire regions, {} smoke regions in {:.2?}",
        stats.frames, stats.fire_regions, stats.smoke_regions, stats.elapsed
    );
    Ok(())
}
