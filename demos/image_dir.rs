//! Plays a directory of image files through the detector, in sorted
//! filename order, and prints a per-frame summary.
//!
//! Usage: `cargo run --example image_dir -- <dir>`

use pyrowatch::{
    DetectionReport, Detector, Frame, ImageDirSource, NoInput, PyroResult, Renderer, run,
};

struct SummaryRenderer;

impl Renderer for SummaryRenderer {
    fn show(&mut self, frame: &Frame, report: &DetectionReport) -> PyroResult<()> {
        println!(
            "frame {:4} ({}x{}): {} fire, {} smoke",
            report.frame_id,
            frame.width,
            frame.height,
            report.fire_regions().count(),
            report.smoke_regions().count()
        );
        for region in &report.regions {
            println!(
                "    {} at ({}, {}) {}x{}",
                region.label(),
                region.x,
                region.y,
                region.width,
                region.height
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::args()
        .nth(1)
        .ok_or("usage: image_dir <directory of frames>")?;

    let mut source = ImageDirSource::new(&dir)?;
    println!("playing {} frames from {dir}", source.len());

    let mut detector = Detector::default();
    let mut renderer = SummaryRenderer;
    let mut input = NoInput;

    let stats = run(&mut source, &mut detector, &mut renderer, &mut input)?;
    println!(
        "done: {} frames, {} fire regions, {} smoke regions",
        stats.frames, stats.fire_regions, stats.smoke_regions
    );
    Ok(())
}
