//! Live demo: streams the synthetic flame-and-smoke scene to a Rerun
//! viewer. Type `q`, `+` or `-` followed by Enter to quit or adjust
//! sensitivity while it runs.

use pyrowatch::{
    Detector, RerunRenderer, RerunRendererConfig, StdinInput, SyntheticScene, SyntheticSource, run,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("pyrowatch rerun demo");
    println!("Open the served web viewer (or a native viewer) to see the feed.");
    println!("Keys (press Enter after each): q = quit, + = raise sensitivity, - = lower it");

    let mut source = SyntheticSource::new(320, 240, 10_000, SyntheticScene::FlameAndSmoke);
    let mut detector = Detector::default();
    let mut renderer = RerunRenderer::new(RerunRendererConfig::default())?;
    let mut input = StdinInput::new();

    let stats = run(&mut source, &mut detector, &mut renderer, &mut input)?;

    println!(
        "done ({:?}): {} frames, {} fire regions, {} smoke regions",
        stats.stop_reason, stats.frames, stats.fire_regions, stats.smoke_regions
    );
    Ok(())
}
