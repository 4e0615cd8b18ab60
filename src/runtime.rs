//! The tick loop: acquire, detect, render, poll input, strictly in that
//! order, one frame at a time, on one thread.

use std::time::{Duration, Instant};

use crate::detector::Detector;
use crate::error::PyroResult;
use crate::input::{Command, InputSource};
use crate::render::Renderer;
use crate::source::FrameSource;

/// Bounded wait for the per-tick input poll.
pub const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Interval between periodic processing stats on stderr.
const STATS_INTERVAL: Duration = Duration::from_secs(2);

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The frame source reported end of stream.
    EndOfStream,
    /// The operator pressed quit.
    Quit,
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub frames: u64,
    pub fire_regions: u64,
    pub smoke_regions: u64,
    pub stop_reason: StopReason,
    pub elapsed: Duration,
}

/// Run the detection loop until end of stream or quit.
///
/// Each tick: acquire a frame (blocking on the source), run the detector,
/// hand the frame and report to the renderer, then consume at most one
/// input command. Quit is cooperative: the current tick always completes.
/// A renderer failure stops the loop and is returned to the caller.
pub fn run(
    source: &mut dyn FrameSource,
    detector: &mut Detector,
    renderer: &mut dyn Renderer,
    input: &mut dyn InputSource,
) -> PyroResult<RunStats> {
    let started = Instant::now();
    let mut last_stats = started;
    let mut stats = RunStats {
        frames: 0,
        fire_regions: 0,
        smoke_regions: 0,
        stop_reason: StopReason::EndOfStream,
        elapsed: Duration::ZERO,
    };

    loop {
        let Some(frame) = source.next_frame() else {
            eprintln!("pyrowatch: end of stream after {} frames", stats.frames);
            break;
        };

        let report = detector.process(&frame);
        stats.frames += 1;
        stats.fire_regions += report.fire_regions().count() as u64;
        stats.smoke_regions += report.smoke_regions().count() as u64;

        renderer.show(&frame, &report)?;

        if last_stats.elapsed() >= STATS_INTERVAL {
            eprintln!(
                "pyrowatch: stats: frames={} fire={} smoke={} sensitivity={:.1} gate_ready={}",
                stats.frames,
                stats.fire_regions,
                stats.smoke_regions,
                detector.sensitivity(),
                detector.motion_gate_ready()
            );
            last_stats = Instant::now();
        }

        match input.poll(INPUT_POLL_TIMEOUT) {
            Some(Command::Quit) => {
                eprintln!("pyrowatch: quit requested");
                stats.stop_reason = StopReason::Quit;
                break;
            }
            Some(Command::SensitivityUp) => {
                detector.increment_sensitivity();
                eprintln!("pyrowatch: sensitivity -> {:.1}", detector.sensitivity());
            }
            Some(Command::SensitivityDown) => {
                detector.decrement_sensitivity();
                eprintln!("pyrowatch: sensitivity -> {:.1}", detector.sensitivity());
            }
            None => {}
        }
    }

    stats.elapsed = started.elapsed();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::DetectionReport;
    use crate::frame::{Frame, TestPattern};
    use crate::input::ScriptedInput;
    use crate::render::{NullRenderer, Renderer};
    use crate::source::{FrameSource, SyntheticScene, SyntheticSource};

    struct CountingRenderer {
        shown: u32,
    }

    impl Renderer for CountingRenderer {
        fn show(&mut self, _frame: &Frame, _report: &DetectionReport) -> PyroResult<()> {
            self.shown += 1;
            Ok(())
        }
    }

    #[test]
    fn loop_ends_at_end_of_stream() {
        let mut source =
            SyntheticSource::new(48, 48, 5, SyntheticScene::Pattern(TestPattern::Gradient));
        let mut detector = Detector::default();
        let mut renderer = CountingRenderer { shown: 0 };
        let mut input = ScriptedInput::new(vec![]);

        let stats = run(&mut source, &mut detector, &mut renderer, &mut input).unwrap();
        assert_eq!(stats.frames, 5);
        assert_eq!(renderer.shown, 5);
        assert_eq!(stats.stop_reason, StopReason::EndOfStream);
    }

    #[test]
    fn quit_is_cooperative_and_immediate_after_the_tick() {
        let mut source =
            SyntheticSource::new(48, 48, 100, SyntheticScene::Pattern(TestPattern::Gradient));
        let mut detector = Detector::default();
        let mut renderer = NullRenderer;
        let mut input = ScriptedInput::new(vec![None, None, Some(Command::Quit)]);

        let stats = run(&mut source, &mut detector, &mut renderer, &mut input).unwrap();
        assert_eq!(stats.frames, 3, "the quit tick itself completes");
        assert_eq!(stats.stop_reason, StopReason::Quit);
    }

    #[test]
    fn sensitivity_commands_reach_the_detector() {
        let mut source =
            SyntheticSource::new(48, 48, 4, SyntheticScene::Pattern(TestPattern::Gradient));
        let mut detector = Detector::default();
        let mut renderer = NullRenderer;
        let mut input = ScriptedInput::new(vec![
            Some(Command::SensitivityDown),
            Some(Command::SensitivityDown),
            Some(Command::SensitivityUp),
        ]);

        run(&mut source, &mut detector, &mut renderer, &mut input).unwrap();
        assert!((detector.sensitivity() - 0.9).abs() < 1e-6);
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn show(&mut self, _frame: &Frame, _report: &DetectionReport) -> PyroResult<()> {
            Err(crate::error::PyroError::Render("display gone".into()))
        }
    }

    struct EmptySource;

    impl FrameSource for EmptySource {
        fn next_frame(&mut self) -> Option<Frame> {
            None
        }
    }

    #[test]
    fn renderer_failure_stops_the_loop_with_the_error() {
        let mut source =
            SyntheticSource::new(48, 48, 10, SyntheticScene::Pattern(TestPattern::Gradient));
        let mut detector = Detector::default();
        let mut renderer = FailingRenderer;
        let mut input = ScriptedInput::new(vec![]);

        let err = run(&mut source, &mut detector, &mut renderer, &mut input).unwrap_err();
        assert!(err.to_string().contains("display gone"));
    }

    #[test]
    fn immediate_end_of_stream_is_a_clean_run() {
        let mut source = EmptySource;
        let mut detector = Detector::default();
        let mut renderer = NullRenderer;
        let mut input = ScriptedInput::new(vec![]);

        let stats = run(&mut source, &mut detector, &mut renderer, &mut input).unwrap();
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.stop_reason, StopReason::EndOfStream);
    }
}
