//! Integration tests driving the full tick pipeline with scripted face signals.

use follow_eyes::{
    build_frame, Animator, BehaviorMode, DrawCommand, EyeGeometry, EyesConfig, FaceRect,
    FaceSignalSource, FrameSize, FrameSource, Palette, Result, TickOutput,
};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 1.0 / 60.0;
const CAMERA: FrameSize = FrameSize::new(640, 480);

fn animator(config: &EyesConfig, seed: u64) -> Animator<StdRng> {
    Animator::with_rng(
        config,
        EyeGeometry::for_display(1920, 1080),
        CAMERA,
        StdRng::seed_from_u64(seed),
    )
}

/// Run `seconds` worth of ticks with the same face signal.
fn hold(a: &mut Animator<StdRng>, face: Option<FaceRect>, seconds: f32) -> Vec<TickOutput> {
    let ticks = (seconds / DT).round() as usize;
    (0..ticks).map(|_| a.tick(face, DT)).collect()
}

/// Collapse consecutive duplicate modes.
fn mode_runs(ticks: &[TickOutput]) -> Vec<BehaviorMode> {
    let mut runs: Vec<BehaviorMode> = Vec::new();
    for t in ticks {
        if runs.last() != Some(&t.mode) {
            runs.push(t.mode);
        }
    }
    runs
}

#[test]
fn visitor_leaves_and_returns() {
    let config = EyesConfig::default();
    let mut a = animator(&config, 11);
    let face = Some(FaceRect::new(100, 200, 80, 80));

    let mut ticks = hold(&mut a, face, 2.0);
    ticks.extend(hold(&mut a, None, 5.0));
    ticks.extend(hold(&mut a, face, 2.0));

    assert_eq!(
        mode_runs(&ticks),
        vec![
            BehaviorMode::Tracking,
            BehaviorMode::Blinking,
            BehaviorMode::RandomSearch,
            BehaviorMode::Tracking,
        ]
    );

    // Exactly one closed-eye stretch during the absence.
    let closings = ticks
        .windows(2)
        .filter(|w| !w[0].eyes_closed && w[1].eyes_closed)
        .count();
    assert_eq!(closings, 1);

    // Back on the face, the pupils settle on its target.
    let last = ticks.last().unwrap();
    assert!(last.pupil.distance(&last.target) < 0.5);
}

#[test]
fn short_dropouts_are_invisible() {
    let config = EyesConfig::default();
    let mut a = animator(&config, 5);
    let face = Some(FaceRect::new(300, 200, 60, 60));

    let mut ticks = Vec::new();
    for _ in 0..5 {
        ticks.extend(hold(&mut a, face, 0.5));
        ticks.extend(hold(&mut a, None, 0.2));
    }

    assert!(ticks.iter().all(|t| t.mode == BehaviorMode::Tracking));
    assert!(ticks.iter().all(|t| !t.eyes_closed));
}

#[test]
fn random_search_stays_within_reach() {
    let config = EyesConfig::default();
    let mut a = animator(&config, 42);
    let reach = a.geometry().max_pupil_movement() + 1e-3;

    let ticks = hold(&mut a, None, 20.0);
    let searching: Vec<_> = ticks
        .iter()
        .filter(|t| t.mode == BehaviorMode::RandomSearch)
        .collect();

    assert!(!searching.is_empty());
    for t in &searching {
        assert!(t.target.dx.abs() <= reach && t.target.dy.abs() <= reach);
        assert!(t.pupil.dx.abs() <= reach && t.pupil.dy.abs() <= reach);
    }

    // About 18.5 s of searching at a 3 s interval: 7 distinct targets.
    let mut targets = searching.iter().map(|t| t.target).collect::<Vec<_>>();
    targets.dedup();
    assert_eq!(targets.len(), 7);
}

#[test]
fn frames_follow_blink_phase() {
    let config = EyesConfig::default();
    let mut a = animator(&config, 1);
    let palette = Palette::default();

    for t in hold(&mut a, None, 1.4) {
        let commands = build_frame(a.geometry(), &t, &palette);
        let lines = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        let circles = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count();
        if t.eyes_closed {
            assert_eq!((lines, circles), (2, 0));
        } else {
            assert_eq!((lines, circles), (0, 4));
        }
    }
}

struct BlankCamera {
    failures_left: usize,
}

impl FrameSource for BlankCamera {
    fn next_frame(&mut self) -> Result<GrayImage> {
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(follow_eyes::Error::Camera("busy".into()));
        }
        Ok(GrayImage::new(CAMERA.width, CAMERA.height))
    }
}

struct FixedFace(Option<FaceRect>);

impl follow_eyes::FaceDetector for FixedFace {
    fn detect(&mut self, _image: &GrayImage) -> Vec<FaceRect> {
        self.0.into_iter().collect()
    }
}

#[test]
fn signal_source_drives_animator() {
    let face = FaceRect::new(500, 100, 100, 100);
    let mut source =
        FaceSignalSource::open(BlankCamera { failures_left: 0 }, FixedFace(Some(face))).unwrap();
    let config = EyesConfig::default();
    let mut a = Animator::with_rng(
        &config,
        EyeGeometry::for_display(800, 600),
        source.frame_size(),
        StdRng::seed_from_u64(0),
    );

    let mut last = None;
    for _ in 0..120 {
        let signal = source.poll().unwrap();
        last = Some(a.tick(signal, DT));
    }
    let last = last.unwrap();

    // Face right of center and above it: eyes look left and up.
    assert_eq!(last.mode, BehaviorMode::Tracking);
    assert!(last.target.dx < 0.0);
    assert!(last.target.dy < 0.0);
    assert!(last.left.pupil_center.x < 200.0);
}

#[test]
fn first_frame_failure_is_fatal() {
    let result = FaceSignalSource::open(BlankCamera { failures_left: 1 }, FixedFace(None));
    assert!(result.is_err());
}
