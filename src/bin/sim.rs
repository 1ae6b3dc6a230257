//! Offline run of the eye animation against a scripted face signal.
//!
//! Useful for tuning the config without a camera or a display.
//!
//! Usage:
//!   follow-eyes-sim --scenario dropout              # Mode changes and a summary
//!   follow-eyes-sim --scenario sweep --json         # One JSON record per tick
//!   follow-eyes-sim --config eyes.json -o ticks.jsonl --json

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use follow_eyes::{
    Animator, BehaviorMode, EyeGeometry, EyesConfig, FaceRect, FrameSize, GazeOffset, Result,
    TickOutput,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "follow-eyes-sim")]
#[command(author, version, about = "Simulate the eye animation without a camera", long_about = None)]
struct Args {
    /// Face signal to replay
    #[arg(short, long, value_enum, default_value = "dropout")]
    scenario: Scenario,

    /// Simulated duration in seconds (at most one hour)
    #[arg(long, default_value = "8.0", value_parser = parse_seconds)]
    seconds: f32,

    /// JSON file with animation tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display width in pixels
    #[arg(long, default_value = "1920")]
    width: u32,

    /// Display height in pixels
    #[arg(long, default_value = "1080")]
    height: u32,

    /// Seed for the random search targets
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Output one JSON record per tick
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Scenario {
    /// A face holds still left of center
    Present,
    /// A face leaves for four seconds and comes back
    Dropout,
    /// A face walks across the frame from left to right
    Sweep,
    /// Nobody is there
    Away,
}

const CAMERA: FrameSize = FrameSize::new(640, 480);

const MAX_SECONDS: f32 = 3600.0;

fn parse_seconds(s: &str) -> std::result::Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{}", e))?;
    if !seconds.is_finite() || !(0.0..=MAX_SECONDS).contains(&seconds) {
        return Err(format!("must be between 0 and {}", MAX_SECONDS));
    }
    Ok(seconds)
}

impl Scenario {
    fn face_at(self, t: f32, total: f32) -> Option<FaceRect> {
        match self {
            Scenario::Present => Some(FaceRect::new(120, 180, 100, 100)),
            Scenario::Dropout => {
                (!(1.0..5.0).contains(&t)).then(|| FaceRect::new(400, 200, 90, 90))
            }
            Scenario::Sweep => {
                let progress = if total > 0.0 { (t / total).min(1.0) } else { 0.0 };
                let x = (progress * (CAMERA.width - 80) as f32) as i32;
                Some(FaceRect::new(x, 200, 80, 80))
            }
            Scenario::Away => None,
        }
    }
}

/// One line of JSON output.
#[derive(Serialize)]
struct TickRecord {
    t: f32,
    face: Option<FaceRect>,
    mode: BehaviorMode,
    eyes_closed: bool,
    target: GazeOffset,
    pupil: GazeOffset,
    socket: GazeOffset,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default = if args.verbose {
        "follow_eyes=debug"
    } else {
        "follow_eyes=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EyesConfig::load(path)?,
        None => EyesConfig::default(),
    };
    let geometry = EyeGeometry::for_display(args.width, args.height);
    let mut animator =
        Animator::with_rng(&config, geometry, CAMERA, StdRng::seed_from_u64(args.seed));

    let dt = 1.0 / config.target_fps as f32;
    let ticks = (args.seconds / dt).round() as usize;
    info!(scenario = ?args.scenario, ticks, "simulating");

    let mut records = Vec::new();
    for i in 0..ticks {
        let t = (i + 1) as f32 * dt;
        let face = args.scenario.face_at(t, args.seconds);
        let out = animator.tick(face, dt);
        records.push((t, face, out));
    }

    let output = if args.json {
        format_json(&records)?
    } else {
        format_human_readable(args, &records, dt)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output)?;
        info!(path = %path.display(), "output written");
    } else {
        print!("{}", output);
    }
    Ok(())
}

fn format_json(records: &[(f32, Option<FaceRect>, TickOutput)]) -> Result<String> {
    let mut s = String::new();
    for &(t, face, out) in records {
        let record = TickRecord {
            t,
            face,
            mode: out.mode,
            eyes_closed: out.eyes_closed,
            target: out.target,
            pupil: out.pupil,
            socket: out.socket,
        };
        s.push_str(&serde_json::to_string(&record)?);
        s.push('\n');
    }
    Ok(s)
}

fn format_human_readable(
    args: &Args,
    records: &[(f32, Option<FaceRect>, TickOutput)],
    dt: f32,
) -> String {
    let mut s = String::new();
    s.push_str(&format!(
        "Scenario: {:?} ({:.1}s, {} ticks, display {}x{})\n\n",
        args.scenario,
        args.seconds,
        records.len(),
        args.width,
        args.height
    ));

    let mut time_in_mode: BTreeMap<&'static str, f32> = BTreeMap::new();
    let mut closed = 0.0;
    let mut previous = None;
    for (t, face, out) in records {
        *time_in_mode.entry(out.mode.as_str()).or_default() += dt;
        if out.eyes_closed {
            closed += dt;
        }
        if previous != Some(out.mode) {
            s.push_str(&format!(
                "{:>6.2}s  {:<14} face: {:<5} target: ({:>7.2}, {:>7.2})\n",
                t,
                out.mode.as_str(),
                if face.is_some() { "yes" } else { "no" },
                out.target.dx,
                out.target.dy
            ));
            previous = Some(out.mode);
        }
    }

    s.push_str("\nTime per mode:\n");
    for (mode, seconds) in &time_in_mode {
        s.push_str(&format!("  {:<14} {:.2}s\n", mode, seconds));
    }
    s.push_str(&format!("  {:<14} {:.2}s\n", "eyes closed", closed));

    if let Some((_, _, last)) = records.last() {
        s.push_str(&format!(
            "\nFinal pupil: ({:.2}, {:.2})  socket: ({:.2}, {:.2})\n",
            last.pupil.dx, last.pupil.dy, last.socket.dx, last.socket.dy
        ));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_accepts_normal_durations() {
        assert_eq!(parse_seconds("8").unwrap(), 8.0);
        assert_eq!(parse_seconds("0").unwrap(), 0.0);
        assert_eq!(parse_seconds("3600").unwrap(), MAX_SECONDS);
    }

    #[test]
    fn seconds_rejects_huge_and_non_finite_values() {
        for bad in ["1e30", "inf", "-inf", "NaN", "-1", "3600.5", "abc"] {
            assert!(parse_seconds(bad).is_err(), "{} was accepted", bad);
        }
    }

    #[test]
    fn huge_duration_fails_argument_parsing() {
        let err = Args::try_parse_from(["follow-eyes-sim", "--seconds", "1e30"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

        let args = Args::try_parse_from(["follow-eyes-sim", "--seconds", "2.5"]).unwrap();
        assert_eq!(args.seconds, 2.5);
    }
}
