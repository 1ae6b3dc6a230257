//! Fullscreen eyes that follow the nearest face in front of the camera.
//!
//! Run with: cargo run --release --bin follow-eyes -- --detector seeta_fd_frontal_v1.0.bin
//!
//! Press Escape (or close the window) to quit.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use eframe::egui;
use follow_eyes::{
    build_frame, Animator, CameraSource, DrawCommand, Error, EyeGeometry, EyesConfig,
    FaceSignalSource, Palette, Result, Rgb, SeetaDetector,
};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "follow-eyes")]
#[command(author, version, about = "Animated eyes that follow the nearest face", long_about = None)]
struct Args {
    /// Camera index
    #[arg(short, long, default_value = "0")]
    camera: u32,

    /// Face detector model path
    #[arg(long, default_value = "seeta_fd_frontal_v1.0.bin")]
    detector: PathBuf,

    /// JSON file with animation tunables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run in a window instead of fullscreen
    #[arg(long)]
    windowed: bool,

    /// Minimum face size for detection (overrides the config file)
    #[arg(long)]
    min_face_size: Option<u32>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

type Signal = FaceSignalSource<CameraSource, SeetaDetector>;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "follow_eyes=debug"
    } else {
        "follow_eyes=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}

fn load_config(args: &Args) -> Result<EyesConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EyesConfig::load(path)?
        }
        None => EyesConfig::default(),
    };
    if let Some(min_face_size) = args.min_face_size {
        config.detector.min_face_size = min_face_size;
        config.validate()?;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<()> {
    info!("follow-eyes v{} starting", env!("CARGO_PKG_VERSION"));
    let config = load_config(args)?;

    let camera = CameraSource::open(args.camera)?;
    let detector = SeetaDetector::load(&args.detector, &config.detector)?;
    let signal = FaceSignalSource::open(camera, detector)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("follow-eyes")
            .with_inner_size([1280.0, 720.0])
            .with_fullscreen(!args.windowed),
        ..Default::default()
    };

    let app = EyesApp::new(signal, config);
    eframe::run_native("follow-eyes", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| Error::Display(e.to_string()))?;

    info!("shut down");
    Ok(())
}

struct EyesApp {
    // Dropped first: the camera is released before the rest of the app.
    signal: Signal,
    config: EyesConfig,
    palette: Palette,
    animator: Option<Animator>,
    commands: Vec<DrawCommand>,
    last_tick: Instant,
    should_quit: bool,
}

impl EyesApp {
    fn new(signal: Signal, config: EyesConfig) -> Self {
        Self {
            signal,
            config,
            palette: Palette::default(),
            animator: None,
            commands: Vec::new(),
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Build the animator once the display size is known, and rebuild it if
    /// the display size changes.
    fn ensure_animator(&mut self, width: u32, height: u32) {
        let stale = self.animator.as_ref().map_or(true, |a| {
            let g = a.geometry();
            g.display_width != width || g.display_height != height
        });
        if !stale || width == 0 || height == 0 {
            return;
        }

        let geometry = EyeGeometry::for_display(width, height);
        info!(
            width,
            height,
            eye_radius = geometry.eye_radius,
            max_pupil_movement = geometry.max_pupil_movement,
            "eye geometry"
        );
        self.animator = Some(Animator::new(
            &self.config,
            geometry,
            self.signal.frame_size(),
        ));
        self.last_tick = Instant::now();
    }

    fn tick(&mut self) {
        let Some(animator) = self.animator.as_mut() else {
            return;
        };

        let face = match self.signal.poll() {
            Ok(face) => face,
            Err(e) => {
                debug!("skipping tick: {}", e);
                return;
            }
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;

        let output = animator.tick(face, dt);
        self.commands = build_frame(animator.geometry(), &output, &self.palette);
    }
}

impl eframe::App for EyesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let quit_input = ctx.input(|i| {
            i.key_pressed(egui::Key::Escape) || i.viewport().close_requested()
        });
        if quit_input && !self.should_quit {
            info!("quit requested");
            self.should_quit = true;
        }
        if self.should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        let screen = ctx.screen_rect();
        self.ensure_animator(screen.width().round() as u32, screen.height().round() as u32);
        // Input events also trigger updates; those only repaint the last frame.
        let budget = self.config.frame_budget();
        if tick_due(self.last_tick.elapsed(), budget) {
            self.tick();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(color(self.palette.background)))
            .show(ctx, |ui| {
                let painter = ui.painter();
                let origin = screen.min;
                for command in &self.commands {
                    match *command {
                        DrawCommand::Clear(c) => {
                            painter.rect_filled(screen, 0.0, color(c));
                        }
                        DrawCommand::Circle {
                            center,
                            radius,
                            color: c,
                        } => {
                            painter.circle_filled(
                                origin + egui::vec2(center.x, center.y),
                                radius as f32,
                                color(c),
                            );
                        }
                        DrawCommand::Line {
                            from,
                            to,
                            thickness,
                            color: c,
                        } => {
                            painter.line_segment(
                                [
                                    origin + egui::vec2(from.x, from.y),
                                    origin + egui::vec2(to.x, to.y),
                                ],
                                egui::Stroke::new(thickness as f32, color(c)),
                            );
                        }
                    }
                }
            });

        ctx.request_repaint_after(budget.saturating_sub(self.last_tick.elapsed()));
    }
}

/// Whether a full frame budget has passed since the last animation tick.
fn tick_due(since_last_tick: Duration, budget: Duration) -> bool {
    since_last_tick >= budget
}

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_wait_for_the_frame_budget() {
        let budget = EyesConfig::default().frame_budget();
        assert!(!tick_due(Duration::ZERO, budget));
        assert!(!tick_due(budget / 2, budget));
        assert!(tick_due(budget, budget));
        assert!(tick_due(budget * 3, budget));
    }
}
