//! Face detection and the per-tick face signal.

use std::path::Path;

use image::GrayImage;
use rustface::{Detector, ImageData};
use tracing::{debug, info};

use crate::config::DetectorSettings;
use crate::error::{Error, Result};
use crate::frame::{frame_size, FrameSource};
use crate::types::{FaceRect, FrameSize};

/// Finds face rectangles in a grayscale image.
pub trait FaceDetector {
    fn detect(&mut self, image: &GrayImage) -> Vec<FaceRect>;
}

/// The face with the largest area. Ties go to the first one listed.
pub fn largest_face(faces: &[FaceRect]) -> Option<FaceRect> {
    faces.iter().fold(None, |best: Option<FaceRect>, face| match best {
        Some(b) if b.area() >= face.area() => Some(b),
        _ => Some(*face),
    })
}

/// SeetaFace frontal detector backed by `rustface`.
pub struct SeetaDetector {
    inner: Box<dyn Detector>,
}

impl SeetaDetector {
    /// Load the detector model and apply the search settings.
    pub fn load<P: AsRef<Path>>(model_path: P, settings: &DetectorSettings) -> Result<Self> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(Error::Detector(format!(
                "model file not found: {}",
                path.display()
            )));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::Detector(format!("invalid model path: {}", path.display())))?;

        let mut inner = rustface::create_detector(path_str)
            .map_err(|e| Error::Detector(format!("failed to load face detector: {}", e)))?;
        inner.set_min_face_size(settings.min_face_size);
        inner.set_score_thresh(settings.score_thresh);
        inner.set_pyramid_scale_factor(settings.pyramid_scale_factor);
        inner.set_slide_window_step(settings.slide_window_step, settings.slide_window_step);

        info!(model = %path.display(), "face detector loaded");
        Ok(Self { inner })
    }
}

impl FaceDetector for SeetaDetector {
    fn detect(&mut self, image: &GrayImage) -> Vec<FaceRect> {
        let (width, height) = image.dimensions();
        let data = ImageData::new(image.as_raw(), width, height);
        self.inner
            .detect(&data)
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRect::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect()
    }
}

/// Pairs a frame source with a detector and yields at most one face per tick.
pub struct FaceSignalSource<F, D> {
    frames: F,
    detector: D,
    frame: FrameSize,
}

impl<F: FrameSource, D: FaceDetector> FaceSignalSource<F, D> {
    /// Read one frame to learn the camera resolution.
    ///
    /// Failing to get that first frame is an initialization error.
    pub fn open(mut frames: F, detector: D) -> Result<Self> {
        let first = frames
            .next_frame()
            .map_err(|e| Error::Camera(format!("no initial frame: {}", e)))?;
        let frame = frame_size(&first);
        if frame.width == 0 || frame.height == 0 {
            return Err(Error::Camera("camera returned an empty frame".into()));
        }
        info!(width = frame.width, height = frame.height, "camera frame size");
        Ok(Self {
            frames,
            detector,
            frame,
        })
    }

    pub fn frame_size(&self) -> FrameSize {
        self.frame
    }

    /// Capture a frame and return the largest face in it.
    ///
    /// `Err` means the frame could not be acquired and the tick should be skipped.
    pub fn poll(&mut self) -> Result<Option<FaceRect>> {
        let image = self.frames.next_frame()?;
        let faces = self.detector.detect(&image);
        let face = largest_face(&faces);
        if faces.len() > 1 {
            debug!(count = faces.len(), chosen = ?face, "multiple faces, picked largest");
        }
        Ok(face)
    }
}
