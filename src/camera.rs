//! Webcam capture through `nokhwa`.

use image::GrayImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::frame::{rgb_to_gray, FrameSource};

/// An open camera stream. The stream is stopped when this is dropped.
pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    pub fn open(index: u32) -> Result<Self> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| Error::Camera(format!("could not open camera {}: {}", index, e)))?;
        camera
            .open_stream()
            .map_err(|e| Error::Camera(format!("could not start stream: {}", e)))?;

        info!(index, name = %camera.info().human_name(), "camera opened");
        Ok(Self { camera })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<GrayImage> {
        let buffer = self
            .camera
            .frame()
            .map_err(|e| Error::Camera(format!("frame capture failed: {}", e)))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::Camera(format!("frame decode failed: {}", e)))?;
        let (width, height) = (decoded.width(), decoded.height());
        rgb_to_gray(decoded.into_raw(), width, height)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        match self.camera.stop_stream() {
            Ok(()) => info!("camera released"),
            Err(e) => warn!("failed to stop camera stream: {}", e),
        }
    }
}
