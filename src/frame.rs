//! Grayscale camera frames and the sources that produce them.

use image::{DynamicImage, GrayImage, RgbImage};

use crate::error::{Error, Result};
use crate::types::FrameSize;

/// Anything that can hand out grayscale frames, one per call.
///
/// An `Err` means no frame was available this time; callers decide whether
/// that is fatal (first frame) or just a skipped tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<GrayImage>;
}

/// Convert a packed RGB8 buffer into a grayscale frame.
pub fn rgb_to_gray(data: Vec<u8>, width: u32, height: u32) -> Result<GrayImage> {
    let len = data.len();
    let rgb = RgbImage::from_raw(width, height, data).ok_or(Error::FrameSize {
        len,
        width,
        height,
    })?;
    Ok(DynamicImage::ImageRgb8(rgb).to_luma8())
}

pub fn frame_size(image: &GrayImage) -> FrameSize {
    let (width, height) = image.dimensions();
    FrameSize::new(width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_rgb_to_luma() {
        // white, black, pure green, pure red
        let data = vec![255, 255, 255, 0, 0, 0, 0, 255, 0, 255, 0, 0];
        let gray = rgb_to_gray(data, 2, 2).unwrap();

        assert_eq!(frame_size(&gray), FrameSize::new(2, 2));
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
        // Green contributes more to luma than red.
        assert!(gray.get_pixel(0, 1).0[0] > gray.get_pixel(1, 1).0[0]);
    }

    #[test]
    fn rejects_short_buffer() {
        let err = rgb_to_gray(vec![0; 5], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::FrameSize {
                len: 5,
                width: 2,
                height: 2
            }
        ));
    }
}
