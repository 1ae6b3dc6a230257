use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Face detector error: {0}")]
    Detector(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Frame size mismatch: buffer of {len} bytes for {width}x{height} image")]
    FrameSize { len: usize, width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
