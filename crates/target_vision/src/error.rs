use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Frame is {actual:?} but {expected:?} was requested")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Frame source error: {0}")]
    FrameSource(String),

    #[error("Texture upload error: {0}")]
    TextureUpload(String),

    #[error("Host bridge registration failed: {0}")]
    BridgeRegistration(String),

    #[error("Frame processor used before initialize()")]
    NotInitialized,

    #[error("Output buffer holds {actual} bytes, {needed} required")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Encoded frame is {size} bytes, exceeds the {limit} byte region")]
    EncodedTooLarge { size: usize, limit: usize },

    #[error("Pipeline is missing a {0}")]
    IncompletePipeline(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown display mode code {0}")]
    InvalidDisplayMode(i32),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
