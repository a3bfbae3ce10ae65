use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Pixel buffer does not match {width}x{height} frame: expected {expected} samples, got {got}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },

    #[error("Invalid Bayer phase: {0:?} (expected one of R, Gr, Gb, B)")]
    InvalidBayerPhase(String),

    #[error("Invalid bit depth: {0} (supported range is 1..=16)")]
    InvalidBitDepth(u32),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Truncated RAW input: expected {expected} bytes, got {got}")]
    TruncatedInput { expected: usize, got: usize },

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Demosaic failed: {0}")]
    DemosaicError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
