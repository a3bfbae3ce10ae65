//! Image processing pipeline module
//!
//! This module splits Bayer RAW frames into their colour planes, with separate
//! modules for RAW reading, plane extraction, demosaic previews, image output,
//! lens shading analysis and orchestration.

pub mod raw;
pub mod bayer_split;
pub mod debayer;
pub mod output;
pub mod shading;
pub mod config;
pub mod conversions;
pub mod common;

pub use common::{
    ConversionError,
    Result,
};

pub use raw::{
    BayerPhase,
    FilterColor,
    FlatRawReader,
    RawFrame,
    RawFrameReader,
    RawGeometry,
    RawLoaderReader,
};

pub use bayer_split::{
    BayerPlane,
    BayerPlaneExtractor,
    BayerPlanes,
    TilePosition,
    extract,
};

pub use debayer::{
    CpuDebayer,
    RgbImageData,
};

pub use output::{
    ImageWriter,
    JpegWriter,
    OutputFormat,
    SplitConfig,
    SplitConfigBuilder,
    StandardTiffWriter,
    TiffCompression,
};

pub use shading::{
    RoiSet,
    ShadingReport,
};

pub use config::RawFormatFile;

pub use conversions::{
    RawSplitPipeline,
    SplitOutcome,
    SplitReport,
};
