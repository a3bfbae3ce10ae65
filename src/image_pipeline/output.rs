//! Image output module
//!
//! Tints Bayer planes with their filter colour and encodes planes and previews
//! as JPEG or TIFF.

mod writer;
mod jpeg_writer;
mod standard_tiff_writer;
mod render;
pub mod types;

pub use writer::ImageWriter;
pub use jpeg_writer::JpegWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use render::tint_plane;
pub use types::{OutputFormat, SplitConfig, SplitConfigBuilder, TiffCompression};
