//! Reader for headerless sensor dumps.
//!
//! The file carries no metadata: width, height, bit depth and Bayer phase come
//! from configuration. Samples are one byte each for sensors of 8 bits or
//! fewer and little-endian 16-bit words otherwise, value right-justified.

use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{RawFrame, RawGeometry};

/// Widest sample the flat layout can hold.
const MAX_BIT_DEPTH: u32 = 16;

#[derive(Debug, Clone, Copy)]
pub struct FlatRawReader {
    geometry: RawGeometry,
}

impl FlatRawReader {
    pub fn new(geometry: RawGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &RawGeometry {
        &self.geometry
    }
}

impl RawFrameReader for FlatRawReader {
    /// Decodes the dump into samples without trimming or padding.
    ///
    /// A file shorter than the even-aligned frame is reported as truncated here,
    /// before the extractor runs; a longer one is passed through untouched so the
    /// extractor can reject the shape.
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        let geometry = self.geometry;
        if geometry.bit_depth == 0 || geometry.bit_depth > MAX_BIT_DEPTH {
            return Err(ConversionError::InvalidBitDepth(geometry.bit_depth));
        }

        let bytes_per_sample = geometry.bytes_per_sample();
        let (width, height) = geometry.aligned();
        let expected = width * height * bytes_per_sample;

        debug!(
            "Decoding flat RAW: {} bytes, {}x{} @ {} bits",
            data.len(),
            geometry.width,
            geometry.height,
            geometry.bit_depth
        );

        if data.len() < expected {
            return Err(ConversionError::TruncatedInput { expected, got: data.len() });
        }
        if data.len() % bytes_per_sample != 0 {
            return Err(ConversionError::TruncatedInput {
                expected: data.len() + (bytes_per_sample - data.len() % bytes_per_sample),
                got: data.len(),
            });
        }

        let pixels: Vec<u16> = if bytes_per_sample == 1 {
            data.iter().map(|&b| b as u16).collect()
        } else {
            data.chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .collect()
        };

        Ok(RawFrame::new(pixels, geometry))
    }
}
