//! RAW frame reader for camera RAW containers using the rawloader library.
//!
//! Supports any format rawloader can decode (ARW, RAF, NEF, CR2, DNG, ...) as
//! long as the sensor is a plain 2x2 Bayer mosaic. Geometry, bit depth and
//! Bayer phase are taken from the file instead of configuration.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::reader::RawFrameReader;
use crate::image_pipeline::raw::types::{BayerPhase, RawFrame};

/// RAW frame reader that uses the rawloader library for decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Derives the sensor bit depth from its white level, e.g. 4095 -> 12, 16383 -> 14.
fn bits_from_white_level(white_level: u16) -> u32 {
    if white_level == 0 {
        DEFAULT_BITS_PER_SAMPLE
    } else {
        U16_BITS - white_level.leading_zeros()
    }
}

impl RawFrameReader for RawLoaderReader {
    /// Decodes a camera RAW file into a single-channel Bayer frame.
    ///
    /// Float RAW data (normalised 0.0-1.0) is scaled to the full u16 range and
    /// reported as 16-bit.
    fn read_frame(&self, data: &[u8]) -> Result<RawFrame> {
        debug!("Decoding camera RAW, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| ConversionError::DecodeError(e.to_string()))?;

        if decoded.cpp != 1 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} {}: {} components per pixel, expected a Bayer mosaic",
                decoded.clean_make, decoded.clean_model, decoded.cpp
            )));
        }
        if decoded.cfa.width != 2 || decoded.cfa.height != 2 {
            return Err(ConversionError::UnsupportedFormat(format!(
                "{} {}: {}x{} CFA '{}' is not a 2x2 Bayer pattern",
                decoded.clean_make,
                decoded.clean_model,
                decoded.cfa.width,
                decoded.cfa.height,
                decoded.cfa.name
            )));
        }
        let phase = BayerPhase::from_cfa_name(&decoded.cfa.name)?;

        let (pixels, bit_depth): (Vec<u16>, u32) = match decoded.data {
            RawloaderImageData::Integer(values) => {
                let white_level = decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX);
                (values, bits_from_white_level(white_level))
            }
            RawloaderImageData::Float(values) => (
                values
                    .iter()
                    .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                    .collect(),
                U16_BITS,
            ),
        };

        debug!(
            "Decoded {} {}: {}x{}, CFA {}, {} bits",
            decoded.clean_make, decoded.clean_model, decoded.width, decoded.height, decoded.cfa.name, bit_depth
        );

        Ok(RawFrame {
            width: decoded.width,
            height: decoded.height,
            pixels,
            bit_depth,
            phase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_level_maps_to_bit_depth() {
        assert_eq!(bits_from_white_level(4095), 12);
        assert_eq!(bits_from_white_level(16383), 14);
        assert_eq!(bits_from_white_level(1023), 10);
        assert_eq!(bits_from_white_level(0), DEFAULT_BITS_PER_SAMPLE);
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let result = RawLoaderReader.read_frame(b"definitely not a raw file");
        assert!(matches!(result, Err(ConversionError::DecodeError(_))));
    }
}
