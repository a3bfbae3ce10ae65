use tracing::debug;

use crate::image_pipeline::bayer_split::types::{BayerPlane, BayerPlanes, TilePosition};
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::raw::types::RawFrame;

/// Supported sample widths, in bits.
const MIN_BIT_DEPTH: u32 = 1;
const MAX_BIT_DEPTH: u32 = 16;

/// Bit depth of the normalised output planes.
const OUTPUT_BITS: u32 = 8;

/// How a validated frame buffer maps onto its even-aligned grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FrameLayout {
    /// Even-aligned width
    pub width: usize,
    /// Even-aligned height
    pub height: usize,
    /// Distance between row starts in the source buffer
    pub stride: usize,
}

/// Validates bit depth, dimensions and buffer length of `frame`.
///
/// Odd widths and heights are rounded down; the dropped row or column is
/// skipped through the stride when the buffer holds the full frame, or is
/// already absent when the buffer was written at the aligned size.
pub(crate) fn frame_layout(frame: &RawFrame) -> Result<FrameLayout> {
    if !(MIN_BIT_DEPTH..=MAX_BIT_DEPTH).contains(&frame.bit_depth) {
        return Err(ConversionError::InvalidBitDepth(frame.bit_depth));
    }

    let width = frame.width & !1;
    let height = frame.height & !1;
    if width < 2 || height < 2 {
        return Err(ConversionError::InvalidDimensions(frame.width, frame.height));
    }

    let full = frame.width * frame.height;
    let aligned = width * height;
    let stride = match frame.pixels.len() {
        n if n == full => frame.width,
        n if n == aligned => width,
        n => {
            return Err(ConversionError::ShapeMismatch {
                width: frame.width,
                height: frame.height,
                expected: full,
                got: n,
            });
        }
    };

    Ok(FrameLayout { width, height, stride })
}

/// Splits a Bayer frame into its four half-resolution colour planes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BayerPlaneExtractor;

impl BayerPlaneExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the four planes of `frame` with their raw means.
    ///
    /// Either all four planes are returned or an error; the frame is never
    /// modified.
    ///
    /// # Errors
    ///
    /// * [`ConversionError::InvalidBitDepth`] when `bit_depth` is outside `1..=16`
    /// * [`ConversionError::InvalidDimensions`] when an aligned side is below 2
    /// * [`ConversionError::ShapeMismatch`] when the buffer length fits neither
    ///   the full nor the even-aligned geometry
    pub fn extract(&self, frame: &RawFrame) -> Result<BayerPlanes> {
        let layout = frame_layout(frame)?;
        let shift = frame.bit_depth.saturating_sub(OUTPUT_BITS);
        let tile = frame.phase.tile();

        debug!(
            "Splitting {}x{} frame (aligned {}x{}, stride {}), phase {}, shift {}",
            frame.width, frame.height, layout.width, layout.height, layout.stride, frame.phase, shift
        );

        let planes = TilePosition::ALL.map(|position| {
            let (samples, mean) = split_plane(&frame.pixels, &layout, position, shift);
            BayerPlane {
                color: tile[position as usize],
                position,
                width: layout.width / 2,
                height: layout.height / 2,
                samples,
                mean,
            }
        });

        Ok(BayerPlanes::from_tiles(planes))
    }
}

/// Extracts `frame` with a default [`BayerPlaneExtractor`].
pub fn extract(frame: &RawFrame) -> Result<BayerPlanes> {
    BayerPlaneExtractor.extract(frame)
}

fn split_plane(pixels: &[u16], layout: &FrameLayout, position: TilePosition, shift: u32) -> (Vec<u8>, f64) {
    let (row_offset, col_offset) = position.offset();
    let count = (layout.width / 2) * (layout.height / 2);
    let mut samples = Vec::with_capacity(count);
    let mut sum = 0.0f64;

    for y in (row_offset..layout.height).step_by(2) {
        let start = y * layout.stride;
        let row = &pixels[start..start + layout.width];
        for &value in row[col_offset..].iter().step_by(2) {
            sum += value as f64;
            samples.push(normalize(value, shift));
        }
    }

    (samples, sum / count as f64)
}

/// Truncating right shift to 8 bits; out-of-range samples saturate.
fn normalize(value: u16, shift: u32) -> u8 {
    (value >> shift).min(u8::MAX as u16) as u8
}
