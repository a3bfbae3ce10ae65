use std::io::Cursor;

use bayer::{BayerDepth, CFA, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info};

use crate::image_pipeline::bayer_split::frame_layout;
use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::debayer::RgbImageData;
use crate::image_pipeline::raw::types::{BayerPhase, RawFrame};

/// Sample width the demosaic runs at for sensors wider than 8 bits.
const WORKING_BITS: u32 = 16;

/// Linear CPU demosaic producing an 8-bit RGB preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuDebayer;

fn cfa_for(phase: BayerPhase) -> CFA {
    match phase {
        BayerPhase::R => CFA::RGGB,
        BayerPhase::Gr => CFA::GRBG,
        BayerPhase::Gb => CFA::GBRG,
        BayerPhase::B => CFA::BGGR,
    }
}

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    /// Demosaics the even-aligned part of `frame`.
    ///
    /// Wide samples are left-justified to 16 bits before interpolation and the
    /// top byte of each interpolated value is kept, so a 10-bit and a 12-bit
    /// frame of the same scene render at the same brightness.
    pub fn process(&self, frame: &RawFrame) -> Result<RgbImageData> {
        let layout = frame_layout(frame)?;
        let (width, height) = (layout.width, layout.height);
        info!("Starting CPU debayering for image {}x{}", width, height);

        let narrow = frame.bit_depth <= 8;
        let (bayer_depth, raster_depth, bytes_per_pixel) = if narrow {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };

        let rows = (0..height).map(|y| &frame.pixels[y * layout.stride..y * layout.stride + width]);
        let bayer_bytes: Vec<u8> = if narrow {
            rows.flatten().map(|&v| v.min(u8::MAX as u16) as u8).collect()
        } else {
            let shift = WORKING_BITS - frame.bit_depth;
            rows.flatten()
                .flat_map(|&v| (((v as u32) << shift).min(u16::MAX as u32) as u16).to_le_bytes())
                .collect()
        };

        let mut output_buf = vec![0u8; width * height * 3 * bytes_per_pixel];
        let cfa = cfa_for(frame.phase);
        debug!(
            "Running demosaic with depth={:?}, CFA={:?}, algo=Linear, input bytes={}",
            bayer_depth,
            cfa,
            bayer_bytes.len()
        );

        {
            let mut cursor = Cursor::new(&bayer_bytes[..]);
            let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
            bayer::run_demosaic(&mut cursor, bayer_depth, cfa, Demosaic::Linear, &mut output_raster)
                .map_err(|e| ConversionError::DemosaicError(format!("{:?}", e)))?;
        }

        let data: Vec<u8> = if narrow {
            output_buf
        } else {
            output_buf
                .chunks_exact(2)
                .map(|pair| (u16::from_ne_bytes([pair[0], pair[1]]) >> 8) as u8)
                .collect()
        };

        Ok(RgbImageData { width, height, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::raw::types::RawGeometry;

    fn uniform(width: usize, height: usize, bit_depth: u32, value: u16) -> RawFrame {
        RawFrame::new(
            vec![value; width * height],
            RawGeometry { width, height, bit_depth, phase: BayerPhase::Gr },
        )
    }

    #[test]
    fn uniform_eight_bit_frame_stays_uniform() {
        let rgb = CpuDebayer::new().process(&uniform(8, 8, 8, 100)).unwrap();
        assert_eq!((rgb.width, rgb.height), (8, 8));
        assert_eq!(rgb.data.len(), 8 * 8 * 3);
        assert!(rgb.data.iter().all(|&v| v == 100));
        assert!(rgb.to_gray().iter().all(|&v| v == 100));
    }

    #[test]
    fn wide_frame_is_scaled_to_eight_bits() {
        // 512 in 10 bits is half scale: 512 << 6 = 0x8000 -> 0x80
        let rgb = CpuDebayer::new().process(&uniform(8, 8, 10, 512)).unwrap();
        assert!(rgb.data.iter().all(|&v| v == 0x80));
    }

    #[test]
    fn odd_geometry_is_aligned() {
        let rgb = CpuDebayer::new().process(&uniform(9, 7, 8, 10)).unwrap();
        assert_eq!((rgb.width, rgb.height), (8, 6));
        assert_eq!(rgb.data.len(), 8 * 6 * 3);
    }

    #[test]
    fn validates_like_the_extractor() {
        let err = CpuDebayer::new().process(&uniform(4, 4, 0, 0)).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidBitDepth(0)));
    }

    #[test]
    fn phase_maps_to_cfa() {
        assert_eq!(cfa_for(BayerPhase::R), CFA::RGGB);
        assert_eq!(cfa_for(BayerPhase::B), CFA::BGGR);
    }
}
