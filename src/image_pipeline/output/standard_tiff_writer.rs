use std::io::{Cursor, Write};

use tiff::encoder::colortype::{ColorType, Gray8, RGB8};
use tiff::encoder::{Compression, TiffEncoder, compression::DeflateLevel};
use tiff::tags::Predictor;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::types::TiffCompression;
use crate::image_pipeline::output::writer::ImageWriter;

#[derive(Debug, Clone, Copy)]
pub struct StandardTiffWriter {
    compression: TiffCompression,
    predictor: Option<u16>,
}

impl Default for StandardTiffWriter {
    fn default() -> Self {
        Self::new(TiffCompression::None, None)
    }
}

impl StandardTiffWriter {
    pub fn new(compression: TiffCompression, predictor: Option<u16>) -> Self {
        Self { compression, predictor }
    }

    fn encode<C>(&self, width: usize, height: usize, data: &[C::Inner], output: &mut dyn Write) -> Result<()>
    where
        C: ColorType,
        [C::Inner]: tiff::encoder::TiffValue,
    {
        debug!("Encoding TIFF image: {}x{}", width, height);

        let compression = match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        };

        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buffer))
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = self.predictor {
            let predictor = match predictor_val {
                2 => Predictor::Horizontal,
                _ => Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder
            .write_image::<C>(width as u32, height as u32, data)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

impl ImageWriter for StandardTiffWriter {
    fn extension(&self) -> &'static str {
        "tif"
    }

    fn write_gray(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.encode::<Gray8>(width, height, data, output)
    }

    fn write_rgb(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.encode::<RGB8>(width, height, data, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: Vec<u8>) -> ((u32, u32), Vec<u8>) {
        let mut decoder = tiff::decoder::Decoder::new(Cursor::new(bytes)).unwrap();
        let dimensions = decoder.dimensions().unwrap();
        match decoder.read_image().unwrap() {
            tiff::decoder::DecodingResult::U8(data) => (dimensions, data),
            _ => panic!("expected 8-bit TIFF"),
        }
    }

    #[test]
    fn writes_gray_tiff() {
        let mut out = Vec::new();
        StandardTiffWriter::default().write_gray(3, 2, &[1, 2, 3, 4, 5, 6], &mut out).unwrap();
        assert_eq!(decode(out), ((3, 2), vec![1, 2, 3, 4, 5, 6]));
    }

    #[test]
    fn writes_compressed_rgb_tiff() {
        let data: Vec<u8> = (0..2 * 2 * 3).map(|i| (i * 10) as u8).collect();
        let mut out = Vec::new();
        StandardTiffWriter::new(TiffCompression::DeflateBalanced, Some(2))
            .write_rgb(2, 2, &data, &mut out)
            .unwrap();
        assert_eq!(decode(out), ((2, 2), data));
    }

    #[test]
    fn short_buffer_is_encode_error() {
        let mut out = Vec::new();
        let err = StandardTiffWriter::default().write_gray(4, 4, &[0; 3], &mut out).unwrap_err();
        assert!(matches!(err, ConversionError::EncodeError(_)));
    }
}
