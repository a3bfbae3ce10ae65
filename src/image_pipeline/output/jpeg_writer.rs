use std::io::Write;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::writer::ImageWriter;

#[derive(Debug, Clone, Copy)]
pub struct JpegWriter {
    quality: u8,
}

impl Default for JpegWriter {
    fn default() -> Self {
        Self::new(95)
    }
}

impl JpegWriter {
    pub fn new(quality: u8) -> Self {
        Self { quality: quality.clamp(1, 100) }
    }

    fn encode(
        &self,
        width: usize,
        height: usize,
        data: &[u8],
        color: ExtendedColorType,
        output: &mut dyn Write,
    ) -> Result<()> {
        debug!("Encoding JPEG image: {}x{} {:?}, quality {}", width, height, color, self.quality);

        let expected = width * height * color.channel_count() as usize;
        if data.len() != expected {
            return Err(ConversionError::EncodeError(format!(
                "{}x{} {:?} image needs {} bytes, got {}",
                width,
                height,
                color,
                expected,
                data.len()
            )));
        }

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.quality)
            .encode(data, width as u32, height as u32, color)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }
}

impl ImageWriter for JpegWriter {
    fn extension(&self) -> &'static str {
        "jpg"
    }

    fn write_gray(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.encode(width, height, data, ExtendedColorType::L8, output)
    }

    fn write_rgb(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        self.encode(width, height, data, ExtendedColorType::Rgb8, output)
    }
}
