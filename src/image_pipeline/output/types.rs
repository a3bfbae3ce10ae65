//! Output configuration types

use std::path::PathBuf;
use std::str::FromStr;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::{ImageWriter, JpegWriter, StandardTiffWriter};

/// Encoded file format for planes and previews
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Baseline JPEG, lossy
    Jpeg,
    /// 8-bit TIFF, optionally compressed
    Tiff,
}

impl FromStr for OutputFormat {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            other => Err(ConversionError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression (slow, good compression)
    Lzw,
    /// Deflate compression - fast level (good speed/size balance)
    DeflateFast,
    /// Deflate compression - best compression (slower)
    DeflateBest,
    /// Deflate compression - balanced
    DeflateBalanced,
}

/// Configuration for splitting a RAW frame into files
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Format of every written image
    pub output_format: OutputFormat,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Compression used when writing TIFF
    pub compression: TiffCompression,
    /// TIFF predictor (2 for horizontal differencing)
    pub predictor: Option<u16>,
    /// Write the four tinted R/Gr/Gb/B planes
    pub save_bayer_color: bool,
    /// Write the demosaiced gray preview
    pub save_raw_gray: bool,
    /// Write the demosaiced RGB preview
    pub save_raw_rgb: bool,
    /// Directory for output files; `None` means `<input dir>/_imageRepo/<base name>`
    pub output_dir: Option<PathBuf>,
    /// Measure lens shading on the extracted planes
    pub shading_report: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 95,
            compression: TiffCompression::None,
            predictor: None,
            save_bayer_color: true,
            save_raw_gray: true,
            save_raw_rgb: true,
            output_dir: None,
            shading_report: false,
        }
    }
}

impl SplitConfig {
    pub fn builder() -> SplitConfigBuilder {
        SplitConfigBuilder::default()
    }

    /// Whether the demosaic preview has to be computed at all.
    pub fn needs_debayer(&self) -> bool {
        self.save_raw_gray || self.save_raw_rgb
    }

    /// Writer matching `output_format`.
    pub fn writer(&self) -> Box<dyn ImageWriter + Send + Sync> {
        match self.output_format {
            OutputFormat::Jpeg => Box::new(JpegWriter::new(self.jpeg_quality)),
            OutputFormat::Tiff => Box::new(StandardTiffWriter::new(self.compression, self.predictor)),
        }
    }
}

/// Builder for SplitConfig
#[derive(Default)]
pub struct SplitConfigBuilder {
    output_format: Option<OutputFormat>,
    jpeg_quality: Option<u8>,
    compression: Option<TiffCompression>,
    predictor: Option<Option<u16>>,
    save_bayer_color: Option<bool>,
    save_raw_gray: Option<bool>,
    save_raw_rgb: Option<bool>,
    output_dir: Option<Option<PathBuf>>,
    shading_report: Option<bool>,
}

impl SplitConfigBuilder {
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn save_bayer_color(mut self, enable: bool) -> Self {
        self.save_bayer_color = Some(enable);
        self
    }

    pub fn save_raw_gray(mut self, enable: bool) -> Self {
        self.save_raw_gray = Some(enable);
        self
    }

    pub fn save_raw_rgb(mut self, enable: bool) -> Self {
        self.save_raw_rgb = Some(enable);
        self
    }

    pub fn output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = Some(dir);
        self
    }

    pub fn shading_report(mut self, enable: bool) -> Self {
        self.shading_report = Some(enable);
        self
    }

    pub fn build(self) -> SplitConfig {
        let default = SplitConfig::default();
        SplitConfig {
            output_format: self.output_format.unwrap_or(default.output_format),
            jpeg_quality: self.jpeg_quality.unwrap_or(default.jpeg_quality),
            compression: self.compression.unwrap_or(default.compression),
            predictor: self.predictor.unwrap_or(default.predictor),
            save_bayer_color: self.save_bayer_color.unwrap_or(default.save_bayer_color),
            save_raw_gray: self.save_raw_gray.unwrap_or(default.save_raw_gray),
            save_raw_rgb: self.save_raw_rgb.unwrap_or(default.save_raw_rgb),
            output_dir: self.output_dir.unwrap_or(default.output_dir),
            shading_report: self.shading_report.unwrap_or(default.shading_report),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = SplitConfig::builder()
            .output_format(OutputFormat::Tiff)
            .compression(TiffCompression::Lzw)
            .predictor(Some(2))
            .save_raw_gray(false)
            .jpeg_quality(0)
            .build();

        assert_eq!(config.output_format, OutputFormat::Tiff);
        assert_eq!(config.compression, TiffCompression::Lzw);
        assert_eq!(config.predictor, Some(2));
        assert!(!config.save_raw_gray);
        assert!(config.save_raw_rgb);
        assert!(config.needs_debayer());
        assert_eq!(config.jpeg_quality, 1);
        assert_eq!(config.writer().extension(), "tif");
    }

    #[test]
    fn default_writes_everything_as_jpeg() {
        let config = SplitConfig::default();
        assert!(config.save_bayer_color && config.save_raw_gray && config.save_raw_rgb);
        assert_eq!(config.writer().extension(), "jpg");
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn parses_output_format() {
        assert_eq!("JPG".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!("tiff".parse::<OutputFormat>().unwrap(), OutputFormat::Tiff);
        assert!(matches!("png".parse::<OutputFormat>(), Err(ConversionError::UnsupportedFormat(_))));
    }
}
