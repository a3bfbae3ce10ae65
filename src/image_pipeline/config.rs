//! RAW format configuration files
//!
//! JSON files describing the sensor dump layout and which outputs to save:
//!
//! ```json
//! { "width": 1920, "height": 1080, "bits": 12, "bayer": "Gr",
//!   "saveBayerColor": true, "saveRawGray": false, "saveRawRGB": true }
//! ```
//!
//! `bayer` may also be the numeric code 0..=3. Display-only keys such as
//! `showRawGray` are accepted and ignored. Missing keys keep their defaults.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::output::SplitConfig;
use crate::image_pipeline::raw::types::{BayerPhase, RawGeometry};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormatFile {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub bits: Option<u32>,
    pub bayer: Option<BayerPhase>,
    pub save_bayer_color: Option<bool>,
    pub save_raw_gray: Option<bool>,
    #[serde(rename = "saveRawRGB")]
    pub save_raw_rgb: Option<bool>,
}

impl RawFormatFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConversionError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let parsed: Self = serde_json::from_str(&text)
            .map_err(|e| ConversionError::ConfigError(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded RAW format from {}: {:?}", path.display(), parsed);
        Ok(parsed)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ConversionError::ConfigError(e.to_string()))
    }

    /// Overlays the values present in the file onto `geometry`.
    pub fn apply_geometry(&self, geometry: RawGeometry) -> RawGeometry {
        RawGeometry {
            width: self.width.unwrap_or(geometry.width),
            height: self.height.unwrap_or(geometry.height),
            bit_depth: self.bits.unwrap_or(geometry.bit_depth),
            phase: self.bayer.unwrap_or(geometry.phase),
        }
    }

    /// Overlays the save switches present in the file onto `config`.
    pub fn apply_outputs(&self, config: SplitConfig) -> SplitConfig {
        SplitConfig {
            save_bayer_color: self.save_bayer_color.unwrap_or(config.save_bayer_color),
            save_raw_gray: self.save_raw_gray.unwrap_or(config.save_raw_gray),
            save_raw_rgb: self.save_raw_rgb.unwrap_or(config.save_raw_rgb),
            ..config
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_legacy_layout() {
        let file = RawFormatFile::from_json(
            r#"{
                "width": 1920, "height": 1080, "bits": 12, "bayer": 1,
                "showBayerColor": false, "showRawGray": true, "showRawRGB": false,
                "saveBayerColor": true, "saveRawGray": false, "saveRawRGB": true
            }"#,
        )
        .unwrap();

        let geometry = file.apply_geometry(RawGeometry::default());
        assert_eq!(
            geometry,
            RawGeometry { width: 1920, height: 1080, bit_depth: 12, phase: BayerPhase::Gr }
        );

        let config = file.apply_outputs(SplitConfig::default());
        assert!(config.save_bayer_color);
        assert!(!config.save_raw_gray);
        assert!(config.save_raw_rgb);
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let file = RawFormatFile::from_json(r#"{ "bayer": "Gb" }"#).unwrap();
        let geometry = file.apply_geometry(RawGeometry::default());
        assert_eq!(geometry.width, 1600);
        assert_eq!(geometry.bit_depth, 10);
        assert_eq!(geometry.phase, BayerPhase::Gb);
        assert!(file.apply_outputs(SplitConfig::default()).save_raw_gray);
    }

    #[test]
    fn bad_phase_is_config_error() {
        let err = RawFormatFile::from_json(r#"{ "bayer": "X" }"#).unwrap_err();
        assert!(matches!(err, ConversionError::ConfigError(ref msg) if msg.contains("X")));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 64, "height": 32, "bits": 8, "bayer": "R" }}"#).unwrap();
        let parsed = RawFormatFile::load(file.path()).unwrap();
        assert_eq!(parsed.width, Some(64));
        assert_eq!(parsed.bayer, Some(BayerPhase::R));

        let err = RawFormatFile::load("/nonexistent/raw_format.json").unwrap_err();
        assert!(matches!(err, ConversionError::ConfigError(_)));
    }
}
