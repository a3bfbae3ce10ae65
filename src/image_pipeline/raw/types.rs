//! RAW frame data types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Physical colour filter sitting over a photosite.
///
/// The two greens are kept apart: `Gr` shares a row with red, `Gb` with blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColor {
    R,
    Gr,
    Gb,
    B,
}

impl FilterColor {
    /// Reporting order used for means and file listings.
    pub const ALL: [FilterColor; 4] = [FilterColor::R, FilterColor::Gr, FilterColor::Gb, FilterColor::B];

    pub fn name(self) -> &'static str {
        match self {
            FilterColor::R => "R",
            FilterColor::Gr => "Gr",
            FilterColor::Gb => "Gb",
            FilterColor::B => "B",
        }
    }

    /// Position of this colour in [`FilterColor::ALL`].
    pub fn index(self) -> usize {
        match self {
            FilterColor::R => 0,
            FilterColor::Gr => 1,
            FilterColor::Gb => 2,
            FilterColor::B => 3,
        }
    }
}

impl fmt::Display for FilterColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which filter colour occupies pixel (0, 0) of a RAW buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PhaseRepr", into = "String")]
pub enum BayerPhase {
    R,
    Gr,
    Gb,
    B,
}

impl BayerPhase {
    pub const ALL: [BayerPhase; 4] = [BayerPhase::R, BayerPhase::Gr, BayerPhase::Gb, BayerPhase::B];

    /// Colours at (top-left, top-right, bottom-left, bottom-right) of every 2x2 tile.
    pub fn tile(self) -> [FilterColor; 4] {
        use FilterColor::*;
        match self {
            BayerPhase::R => [R, Gr, Gb, B],
            BayerPhase::Gr => [Gr, R, B, Gb],
            BayerPhase::Gb => [Gb, B, R, Gr],
            BayerPhase::B => [B, Gb, Gr, R],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BayerPhase::R => "R",
            BayerPhase::Gr => "Gr",
            BayerPhase::Gb => "Gb",
            BayerPhase::B => "B",
        }
    }

    /// Numeric code used by legacy config files: R=0, Gr=1, Gb=2, B=3.
    pub fn code(self) -> u8 {
        match self {
            BayerPhase::R => 0,
            BayerPhase::Gr => 1,
            BayerPhase::Gb => 2,
            BayerPhase::B => 3,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(BayerPhase::R),
            1 => Ok(BayerPhase::Gr),
            2 => Ok(BayerPhase::Gb),
            3 => Ok(BayerPhase::B),
            other => Err(ConversionError::InvalidBayerPhase(other.to_string())),
        }
    }

    /// Four-letter CFA name (`RGGB`, `GRBG`, `GBRG`, `BGGR`).
    pub fn cfa_name(self) -> &'static str {
        match self {
            BayerPhase::R => "RGGB",
            BayerPhase::Gr => "GRBG",
            BayerPhase::Gb => "GBRG",
            BayerPhase::B => "BGGR",
        }
    }

    pub fn from_cfa_name(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "RGGB" => Ok(BayerPhase::R),
            "GRBG" => Ok(BayerPhase::Gr),
            "GBRG" => Ok(BayerPhase::Gb),
            "BGGR" => Ok(BayerPhase::B),
            _ => Err(ConversionError::InvalidBayerPhase(name.to_string())),
        }
    }
}

impl fmt::Display for BayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BayerPhase {
    type Err = ConversionError;

    /// Accepts `R`, `Gr`, `Gb`, `B` in any case, with or without a `bayer` prefix.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        let tag = lowered.strip_prefix("bayer").unwrap_or(&lowered);
        match tag {
            "r" => Ok(BayerPhase::R),
            "gr" => Ok(BayerPhase::Gr),
            "gb" => Ok(BayerPhase::Gb),
            "b" => Ok(BayerPhase::B),
            _ => Err(ConversionError::InvalidBayerPhase(s.to_string())),
        }
    }
}

impl From<BayerPhase> for String {
    fn from(phase: BayerPhase) -> Self {
        phase.name().to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PhaseRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<PhaseRepr> for BayerPhase {
    type Error = ConversionError;

    fn try_from(repr: PhaseRepr) -> Result<Self> {
        match repr {
            PhaseRepr::Code(code) => BayerPhase::from_code(code),
            PhaseRepr::Name(name) => name.parse(),
        }
    }
}

/// Declared geometry of a headerless RAW dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawGeometry {
    pub width: usize,
    pub height: usize,
    /// Significant bits per sample, right-justified in the stored word
    pub bit_depth: u32,
    pub phase: BayerPhase,
}

impl Default for RawGeometry {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            bit_depth: 10,
            phase: BayerPhase::B,
        }
    }
}

impl RawGeometry {
    /// Bytes used to store one sample on disk.
    pub fn bytes_per_sample(&self) -> usize {
        if self.bit_depth <= 8 { 1 } else { 2 }
    }

    /// Width and height rounded down to even values.
    pub fn aligned(&self) -> (usize, usize) {
        (self.width & !1, self.height & !1)
    }
}

/// Single-channel Bayer mosaic as handed to the extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    /// Row-major samples; 8-bit sensors are stored widened to u16
    pub pixels: Vec<u16>,
    /// Significant bits per sample (1..=16)
    pub bit_depth: u32,
    /// Filter colour at pixel (0, 0)
    pub phase: BayerPhase,
}

impl RawFrame {
    pub fn new(pixels: Vec<u16>, geometry: RawGeometry) -> Self {
        Self {
            width: geometry.width,
            height: geometry.height,
            pixels,
            bit_depth: geometry.bit_depth,
            phase: geometry.phase,
        }
    }

    pub fn geometry(&self) -> RawGeometry {
        RawGeometry {
            width: self.width,
            height: self.height,
            bit_depth: self.bit_depth,
            phase: self.phase,
        }
    }
}
