//! RAW frame reading module
//!
//! Readers turn bytes on disk into a [`RawFrame`]: headerless sensor dumps with
//! caller-declared geometry, or camera RAW containers decoded by rawloader.

mod reader;
mod flat_reader;
mod rawloader_reader;
pub mod types;

pub use reader::RawFrameReader;
pub use flat_reader::FlatRawReader;
pub use rawloader_reader::RawLoaderReader;
pub use types::{BayerPhase, FilterColor, RawFrame, RawGeometry};
