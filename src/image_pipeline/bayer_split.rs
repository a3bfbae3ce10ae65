//! Bayer plane extraction module
//!
//! Splits a single-channel Bayer mosaic into four half-resolution planes, one
//! per 2x2 tile position, labelled with their physical filter colour.

mod extractor;
pub mod types;


pub use extractor::{BayerPlaneExtractor, extract};
pub(crate) use extractor::{FrameLayout, frame_layout};
pub use types::{BayerPlane, BayerPlanes, TilePosition};
