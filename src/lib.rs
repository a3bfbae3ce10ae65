//! Bayer RAW plane splitting for camera image-pipeline tuning.
//!
//! The core is [`image_pipeline::extract`], which turns a single-channel Bayer
//! frame into four half-resolution colour planes with their mean levels. The
//! rest of the crate reads sensor dumps, writes tinted planes and demosaiced
//! previews, and measures lens shading on the planes.

pub mod image_pipeline;
pub mod logger;
