//! Debayering module for building 8-bit gray and RGB previews of a RAW frame

pub mod cpu_debayer;
pub mod types;

pub use cpu_debayer::CpuDebayer;
pub use types::RgbImageData;
