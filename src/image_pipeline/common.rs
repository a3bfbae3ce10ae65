//! Common utilities module
//!
//! Error type and result alias shared by every stage of the split pipeline.

pub mod error;

pub use error::{ConversionError, Result};
