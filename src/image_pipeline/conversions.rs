//! Pipeline conversions module
//!
//! This module contains orchestration logic for splitting RAW files into planes and previews.

mod raw_split;

#[cfg(test)]
mod tests;

pub use raw_split::{RawSplitPipeline, SplitOutcome, SplitReport};
