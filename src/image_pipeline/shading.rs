//! Lens shading analysis module
//!
//! Places named ROI rectangles on a Bayer plane (centre, diagonals, horizontal
//! and vertical axes) and compares their per-colour means against the centre.

mod roi;
mod report;

pub use roi::{Point, RoiRect, RoiSet, interpolate_point};
pub use report::{RoiShading, ShadingReport};
