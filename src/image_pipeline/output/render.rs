use crate::image_pipeline::bayer_split::BayerPlane;
use crate::image_pipeline::raw::types::FilterColor;

/// Interleaved RGB rendering of `plane` in its own filter colour.
///
/// Red samples land in the red channel, both greens in the green channel and
/// blue in the blue channel; the other two channels stay black.
pub fn tint_plane(plane: &BayerPlane) -> Vec<u8> {
    let channel = match plane.color {
        FilterColor::R => 0,
        FilterColor::Gr | FilterColor::Gb => 1,
        FilterColor::B => 2,
    };

    let mut rgb = vec![0u8; plane.samples.len() * 3];
    for (pixel, &sample) in rgb.chunks_exact_mut(3).zip(&plane.samples) {
        pixel[channel] = sample;
    }
    rgb
}
