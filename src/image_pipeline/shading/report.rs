use tracing::debug;

use crate::image_pipeline::bayer_split::{BayerPlane, BayerPlanes};
use crate::image_pipeline::raw::types::FilterColor;
use crate::image_pipeline::shading::roi::{Point, RoiSet};

/// ROI the ratios are taken against, when present.
const REFERENCE_ROI: &str = "C0";

/// Per-colour statistics of one ROI
#[derive(Debug, Clone, PartialEq)]
pub struct RoiShading {
    pub name: String,
    pub top_left: Point,
    pub bottom_right: Point,
    /// Mean 8-bit sample value per colour, R/Gr/Gb/B order
    pub means: [f64; 4],
    /// `means` divided by the reference ROI means; 0 where the reference is 0
    pub ratios: [f64; 4],
}

impl RoiShading {
    pub fn mean(&self, color: FilterColor) -> f64 {
        self.means[color.index()]
    }

    pub fn ratio(&self, color: FilterColor) -> f64 {
        self.ratios[color.index()]
    }
}

/// Lens shading measurement over a set of ROIs
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingReport {
    pub reference: String,
    pub rois: Vec<RoiShading>,
}

impl ShadingReport {
    /// Measures every ROI of `rois` on all four planes.
    ///
    /// ROI coordinates are plane coordinates. Ratios are relative to `C0`, or
    /// to the first ROI when the set has no `C0`.
    pub fn measure(planes: &BayerPlanes, rois: &RoiSet) -> Self {
        let colored = planes.in_color_order();
        let mut measured: Vec<RoiShading> = rois
            .all_vertices()
            .into_iter()
            .map(|(name, top_left, bottom_right)| RoiShading {
                name: name.to_string(),
                top_left,
                bottom_right,
                means: colored.map(|plane| region_mean(plane, top_left, bottom_right)),
                ratios: [0.0; 4],
            })
            .collect();

        let reference = measured
            .iter()
            .find(|roi| roi.name == REFERENCE_ROI)
            .or_else(|| measured.first())
            .map(|roi| (roi.name.clone(), roi.means));

        let reference_name = match reference {
            Some((name, reference_means)) => {
                for roi in &mut measured {
                    for (ratio, (&mean, &base)) in roi.ratios.iter_mut().zip(roi.means.iter().zip(&reference_means)) {
                        *ratio = if base > 0.0 { mean / base } else { 0.0 };
                    }
                }
                name
            }
            None => String::new(),
        };

        debug!("Measured shading over {} ROIs against {:?}", measured.len(), reference_name);
        Self { reference: reference_name, rois: measured }
    }

    pub fn get(&self, name: &str) -> Option<&RoiShading> {
        self.rois.iter().find(|roi| roi.name == name)
    }

    /// One line per ROI: name, then ratio per colour in percent.
    pub fn summary_lines(&self) -> Vec<String> {
        self.rois
            .iter()
            .map(|roi| {
                format!(
                    "{:<3} (R/Gr/Gb/B): {:.1}%, {:.1}%, {:.1}%, {:.1}%",
                    roi.name,
                    roi.ratios[0] * 100.0,
                    roi.ratios[1] * 100.0,
                    roi.ratios[2] * 100.0,
                    roi.ratios[3] * 100.0
                )
            })
            .collect()
    }
}

/// Mean over columns `[top_left.x, bottom_right.x)` and rows
/// `[top_left.y, bottom_right.y)`, clipped to the plane. Empty regions give 0.
fn region_mean(plane: &BayerPlane, top_left: Point, bottom_right: Point) -> f64 {
    let x1 = bottom_right.x.min(plane.width);
    let y1 = bottom_right.y.min(plane.height);
    if top_left.x >= x1 || top_left.y >= y1 {
        return 0.0;
    }

    let sum: u64 = plane
        .rows()
        .skip(top_left.y)
        .take(y1 - top_left.y)
        .map(|row| row[top_left.x..x1].iter().map(|&v| v as u64).sum::<u64>())
        .sum();
    sum as f64 / ((x1 - top_left.x) * (y1 - top_left.y)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_pipeline::bayer_split::extract;
    use crate::image_pipeline::raw::types::{BayerPhase, RawFrame, RawGeometry};

    /// 40x40 RGGB frame: R = 200 in the centre and 100 elsewhere, other colours flat.
    fn vignetted_frame() -> RawFrame {
        let (width, height) = (40, 40);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let value = match (y % 2, x % 2) {
                    (0, 0) if (16..24).contains(&x) && (16..24).contains(&y) => 200,
                    (0, 0) => 100,
                    (0, 1) | (1, 0) => 80,
                    _ => 60,
                };
                pixels.push(value);
            }
        }
        RawFrame::new(pixels, RawGeometry { width, height, bit_depth: 8, phase: BayerPhase::R })
    }

    #[test]
    fn corners_report_falloff_against_centre() {
        let planes = extract(&vignetted_frame()).unwrap();
        let (w, h) = planes.plane_size();
        let report = ShadingReport::measure(&planes, &RoiSet::shading_layout(w, h));

        assert_eq!(report.reference, "C0");
        assert_eq!(report.rois.len(), 9);

        let centre = report.get("C0").unwrap();
        assert_eq!(centre.mean(FilterColor::R), 200.0);
        assert_eq!(centre.ratios, [1.0; 4]);

        let corner = report.get("Q2").unwrap();
        assert_eq!(corner.mean(FilterColor::R), 100.0);
        assert_eq!(corner.ratio(FilterColor::R), 0.5);
        assert_eq!(corner.ratio(FilterColor::Gr), 1.0);
        assert_eq!(corner.mean(FilterColor::B), 60.0);

        let lines = report.summary_lines();
        assert_eq!(lines[0], "C0  (R/Gr/Gb/B): 100.0%, 100.0%, 100.0%, 100.0%");
        assert!(lines[2].starts_with("Q2  (R/Gr/Gb/B): 50.0%"));
    }

    #[test]
    fn falls_back_to_first_roi_without_centre() {
        let planes = extract(&vignetted_frame()).unwrap();
        let mut rois = RoiSet::new(20, 20);
        rois.add("edge", Point::new(2, 2), (4, 4));
        rois.add("mid", Point::new(10, 10), (4, 4));
        let report = ShadingReport::measure(&planes, &rois);

        assert_eq!(report.reference, "edge");
        assert_eq!(report.get("mid").unwrap().ratio(FilterColor::R), 2.0);
    }

    #[test]
    fn empty_region_has_zero_mean() {
        let planes = extract(&vignetted_frame()).unwrap();
        let plane = planes.top_left();
        assert_eq!(region_mean(plane, Point::new(5, 5), Point::new(5, 9)), 0.0);
        assert_eq!(region_mean(plane, Point::new(30, 0), Point::new(40, 4)), 0.0);
    }
}
