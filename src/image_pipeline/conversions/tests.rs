use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::conversions::RawSplitPipeline;
use crate::image_pipeline::output::{ImageWriter, OutputFormat, SplitConfig};
use crate::image_pipeline::raw::{BayerPhase, RawFrame, RawFrameReader, RawGeometry};

#[derive(Debug, Clone, PartialEq)]
enum Written {
    Gray { width: usize, height: usize },
    Rgb { width: usize, height: usize, data: Vec<u8> },
}

struct MockReader {
    should_fail: bool,
    mock_frame: Option<RawFrame>,
}

impl RawFrameReader for MockReader {
    fn read_frame(&self, _data: &[u8]) -> Result<RawFrame> {
        if self.should_fail {
            return Err(ConversionError::DecodeError("Mock decode error".to_string()));
        }
        Ok(self.mock_frame.clone().unwrap_or_else(|| {
            RawFrame::new(
                vec![0u16; 8 * 8],
                RawGeometry { width: 8, height: 8, bit_depth: 10, phase: BayerPhase::R },
            )
        }))
    }
}

struct MockWriter {
    should_fail: bool,
    written: Arc<Mutex<Vec<Written>>>,
}

impl ImageWriter for MockWriter {
    fn extension(&self) -> &'static str {
        "mock"
    }

    fn write_gray(&self, width: usize, height: usize, _data: &[u8], output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        output.write_all(b"gray")?;
        self.written.lock().unwrap().push(Written::Gray { width, height });
        Ok(())
    }

    fn write_rgb(&self, width: usize, height: usize, data: &[u8], output: &mut dyn Write) -> Result<()> {
        if self.should_fail {
            return Err(ConversionError::EncodeError("Mock encode error".to_string()));
        }
        output.write_all(b"rgb")?;
        self.written.lock().unwrap().push(Written::Rgb { width, height, data: data.to_vec() });
        Ok(())
    }
}

fn pipeline(
    reader_fails: bool,
    writer_fails: bool,
    frame: Option<RawFrame>,
    config: SplitConfig,
) -> (RawSplitPipeline<MockReader, MockWriter>, Arc<Mutex<Vec<Written>>>) {
    let written = Arc::new(Mutex::new(Vec::new()));
    let reader = MockReader { should_fail: reader_fails, mock_frame: frame };
    let writer = MockWriter { should_fail: writer_fails, written: written.clone() };
    (RawSplitPipeline::with_custom(reader, writer, config), written)
}

/// 4x4 RGGB frame with R=400, Gr=200, Gb=100, B=40 at 10 bits.
fn tile_frame() -> RawFrame {
    let tile = [400u16, 200, 100, 40];
    let pixels = (0..16).map(|i| tile[((i / 4) % 2) * 2 + (i % 4) % 2]).collect();
    RawFrame::new(pixels, RawGeometry { width: 4, height: 4, bit_depth: 10, phase: BayerPhase::R })
}

#[test]
fn split_returns_planes_and_preview() {
    let (pipeline, _) = pipeline(false, false, Some(tile_frame()), SplitConfig::default());
    let outcome = pipeline.split(b"fake raw data").unwrap();

    assert_eq!(outcome.planes.means(), [400.0, 200.0, 100.0, 40.0]);
    let preview = outcome.preview.unwrap();
    assert_eq!((preview.width, preview.height), (4, 4));
    assert!(outcome.shading.is_none());
}

#[test]
fn preview_skipped_when_not_saved() {
    let config = SplitConfig::builder()
        .save_raw_gray(false)
        .save_raw_rgb(false)
        .shading_report(true)
        .build();
    let (pipeline, _) = pipeline(false, false, None, config);
    let outcome = pipeline.split(b"fake raw data").unwrap();

    assert!(outcome.preview.is_none());
    assert_eq!(outcome.shading.unwrap().rois.len(), 9);
}

#[test]
fn reader_failure_propagates() {
    let (pipeline, written) = pipeline(true, false, None, SplitConfig::default());
    let result = pipeline.split(b"fake raw data");

    assert!(matches!(result.unwrap_err(), ConversionError::DecodeError(_)));
    assert!(written.lock().unwrap().is_empty());
}

#[test]
fn extractor_failure_propagates() {
    let bad = RawFrame::new(
        vec![0u16; 15],
        RawGeometry { width: 4, height: 4, bit_depth: 10, phase: BayerPhase::R },
    );
    let (pipeline, _) = pipeline(false, false, Some(bad), SplitConfig::default());
    assert!(matches!(pipeline.split(b"x").unwrap_err(), ConversionError::ShapeMismatch { .. }));
}

#[test]
fn writes_enabled_outputs_in_color_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = SplitConfig::builder().output_dir(Some(dir.path().join("out"))).build();
    let (pipeline, written) = pipeline(false, false, Some(tile_frame()), config);

    let input = dir.path().join("scene_01.raw");
    std::fs::write(&input, b"fake raw data").unwrap();
    let report = pipeline.split_file(&input).unwrap();

    let names: Vec<String> = report
        .written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "scene_01_RAW_R.mock",
            "scene_01_RAW_Gr.mock",
            "scene_01_RAW_Gb.mock",
            "scene_01_RAW_B.mock",
            "scene_01_RAW_Gray.mock",
            "scene_01_RAW_RGB.mock",
        ]
    );
    for path in &report.written {
        assert!(path.starts_with(dir.path().join("out")));
        assert!(path.exists());
    }
    assert_eq!(report.base_name, "scene_01");
    assert_eq!(report.mean_summary(), "Raw_Mean (R/Gr/Gb/B): 400.0, 200.0, 100.0, 40.0");

    let written = written.lock().unwrap();
    assert_eq!(written.len(), 6);
    // R plane: 400 >> 2 = 100 in the red channel
    assert_eq!(written[0], Written::Rgb { width: 2, height: 2, data: [100, 0, 0].repeat(4) });
    // B plane: 40 >> 2 = 10 in the blue channel
    assert_eq!(written[3], Written::Rgb { width: 2, height: 2, data: [0, 0, 10].repeat(4) });
    assert_eq!(written[4], Written::Gray { width: 4, height: 4 });
}

#[test]
fn default_output_dir_is_image_repo_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let config = SplitConfig::builder()
        .save_raw_gray(false)
        .save_raw_rgb(false)
        .build();
    let (pipeline, _) = pipeline(false, false, None, config);

    let input = dir.path().join("dark.raw");
    std::fs::write(&input, b"fake raw data").unwrap();
    let report = pipeline.split_file(&input).unwrap();

    assert_eq!(report.output_dir, dir.path().join("_imageRepo").join("dark"));
    assert_eq!(report.written.len(), 4);
    assert!(report.output_dir.join("dark_RAW_Gb.mock").exists());
}

#[test]
fn missing_input_is_read_error() {
    let (pipeline, _) = pipeline(false, false, None, SplitConfig::default());
    let result = pipeline.split_file("/nonexistent/input.raw");
    assert!(matches!(result.unwrap_err(), ConversionError::InputReadError(_)));
}

#[test]
fn writer_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let config = SplitConfig::builder().output_dir(Some(dir.path().to_path_buf())).build();
    let (pipeline, _) = pipeline(false, true, None, config);

    let input = dir.path().join("frame.raw");
    std::fs::write(&input, b"fake raw data").unwrap();
    assert!(matches!(pipeline.split_file(&input).unwrap_err(), ConversionError::EncodeError(_)));
}

#[test]
fn flat_dump_round_trip_through_real_writers() {
    let dir = tempfile::tempdir().unwrap();
    let geometry = RawGeometry { width: 16, height: 12, bit_depth: 12, phase: BayerPhase::Gb };
    let bytes: Vec<u8> = (0..16 * 12).flat_map(|i| ((i * 17 % 4096) as u16).to_le_bytes()).collect();
    let input = dir.path().join("sensor.raw");
    std::fs::write(&input, &bytes).unwrap();

    for format in [OutputFormat::Jpeg, OutputFormat::Tiff] {
        let config = SplitConfig::builder()
            .output_format(format)
            .output_dir(Some(dir.path().join(format!("{:?}", format))))
            .build();
        let reader = crate::image_pipeline::raw::FlatRawReader::new(geometry);
        let pipeline = RawSplitPipeline::with_custom(reader, config.writer(), config);

        let report = pipeline.split_file(&input).unwrap();
        assert_eq!(report.written.len(), 6);
        for path in &report.written {
            assert!(std::fs::metadata(path).unwrap().len() > 0);
        }
    }

    let pipeline = RawSplitPipeline::new(geometry, SplitConfig::default());
    let outcome = pipeline.split(&bytes).unwrap();
    assert_eq!(outcome.planes.plane_size(), (8, 6));
}
