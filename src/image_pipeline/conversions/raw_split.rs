use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::image_pipeline::{
    bayer_split::{BayerPlaneExtractor, BayerPlanes},
    common::error::{ConversionError, Result},
    debayer::{CpuDebayer, RgbImageData},
    output::{ImageWriter, JpegWriter, SplitConfig, tint_plane},
    raw::{FlatRawReader, RawFrameReader, RawGeometry},
    shading::{RoiSet, ShadingReport},
};

/// Folder created next to the input when no output directory is configured.
const IMAGE_REPO_DIR: &str = "_imageRepo";

/// In-memory result of splitting one RAW frame
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub planes: BayerPlanes,
    /// Demosaiced preview, present when a gray or RGB output is enabled
    pub preview: Option<RgbImageData>,
    pub shading: Option<ShadingReport>,
}

/// What was written for one input file
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub input: PathBuf,
    pub base_name: String,
    pub output_dir: PathBuf,
    /// Pre-normalisation means in R, Gr, Gb, B order
    pub means: [f64; 4],
    pub written: Vec<PathBuf>,
    pub shading: Option<ShadingReport>,
}

impl SplitReport {
    pub fn mean_summary(&self) -> String {
        format!(
            "Raw_Mean (R/Gr/Gb/B): {:.1}, {:.1}, {:.1}, {:.1}",
            self.means[0], self.means[1], self.means[2], self.means[3]
        )
    }
}

pub struct RawSplitPipeline<R: RawFrameReader, W: ImageWriter> {
    reader: R,
    writer: W,
    extractor: BayerPlaneExtractor,
    debayer: CpuDebayer,
    config: SplitConfig,
}

impl RawSplitPipeline<FlatRawReader, JpegWriter> {
    /// Pipeline for headerless dumps of the given geometry, writing JPEG.
    pub fn new(geometry: RawGeometry, config: SplitConfig) -> Self {
        let writer = JpegWriter::new(config.jpeg_quality);
        Self::with_custom(FlatRawReader::new(geometry), writer, config)
    }
}

impl<R: RawFrameReader, W: ImageWriter> RawSplitPipeline<R, W> {
    pub fn with_custom(reader: R, writer: W, config: SplitConfig) -> Self {
        Self {
            reader,
            writer,
            extractor: BayerPlaneExtractor::new(),
            debayer: CpuDebayer::new(),
            config,
        }
    }

    /// Decodes `input_data` and splits it, without touching the filesystem.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn split(&self, input_data: &[u8]) -> Result<SplitOutcome> {
        let frame = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.read_frame(input_data)?
        };

        let planes = {
            let _span = tracing::info_span!("extract_planes", width = frame.width, height = frame.height).entered();
            self.extractor.extract(&frame)?
        };

        let preview = if self.config.needs_debayer() {
            let _span = tracing::info_span!("debayer").entered();
            Some(self.debayer.process(&frame)?)
        } else {
            None
        };

        let shading = self.config.shading_report.then(|| {
            let _span = tracing::info_span!("shading").entered();
            let (width, height) = planes.plane_size();
            ShadingReport::measure(&planes, &RoiSet::shading_layout(width, height))
        });

        let means = planes.means();
        info!(
            width = frame.width,
            height = frame.height,
            phase = %frame.phase,
            "Split complete, means R={:.1} Gr={:.1} Gb={:.1} B={:.1}",
            means[0],
            means[1],
            means[2],
            means[3]
        );

        Ok(SplitOutcome { planes, preview, shading })
    }

    /// Splits the file at `input_path` and writes the enabled outputs.
    #[instrument(skip(self, input_path))]
    pub fn split_file<P: AsRef<Path>>(&self, input_path: P) -> Result<SplitReport> {
        let input_path = input_path.as_ref();
        info!(input = %input_path.display(), "Splitting file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                ConversionError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        let outcome = self.split(&input_data)?;

        let base_name = base_name(input_path);
        let output_dir = self.output_dir_for(input_path, &base_name);
        std::fs::create_dir_all(&output_dir).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", output_dir.display(), e))
        })?;

        let written = {
            let _span = tracing::info_span!("write_outputs").entered();
            self.write_outputs(&outcome, &output_dir, &base_name)?
        };

        Ok(SplitReport {
            input: input_path.to_path_buf(),
            base_name,
            output_dir,
            means: outcome.planes.means(),
            written,
            shading: outcome.shading,
        })
    }

    /// Writes the planes and previews enabled in the config; returns the paths written.
    pub fn write_outputs(&self, outcome: &SplitOutcome, output_dir: &Path, base_name: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if self.config.save_bayer_color {
            for plane in outcome.planes.in_color_order() {
                let path = self.output_path(output_dir, base_name, plane.color.name());
                let rgb = tint_plane(plane);
                self.write_file(&path, |file| self.writer.write_rgb(plane.width, plane.height, &rgb, file))?;
                written.push(path);
            }
        }

        if let Some(preview) = &outcome.preview {
            if self.config.save_raw_gray {
                let path = self.output_path(output_dir, base_name, "Gray");
                let gray = preview.to_gray();
                self.write_file(&path, |file| self.writer.write_gray(preview.width, preview.height, &gray, file))?;
                written.push(path);
            }
            if self.config.save_raw_rgb {
                let path = self.output_path(output_dir, base_name, "RGB");
                self.write_file(&path, |file| {
                    self.writer.write_rgb(preview.width, preview.height, &preview.data, file)
                })?;
                written.push(path);
            }
        }

        Ok(written)
    }

    fn output_path(&self, output_dir: &Path, base_name: &str, suffix: &str) -> PathBuf {
        output_dir.join(format!("{}_RAW_{}.{}", base_name, suffix, self.writer.extension()))
    }

    fn write_file<F>(&self, path: &Path, encode: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> Result<()>,
    {
        let mut file = File::create(path)
            .map_err(|e| ConversionError::OutputWriteError(format!("{}: {}", path.display(), e)))?;
        encode(&mut file)?;
        debug!(output = %path.display(), "Wrote image");
        Ok(())
    }

    /// Configured directory, else `<input dir>/_imageRepo/<base name>`.
    fn output_dir_for(&self, input_path: &Path, base_name: &str) -> PathBuf {
        match &self.config.output_dir {
            Some(dir) => dir.clone(),
            None => input_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(IMAGE_REPO_DIR)
                .join(base_name),
        }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SplitConfig) {
        self.config = config;
    }
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "raw".to_string())
}
