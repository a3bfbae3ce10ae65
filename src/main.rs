use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

use bayer_planes_rs::image_pipeline::{
    BayerPhase, FlatRawReader, ImageWriter, OutputFormat, RawFormatFile, RawFrameReader, RawGeometry,
    RawLoaderReader, RawSplitPipeline, SplitConfig,
};
use bayer_planes_rs::logger::{self, error, info, warn};

/// Extensions read as headerless sensor dumps when `--reader auto`.
const FLAT_EXTENSIONS: [&str; 3] = ["raw", "bin", "dat"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReaderKind {
    /// Flat dump for .raw/.bin/.dat, camera RAW otherwise
    Auto,
    /// Headerless little-endian sensor dump
    Flat,
    /// Camera RAW container (ARW, NEF, DNG, ...)
    Camera,
}

#[derive(Parser)]
#[command(name = "bayer-planes")]
#[command(version, about = "Split Bayer RAW frames into their four colour planes", long_about = None)]
struct Cli {
    /// RAW files to split
    #[arg(value_name = "RAW", required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with the default RAW format
    #[arg(long, value_name = "FILE")]
    conf: Option<PathBuf>,

    /// Width of the RAW frame in pixels
    #[arg(long, value_name = "N", requires = "height")]
    width: Option<usize>,

    /// Height of the RAW frame in pixels
    #[arg(long, value_name = "N", requires = "width")]
    height: Option<usize>,

    /// Colour of the top-left pixel: R, Gr, Gb or B
    #[arg(long, value_name = "PHASE")]
    bayer: Option<BayerPhase>,

    /// Bits per sample
    #[arg(long, value_name = "N")]
    bits: Option<u32>,

    /// Directory for output files (default: <input dir>/_imageRepo/<name>)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Keep going when a file fails
    #[arg(long)]
    batch: bool,

    /// Output format: jpeg or tiff
    #[arg(long, value_name = "FORMAT", default_value = "jpeg")]
    format: OutputFormat,

    /// JPEG quality (1-100)
    #[arg(long, value_name = "N")]
    quality: Option<u8>,

    /// How to decode inputs
    #[arg(long, value_enum, default_value_t = ReaderKind::Auto)]
    reader: ReaderKind,

    /// Print per-ROI lens shading ratios
    #[arg(long)]
    shading: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

type DynPipeline = RawSplitPipeline<Box<dyn RawFrameReader + Send + Sync>, Box<dyn ImageWriter + Send + Sync>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(if cli.verbose { "debug" } else { "info" });

    let (geometry, config) = resolve_settings(&cli)?;
    info!(
        "RAW format: {}x{} {}-bit, phase {}",
        geometry.width, geometry.height, geometry.bit_depth, geometry.phase
    );

    let writer = config.writer();
    let flat = build_pipeline(Box::new(FlatRawReader::new(geometry)), config.writer(), &config);
    let camera = build_pipeline(Box::new(RawLoaderReader), writer, &config);

    let mut failed = 0usize;
    for input in &cli.inputs {
        let pipeline = if use_flat_reader(cli.reader, input) { &flat } else { &camera };
        match pipeline.split_file(input) {
            Ok(report) => {
                println!("{}: {}", input.display(), report.mean_summary());
                if let Some(shading) = &report.shading {
                    for line in shading.summary_lines() {
                        println!("  {}", line);
                    }
                }
                info!("Wrote {} files to {}", report.written.len(), report.output_dir.display());
            }
            Err(e) if cli.batch => {
                error!("{}: {}", input.display(), e);
                failed += 1;
            }
            Err(e) => return Err(e).with_context(|| format!("failed to split {}", input.display())),
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed", failed, cli.inputs.len());
    }
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn resolve_settings(cli: &Cli) -> anyhow::Result<(RawGeometry, SplitConfig)> {
    let mut geometry = RawGeometry::default();
    let mut config = SplitConfig::default();

    if let Some(path) = &cli.conf {
        let file = RawFormatFile::load(path)?;
        geometry = file.apply_geometry(geometry);
        config = file.apply_outputs(config);
    }

    if let (Some(width), Some(height)) = (cli.width, cli.height) {
        geometry.width = width;
        geometry.height = height;
    }
    if let Some(bits) = cli.bits {
        geometry.bit_depth = bits;
    }
    if let Some(phase) = cli.bayer {
        geometry.phase = phase;
    }

    let mut builder = SplitConfig::builder()
        .output_format(cli.format)
        .save_bayer_color(config.save_bayer_color)
        .save_raw_gray(config.save_raw_gray)
        .save_raw_rgb(config.save_raw_rgb)
        .output_dir(cli.output.clone())
        .shading_report(cli.shading);
    if let Some(quality) = cli.quality {
        if !(1..=100).contains(&quality) {
            warn!("JPEG quality {} clamped to 1..=100", quality);
        }
        builder = builder.jpeg_quality(quality);
    }

    Ok((geometry, builder.build()))
}

fn build_pipeline(
    reader: Box<dyn RawFrameReader + Send + Sync>,
    writer: Box<dyn ImageWriter + Send + Sync>,
    config: &SplitConfig,
) -> DynPipeline {
    RawSplitPipeline::with_custom(reader, writer, config.clone())
}

fn use_flat_reader(kind: ReaderKind, input: &Path) -> bool {
    match kind {
        ReaderKind::Flat => true,
        ReaderKind::Camera => false,
        ReaderKind::Auto => input
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| FLAT_EXTENSIONS.iter().any(|flat| flat.eq_ignore_ascii_case(ext))),
    }
}
