use anyhow::Context;
use clap::Parser;
use docscan::{codec, DetectorConfig, PageExtractor, PipelineConfig, PreprocessStep};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(about = "Find the page in a photo, flatten it and write a binarized scan")]
#[command(version)]
pub struct Args {
    /// Photo to scan (any format the image crate decodes)
    pub input: PathBuf,

    /// Where to write the scan; format follows the extension (PNG by default)
    pub output: PathBuf,

    /// Preprocessing steps, in order (resize:<height>, denoise:<strength>, grayscale, otsu)
    #[arg(
        long = "step",
        env = "DOCSCAN_STEPS",
        value_delimiter = ',',
        default_values_t = [
            PreprocessStep::Resize { height: 1280 },
            PreprocessStep::Denoise { strength: 9 },
        ]
    )]
    pub steps: Vec<PreprocessStep>,

    /// Hough distance resolution in pixels
    #[arg(long, env = "DOCSCAN_RHO_RESOLUTION", default_value = "1.0")]
    pub rho_resolution: f32,

    /// Number of Hough angle buckets over 180 degrees
    #[arg(long, env = "DOCSCAN_THETA_RESOLUTION", default_value = "180")]
    pub theta_resolution: u32,

    /// Minimum accumulator votes for a line
    #[arg(long, env = "DOCSCAN_VOTE_THRESHOLD", default_value = "100")]
    pub vote_threshold: u32,

    /// Canny low hysteresis threshold
    #[arg(long, env = "DOCSCAN_CANNY_LOW", default_value = "50.0")]
    pub canny_low: f32,

    /// Canny high hysteresis threshold
    #[arg(long, env = "DOCSCAN_CANNY_HIGH", default_value = "150.0")]
    pub canny_high: f32,

    /// Drop weaker near-parallel lines within this many pixels of a stronger one (0 = off)
    #[arg(long, env = "DOCSCAN_SUPPRESSION_RADIUS", default_value = "8.0")]
    pub suppression_radius: f32,

    /// Votes a line needs, as a multiple of what edge density alone gives it
    #[arg(long, env = "DOCSCAN_MIN_LINE_CONTRAST", default_value = "3.0")]
    pub min_line_contrast: f32,

    /// Write intermediate images (preprocessed, edges, rectified, binary) here
    #[arg(long, env = "DOCSCAN_DEBUG_DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Use the unrectified image when detected corners span no usable page
    #[arg(long, env = "DOCSCAN_FALLBACK_ON_DEGENERATE")]
    pub fallback_on_degenerate: bool,

    /// Print a JSON report of the extraction to stdout
    #[arg(long)]
    pub report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub pipeline: PipelineConfig,
    pub fallback_on_degenerate: bool,
    pub report: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input: args.input,
            output: args.output,
            pipeline: PipelineConfig {
                steps: args.steps,
                detector: DetectorConfig {
                    rho_resolution: args.rho_resolution,
                    theta_resolution: args.theta_resolution,
                    vote_threshold: args.vote_threshold,
                    canny_low: args.canny_low,
                    canny_high: args.canny_high,
                    suppression_radius: args.suppression_radius,
                    min_line_contrast: args.min_line_contrast,
                },
                debug_dir: args.debug_dir,
            },
            fallback_on_degenerate: args.fallback_on_degenerate,
            report: args.report,
        }
    }
}

fn run(config: Config) -> anyhow::Result<()> {
    let extractor = PageExtractor::new(config.pipeline)?;

    let bytes = std::fs::read(&config.input)
        .with_context(|| format!("Failed to read {}", config.input.display()))?;
    let raw = codec::decode(&bytes)?;

    let extraction = if config.fallback_on_degenerate {
        extractor.extract_or_fallback(&raw)?
    } else {
        extractor.extract(&raw)?
    };

    let encoded = codec::encode(&extraction.image, codec::format_for_path(&config.output))?;
    std::fs::write(&config.output, encoded)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    tracing::info!(
        "Wrote {}x{} scan to {}",
        extraction.width,
        extraction.height,
        config.output.display()
    );

    if config.report {
        println!("{}", serde_json::to_string_pretty(&extraction)?);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting docscan v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from(args);
    run(config).inspect_err(|e| {
        if let Some(scan_error) = e.downcast_ref::<docscan::ScanError>() {
            tracing::error!("{} ({})", scan_error, scan_error.code());
        } else {
            tracing::error!("{:#}", e);
        }
    })
}
