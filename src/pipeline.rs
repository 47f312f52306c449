use crate::config::PipelineConfig;
use crate::corners::CornerDetector;
use crate::debug_dump::DebugDump;
use crate::error::ScanError;
use crate::geometry::CornerSet;
use crate::preprocessing::steps::threshold::{binarize, BINARY_THRESHOLD};
use crate::preprocessing::{Preprocessor, StepTiming};
use crate::rectify;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::time::Instant;

/// How the page image was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Corners were found and the preprocessed image was warped flat
    Rectified { corners: CornerSet },
    /// No corners were found; the raw input was used as-is
    Fallback,
    /// Corners were found but spanned no usable page; the raw input was used
    DegenerateFallback { reason: String },
}

/// Result of a page extraction including stage timings
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Binary page image (not serialized)
    #[serde(skip)]
    pub image: GrayImage,
    pub outcome: Outcome,
    pub width: u32,
    pub height: u32,
    /// Total time in milliseconds
    pub total_time_ms: u64,
    /// Preprocessing steps followed by detection, rectification and binarization
    pub stages: Vec<StepTiming>,
}

/// Preprocess, find corners, rectify, binarize
#[derive(Debug, Clone)]
pub struct PageExtractor {
    preprocessor: Preprocessor,
    detector: CornerDetector,
    debug: Option<DebugDump>,
}

impl PageExtractor {
    /// Validate the configuration and build the extractor
    pub fn new(config: PipelineConfig) -> Result<Self, ScanError> {
        config.validate()?;
        Ok(Self {
            preprocessor: Preprocessor::new(config.steps),
            detector: CornerDetector::new(config.detector),
            debug: config.debug_dir.map(DebugDump::new),
        })
    }

    /// Extract the page from `raw`.
    ///
    /// Missing corners fall back to the raw image. Degenerate corners are an
    /// error; see [`PageExtractor::extract_or_fallback`] to treat them the
    /// same as missing corners.
    pub fn extract(&self, raw: &DynamicImage) -> Result<Extraction, ScanError> {
        self.run(raw, false)
    }

    /// Like [`PageExtractor::extract`] but degenerate geometry also falls
    /// back to the raw image
    pub fn extract_or_fallback(&self, raw: &DynamicImage) -> Result<Extraction, ScanError> {
        self.run(raw, true)
    }

    fn run(&self, raw: &DynamicImage, fallback_on_degenerate: bool) -> Result<Extraction, ScanError> {
        let start = Instant::now();
        tracing::info!("Extracting page from {}x{} image", raw.width(), raw.height());

        let preprocessed = self.preprocessor.process(raw.clone())?;
        let mut stages = preprocessed.steps;

        if let Some(debug) = &self.debug {
            debug.save("preprocessed", &preprocessed.image);
            let edges = self.detector.edge_map(&preprocessed.image);
            debug.save("edges", &DynamicImage::ImageLuma8(edges));
        }

        let corners = timed(&mut stages, "detect_corners", || {
            self.detector.detect(&preprocessed.image)
        });

        let (page, outcome) = match corners {
            Some(corners) => {
                let rectified = timed(&mut stages, "rectify", || {
                    rectify::rectify(&preprocessed.image, &corners)
                });
                match rectified {
                    Ok(page) => {
                        if let Some(debug) = &self.debug {
                            debug.save("rectified", &page);
                        }
                        (page, Outcome::Rectified { corners })
                    }
                    Err(err) if fallback_on_degenerate && err.is_recoverable() => {
                        tracing::warn!("{}; using the unmodified image", err);
                        (
                            raw.clone(),
                            Outcome::DegenerateFallback {
                                reason: err.to_string(),
                            },
                        )
                    }
                    Err(err) => return Err(err),
                }
            }
            None => {
                tracing::warn!("No page corners found; using the unmodified image");
                (raw.clone(), Outcome::Fallback)
            }
        };

        let image = timed(&mut stages, "binarize", || {
            binarize(&page.to_luma8(), BINARY_THRESHOLD)
        });
        if let Some(debug) = &self.debug {
            debug.save("binary", &DynamicImage::ImageLuma8(image.clone()));
        }

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Page extracted in {}ms: {}x{} ({})",
            total_time_ms,
            image.width(),
            image.height(),
            outcome.name()
        );

        Ok(Extraction {
            width: image.width(),
            height: image.height(),
            image,
            outcome,
            total_time_ms,
            stages,
        })
    }
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Rectified { .. } => "rectified",
            Outcome::Fallback => "fallback",
            Outcome::DegenerateFallback { .. } => "degenerate_fallback",
        }
    }
}

fn timed<T>(timings: &mut Vec<StepTiming>, name: &str, f: impl FnOnce() -> T) -> T {
    let stage_start = Instant::now();
    let result = f();
    timings.push(StepTiming {
        name: name.to_string(),
        time_ms: stage_start.elapsed().as_millis() as u64,
    });
    result
}

/// Extract and binarize the page in `raw` with the default configuration
pub fn extract_document(raw: &DynamicImage) -> Result<GrayImage, ScanError> {
    let extractor = PageExtractor::new(PipelineConfig::default())?;
    Ok(extractor.extract(raw)?.image)
}
