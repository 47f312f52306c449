use crate::error::ScanError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use super::steps;

/// A single configured preprocessing transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PreprocessStep {
    /// Scale to a fixed height, keeping the aspect ratio
    Resize { height: u32 },
    /// Edge-preserving median smoothing; higher strength means a wider window
    Denoise { strength: u32 },
    /// Collapse to a single luma channel
    Grayscale,
    /// Global binarization at the Otsu level
    OtsuThreshold,
}

impl PreprocessStep {
    /// Step name as used in timings and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "resize",
            Self::Denoise { .. } => "denoise",
            Self::Grayscale => "grayscale",
            Self::OtsuThreshold => "otsu",
        }
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        match self {
            Self::Resize { height: 0 } => Err(ScanError::Configuration(
                "resize target height must be positive".to_string(),
            )),
            Self::Denoise { strength: 0 } => Err(ScanError::Configuration(
                "denoise strength must be positive".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn apply(&self, image: DynamicImage) -> Result<DynamicImage, ScanError> {
        match *self {
            Self::Resize { height } => steps::resize::apply(image, height),
            Self::Denoise { strength } => steps::denoise::apply(image, strength),
            Self::Grayscale => steps::grayscale::apply(image),
            Self::OtsuThreshold => steps::threshold::apply_otsu(image),
        }
    }
}

impl fmt::Display for PreprocessStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resize { height } => write!(f, "resize:{}", height),
            Self::Denoise { strength } => write!(f, "denoise:{}", strength),
            other => f.write_str(other.name()),
        }
    }
}

/// Parse `resize:1280`, `denoise:9`, `grayscale` or `otsu`
impl FromStr for PreprocessStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (name, arg) = match lowered.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (lowered.as_str(), None),
        };

        let number = |what: &str| -> Result<u32, String> {
            let raw = arg.ok_or_else(|| format!("step '{}' needs a {}", name, what))?;
            raw.parse::<u32>()
                .map_err(|e| format!("invalid {} '{}' for step '{}': {}", what, raw, name, e))
        };

        match name {
            "resize" => Ok(Self::Resize {
                height: number("height")?,
            }),
            "denoise" => Ok(Self::Denoise {
                strength: number("strength")?,
            }),
            "grayscale" if arg.is_none() => Ok(Self::Grayscale),
            "otsu" if arg.is_none() => Ok(Self::OtsuThreshold),
            _ => Err(format!("unknown preprocessing step '{}'", s)),
        }
    }
}

/// Timing information for a single stage
#[derive(Debug, Clone, Serialize)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Result of preprocessing including timing stats
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessingResult {
    /// Preprocessed image (not serialized)
    #[serde(skip)]
    pub image: DynamicImage,
    /// Total preprocessing time in milliseconds
    pub total_time_ms: u64,
    /// Individual step timings
    pub steps: Vec<StepTiming>,
}

/// Applies a caller-supplied sequence of steps
#[derive(Debug, Clone)]
pub struct Preprocessor {
    steps: Vec<PreprocessStep>,
}

impl Preprocessor {
    /// Steps are taken as given; `PipelineConfig::validate` checks them
    pub fn new(steps: Vec<PreprocessStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[PreprocessStep] {
        &self.steps
    }

    /// Run every step in order, each consuming the previous output
    pub fn process(&self, image: DynamicImage) -> Result<PreprocessingResult, ScanError> {
        let start = Instant::now();
        let mut timings = Vec::with_capacity(self.steps.len());

        let mut img = image;
        for step in &self.steps {
            let step_start = Instant::now();
            img = step.apply(img)?;
            tracing::debug!(
                "Preprocessing step {} -> {}x{}",
                step,
                img.width(),
                img.height()
            );
            timings.push(StepTiming {
                name: step.name().to_string(),
                time_ms: step_start.elapsed().as_millis() as u64,
            });
        }

        Ok(PreprocessingResult {
            image: img,
            total_time_ms: start.elapsed().as_millis() as u64,
            steps: timings,
        })
    }
}
