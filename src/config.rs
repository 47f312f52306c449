use crate::error::ScanError;
use crate::preprocessing::PreprocessStep;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hough line / corner detector parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Distance bucket size of the accumulator, in pixels
    pub rho_resolution: f32,
    /// Number of angle buckets spanning 0-180 degrees
    pub theta_resolution: u32,
    /// Minimum votes for a line to be accepted
    pub vote_threshold: u32,
    /// Canny hysteresis thresholds for the edge map
    pub canny_low: f32,
    pub canny_high: f32,
    /// Weaker near-parallel lines within this many pixels of a kept line
    /// are dropped as duplicates; 0 keeps every accumulator peak
    pub suppression_radius: f32,
    /// How many times the votes that edge density alone would give a line
    /// it must collect to count as a real edge
    pub min_line_contrast: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            rho_resolution: 1.0,
            theta_resolution: 180,
            vote_threshold: 100,
            canny_low: 50.0,
            canny_high: 150.0,
            suppression_radius: 8.0,
            min_line_contrast: 3.0,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.rho_resolution.is_finite() || self.rho_resolution <= 0.0 {
            return Err(ScanError::Configuration(format!(
                "rho resolution must be a positive number, got {}",
                self.rho_resolution
            )));
        }
        if self.theta_resolution == 0 {
            return Err(ScanError::Configuration(
                "theta resolution must be at least 1".to_string(),
            ));
        }
        if self.vote_threshold == 0 {
            return Err(ScanError::Configuration(
                "vote threshold must be positive".to_string(),
            ));
        }
        if !(self.canny_low.is_finite() && self.canny_high.is_finite())
            || self.canny_low < 0.0
            || self.canny_low > self.canny_high
        {
            return Err(ScanError::Configuration(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        for (name, value) in [
            ("suppression radius", self.suppression_radius),
            ("line contrast", self.min_line_contrast),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScanError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Everything the page extraction pipeline needs, supplied up front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub steps: Vec<PreprocessStep>,
    pub detector: DetectorConfig,
    /// Write intermediate images here for inspection; off when `None`
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            steps: vec![
                PreprocessStep::Resize { height: 1280 },
                PreprocessStep::Denoise { strength: 9 },
            ],
            detector: DetectorConfig::default(),
            debug_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Reject invalid parameters before any image is processed.
    ///
    /// This is the only place configuration is checked; the preprocessor and
    /// detector trust what they are given.
    pub fn validate(&self) -> Result<(), ScanError> {
        for step in &self.steps {
            step.validate()?;
        }
        self.detector.validate()
    }
}
