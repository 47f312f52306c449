//! Image preprocessing ahead of corner detection
//!
//! Steps are supplied by the caller as an ordered list and applied in turn.

pub mod pipeline;
pub mod steps;

pub use pipeline::{PreprocessStep, PreprocessingResult, Preprocessor, StepTiming};
