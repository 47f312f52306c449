//! Camera document scanner
//!
//! Finds a rectangular page in a photograph, flattens its perspective and
//! returns a binarized scan:
//!
//! raw image -> [`preprocessing`] -> [`corners`] -> [`rectify`] -> binary page
//!
//! [`PageExtractor`] runs the whole chain; [`extract_document`] does so with
//! the default configuration.

pub mod codec;
pub mod config;
pub mod corners;
pub mod debug_dump;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod preprocessing;
pub mod rectify;

pub use config::{DetectorConfig, PipelineConfig};
pub use error::ScanError;
pub use geometry::{order_points, CornerSet, OrderedRect, Point};
pub use pipeline::{extract_document, Extraction, Outcome, PageExtractor};
pub use preprocessing::PreprocessStep;
