//! Intermediate images written out for inspecting a scan

use image::{DynamicImage, ImageFormat};
use std::path::PathBuf;

/// Writes stage images as PNG files into one directory.
///
/// Failures are logged and otherwise ignored: a scan never fails because its
/// diagnostics could not be written. Extractions sharing a directory
/// overwrite each other's files.
#[derive(Debug, Clone)]
pub struct DebugDump {
    dir: PathBuf,
}

impl DebugDump {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save `image` as `<stage>.png`
    pub fn save(&self, stage: &str, image: &DynamicImage) {
        let path = self.dir.join(format!("{}.png", stage));
        let result = std::fs::create_dir_all(&self.dir)
            .map_err(|e| e.to_string())
            .and_then(|()| {
                image
                    .save_with_format(&path, ImageFormat::Png)
                    .map_err(|e| e.to_string())
            });
        match result {
            Ok(()) => tracing::debug!("Wrote {}", path.display()),
            Err(e) => tracing::warn!("Could not write {}: {}", path.display(), e),
        }
    }
}
