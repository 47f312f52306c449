use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Degenerate page geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::Decode(_) => "DECODE_ERROR",
            ScanError::Encode(_) => "ENCODE_ERROR",
            ScanError::Configuration(_) => "CONFIGURATION_ERROR",
            ScanError::DegenerateGeometry(_) => "DEGENERATE_GEOMETRY",
            ScanError::Preprocessing(_) => "PREPROCESSING_ERROR",
            ScanError::Io(_) => "IO_ERROR",
        }
    }

    /// Whether the caller can still produce a best-effort page.
    ///
    /// Only degenerate geometry qualifies: the unrectified image is still usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScanError::DegenerateGeometry(_))
    }
}
