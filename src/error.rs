//! Error types for the diagnosis pipeline.

use thiserror::Error;

/// Error taxonomy for the diagnosis core.
///
/// Low confidence is deliberately not represented here: an unreliable
/// prediction is still returned to the caller, flagged via
/// `PredictionResult::is_confident`.
#[derive(Error, Debug)]
pub enum Error {
    /// Input bytes are not a decodable image. A caller input error; never
    /// retried internally.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// No classifier artifact is loaded. Fatal at process level.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The execution backend rejected a well-formed input. Surfaced as-is;
    /// retrying a deterministic computation on the same input will not
    /// change the outcome.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Invalid sidecar or configuration data (missing class table, class
    /// count mismatch, malformed JSON).
    #[error("configuration error: {0}")]
    Config(String),

    /// IO failure while reading the artifact or its sidecars.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ort::Error> for Error {
    fn from(err: ort::Error) -> Self {
        Error::Inference(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Specialized Result type for diagnosis operations.
pub type Result<T> = std::result::Result<T, Error>;
