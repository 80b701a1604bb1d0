//! Crop Disease Diagnosis Pipeline Library
//!
//! Diagnoses crop-leaf diseases from photographs using a test-time
//! augmentation ensemble over an ONNX classifier, and fuses the diagnosis
//! with weather observations into a graded risk advisory.

pub mod config;
pub mod disease;
pub mod error;
pub mod imaging;
pub mod metrics;
pub mod models;
pub mod risk;
pub mod types;
pub mod weather;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use metrics::DiagnosisMetrics;
pub use models::EnsemblePredictor;
pub use risk::RiskEngine;
pub use types::{
    DiagnosisReport, Location, PredictionResult, RiskAssessment, RiskLevel, WeatherObservation,
};
pub use weather::{StaticWeatherProvider, WeatherProvider};
