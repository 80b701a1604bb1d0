//! Type definitions for the diagnosis pipeline

pub mod diagnosis;
pub mod weather;

pub use diagnosis::{ClassScore, DiagnosisReport, PredictionResult, RiskAssessment, RiskLevel};
pub use weather::{Location, WeatherObservation};
