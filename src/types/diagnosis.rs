//! Diagnosis result data structures

use crate::types::weather::WeatherObservation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Healthy,
    Low,
    Moderate,
    High,
    Critical,
    Unknown,
}

impl RiskLevel {
    /// Band a combined risk score into a level.
    ///
    /// Bands are half-open on the lower bound: a score of exactly 0.8 is
    /// CRITICAL, not HIGH. Healthy and Unknown are assigned by the risk
    /// engine directly, never from a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            RiskLevel::Critical
        } else if score >= 0.6 {
            RiskLevel::High
        } else if score >= 0.4 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

/// Weather-conditioned risk assessment for a diagnosed disease
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Combined risk score in [0, 1], rounded to 3 decimals
    pub score: f64,
    /// Discrete risk level derived from the rounded score
    pub level: RiskLevel,
}

/// One entry in the top-k ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    /// Disease class name from the class-index table
    pub label: String,
    /// Softmax probability for this class
    pub probability: f32,
}

/// Result of one ensemble prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted disease class name
    pub label: String,

    /// Index of the predicted class in the class-index table
    pub class_index: usize,

    /// Softmax probability of the predicted class, in [0, 1]
    pub confidence: f32,

    /// Up to five highest-probability classes, sorted non-increasing;
    /// ties keep class-index order
    pub top_k: Vec<ClassScore>,

    /// Whether confidence reached the configured threshold. Advisory:
    /// a low-confidence prediction is still returned, never suppressed.
    pub is_confident: bool,
}

/// Complete diagnosis report handed to downstream consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Unique diagnosis identifier
    pub diagnosis_id: String,

    /// The ensemble prediction
    pub prediction: PredictionResult,

    /// Weather-conditioned risk assessment, when a location was supplied
    pub risk: Option<RiskAssessment>,

    /// The weather observation the assessment was computed against
    pub weather: Option<WeatherObservation>,

    /// Report generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl DiagnosisReport {
    /// Create a new report for a prediction
    pub fn new(prediction: PredictionResult) -> Self {
        Self {
            diagnosis_id: uuid::Uuid::new_v4().to_string(),
            prediction,
            risk: None,
            weather: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach a risk assessment and the observation it was derived from
    pub fn with_risk(mut self, risk: RiskAssessment, weather: WeatherObservation) -> Self {
        self.risk = Some(risk);
        self.weather = Some(weather);
        self
    }
}
