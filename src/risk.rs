//! Environmental risk scoring
//!
//! Fuses a disease classification with a weather observation into a graded
//! advisory. Pure and total: every input combination yields an assessment,
//! falling back to UNKNOWN for diseases without an epidemiological model.

use crate::types::diagnosis::{RiskAssessment, RiskLevel};
use crate::types::weather::WeatherObservation;

/// Classes that indicate a healthy plant; they short-circuit to zero risk
/// with no weather blending.
pub const HEALTHY_CLASSES: [&str; 3] = ["pepper_healthy", "potato_healthy", "tomato_healthy"];

/// Weight of classification confidence in the combined score. Confidence
/// is the stronger signal; the environment modulates it.
const CONFIDENCE_WEIGHT: f64 = 0.6;
/// Weight of the environmental factor score
const ENVIRONMENT_WEIGHT: f64 = 0.4;
/// Humidity above this counts as a wet-conditions factor on its own
const WET_HUMIDITY: i32 = 85;

/// Disease-specific environmental thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseThresholds {
    /// Relative humidity (percent) at or above which the pathogen thrives
    pub humidity: i32,
    /// Lower bound of the favorable temperature window (°C)
    pub temp_min: f64,
    /// Upper bound of the favorable temperature window (°C)
    pub temp_max: f64,
}

/// Environmental thresholds for a modeled disease, if one exists.
pub fn thresholds_for(disease: &str) -> Option<DiseaseThresholds> {
    let (humidity, temp_min, temp_max) = match disease {
        "pepper_bacterial_spot" => (70, 20.0, 35.0),
        "potato_early_blight" => (60, 20.0, 30.0),
        "potato_late_blight" => (80, 10.0, 25.0),
        "tomato_bacterial_spot" => (70, 20.0, 35.0),
        "tomato_early_blight" => (60, 20.0, 30.0),
        "tomato_late_blight" => (85, 10.0, 25.0),
        "tomato_leaf_mold" => (85, 15.0, 25.0),
        "tomato_mosaic_virus" => (50, 20.0, 35.0),
        "tomato_septoria_leaf_spot" => (75, 15.0, 25.0),
        "tomato_spider_mites" => (40, 25.0, 40.0),
        "tomato_target_spot" => (80, 20.0, 30.0),
        "tomato_yellow_leaf_curl_virus" => (50, 25.0, 35.0),
        _ => return None,
    };

    Some(DiseaseThresholds {
        humidity,
        temp_min,
        temp_max,
    })
}

/// Weather-conditioned risk scoring engine.
pub struct RiskEngine;

impl RiskEngine {
    /// Assess the outbreak risk for a diagnosed disease under the given
    /// weather. Never fails; unmodeled diseases degrade to UNKNOWN.
    pub fn assess(
        disease: &str,
        confidence: f64,
        weather: &WeatherObservation,
    ) -> RiskAssessment {
        if HEALTHY_CLASSES.contains(&disease) {
            return RiskAssessment {
                score: 0.0,
                level: RiskLevel::Healthy,
            };
        }

        let Some(thresholds) = thresholds_for(disease) else {
            // No epidemiological model for this class; not an error
            return RiskAssessment {
                score: round3(confidence * 0.5),
                level: RiskLevel::Unknown,
            };
        };

        let mut factors = 0u32;

        if weather.humidity >= thresholds.humidity {
            factors += 1;
        }

        if thresholds.temp_min <= weather.temperature && weather.temperature <= thresholds.temp_max
        {
            factors += 1;
        }

        if weather.humidity > WET_HUMIDITY || weather.description.to_lowercase().contains("rain") {
            factors += 1;
        }

        let environmental_risk = f64::from(factors) / 3.0;
        let combined_risk =
            confidence * CONFIDENCE_WEIGHT + environmental_risk * ENVIRONMENT_WEIGHT;

        // Band the rounded score so score and level always agree
        let score = round3(combined_risk);
        RiskAssessment {
            score,
            level: RiskLevel::from_score(score),
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
