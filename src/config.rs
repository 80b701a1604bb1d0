//! Configuration management for the diagnosis pipeline

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Which predictor backs the ensemble.
///
/// The stub predictor is only ever selected by explicit configuration —
/// a missing artifact in ONNX mode is a fatal error, never a silent
/// fallback to stub predictions.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    /// Real classifier artifact via ONNX Runtime
    #[default]
    Onnx,
    /// Fixed-logits stub for tests and demos
    Stub,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub detection: DetectionConfig,
    pub weather: WeatherConfig,
    pub logging: LoggingConfig,
}

/// Classifier artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the ONNX classifier artifact
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Path to the class-index table sidecar (ordered JSON list of labels)
    #[serde(default = "default_class_names_path")]
    pub class_names_path: String,
    /// Path to the inference-config sidecar (image size, calibration temperature)
    #[serde(default = "default_inference_config_path")]
    pub inference_config_path: String,
    /// Predictor selection: "onnx" or "stub"
    #[serde(default)]
    pub predictor: PredictorKind,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_model_path() -> String {
    "models/crop_disease_model.onnx".to_string()
}

fn default_class_names_path() -> String {
    "models/class_names.json".to_string()
}

fn default_inference_config_path() -> String {
    "models/inference_config.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

/// Detection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Confidence gate: predictions below this are flagged unreliable
    /// but still returned
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Number of ranked classes returned per prediction
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_confidence_threshold() -> f32 {
    0.50
}

fn default_top_k() -> usize {
    5
}

/// Constant observation served by the static weather provider
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub humidity: i32,
    pub temperature: f64,
    pub description: String,
    pub wind_speed: f64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                model_path: default_model_path(),
                class_names_path: default_class_names_path(),
                inference_config_path: default_inference_config_path(),
                predictor: PredictorKind::Onnx,
                onnx_threads: 1,
            },
            detection: DetectionConfig {
                confidence_threshold: 0.50,
                top_k: 5,
            },
            weather: WeatherConfig {
                humidity: 65,
                temperature: 28.0,
                description: "partly cloudy".to_string(),
                wind_speed: 3.5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
