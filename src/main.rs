//! Crop Disease Diagnosis Pipeline - Main Entry Point
//!
//! Diagnoses leaf images through the TTA ensemble, optionally fuses the
//! result with a weather observation into a risk advisory, and prints one
//! JSON report per image.

use anyhow::{Context, Result};
use clap::Parser;
use crop_disease_pipeline::{
    config::AppConfig,
    metrics::DiagnosisMetrics,
    models::EnsemblePredictor,
    risk::RiskEngine,
    types::{diagnosis::DiagnosisReport, weather::Location},
    weather::{StaticWeatherProvider, WeatherProvider},
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "crop-disease-pipeline", about = "Diagnose crop-leaf diseases from photographs")]
struct Args {
    /// Image files to diagnose
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = "config/config.toml")]
    config: PathBuf,

    /// Latitude for the weather-conditioned risk assessment
    #[arg(long, requires = "longitude")]
    latitude: Option<f64>,

    /// Longitude for the weather-conditioned risk assessment
    #[arg(long, requires = "latitude")]
    longitude: Option<f64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = AppConfig::load_from_path(&args.config)
        .with_context(|| format!("Failed to load configuration from {:?}", args.config))?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));
    if config.logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("Starting Crop Disease Diagnosis Pipeline");

    // The predictor is the one shared service: built once, no lazy globals
    let predictor = Arc::new(EnsemblePredictor::from_config(&config)?);
    let backend = predictor
        .backend()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "stub".to_string());
    info!(
        classes = predictor.class_count(),
        confidence_threshold = predictor.confidence_threshold(),
        backend = %backend,
        "Ensemble predictor initialized"
    );

    let metrics = Arc::new(DiagnosisMetrics::new());
    let weather_provider = StaticWeatherProvider::from_config(&config.weather);
    let location = match (args.latitude, args.longitude) {
        (Some(latitude), Some(longitude)) => Some(Location::new(latitude, longitude)),
        _ => None,
    };

    let mut failures = 0usize;
    for image_path in &args.images {
        let bytes = match std::fs::read(image_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(image = %image_path.display(), error = %e, "Failed to read image");
                failures += 1;
                continue;
            }
        };

        let start_time = Instant::now();
        match predictor.predict(&bytes) {
            Ok(prediction) => {
                let processing_time = start_time.elapsed();
                metrics.record_diagnosis(
                    processing_time,
                    prediction.confidence,
                    prediction.is_confident,
                );

                if !prediction.is_confident {
                    warn!(
                        image = %image_path.display(),
                        label = %prediction.label,
                        confidence = prediction.confidence,
                        "Prediction below confidence threshold"
                    );
                }

                let mut report = DiagnosisReport::new(prediction.clone());
                if let Some(location) = &location {
                    let observation = weather_provider.observe(location);
                    let assessment = RiskEngine::assess(
                        &prediction.label,
                        f64::from(prediction.confidence),
                        &observation,
                    );
                    metrics.record_risk(&format!("{:?}", assessment.level).to_uppercase());
                    report = report.with_risk(assessment, observation);
                }

                info!(
                    image = %image_path.display(),
                    label = %report.prediction.label,
                    confidence = report.prediction.confidence,
                    processing_time_us = processing_time.as_micros(),
                    "Diagnosis complete"
                );
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Err(e) => {
                error!(image = %image_path.display(), error = %e, "Diagnosis failed");
                failures += 1;
            }
        }
    }

    metrics.print_summary();

    if failures > 0 {
        anyhow::bail!("{failures} of {} images failed", args.images.len());
    }

    Ok(())
}
