//! Multi-view ensemble prediction
//!
//! Orchestrates preprocessing, the five TTA views and the forward passes,
//! then aggregates logits into a calibrated, confidence-gated prediction.

use crate::config::{AppConfig, PredictorKind};
use crate::error::{Error, Result};
use crate::imaging::{standardize, AugmentationSet, ImagePreprocessor};
use crate::models::executor::{ComputeBackend, ModelExecutor, OnnxModel, StubModel};
use crate::models::sidecar::{ClassTable, InferenceSidecar};
use crate::types::diagnosis::{ClassScore, PredictionResult};
use tracing::{debug, info};

/// Ensemble predictor: the one diagnosis engine per process.
///
/// Constructed once at startup and shared by reference; holds no
/// per-request state, so concurrent predictions are safe.
pub struct EnsemblePredictor {
    executor: ModelExecutor,
    classes: ClassTable,
    preprocessor: ImagePreprocessor,
    augmentations: AugmentationSet,
    confidence_threshold: f32,
    temperature: f32,
    top_k: usize,
}

impl EnsemblePredictor {
    /// Build the predictor from configuration: load sidecars, then the
    /// artifact (or the explicitly-selected stub).
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let classes = ClassTable::load(&config.model.class_names_path)?;
        let sidecar = InferenceSidecar::load(&config.model.inference_config_path)?;

        let executor = match config.model.predictor {
            PredictorKind::Onnx => ModelExecutor::Onnx(OnnxModel::load(
                &config.model.model_path,
                config.model.onnx_threads,
                classes.len(),
            )?),
            PredictorKind::Stub => {
                info!("Stub predictor selected by configuration");
                ModelExecutor::Stub(StubModel::uniform(classes.len()))
            }
        };

        Ok(Self::new(
            executor,
            classes,
            sidecar.img_size,
            config.detection.confidence_threshold,
            sidecar.temperature,
            config.detection.top_k,
        ))
    }

    /// Assemble a predictor from its parts.
    pub fn new(
        executor: ModelExecutor,
        classes: ClassTable,
        img_size: u32,
        confidence_threshold: f32,
        temperature: f32,
        top_k: usize,
    ) -> Self {
        Self {
            executor,
            classes,
            preprocessor: ImagePreprocessor::new(img_size),
            augmentations: AugmentationSet::new(img_size),
            confidence_threshold,
            temperature,
            top_k,
        }
    }

    /// Run the full TTA ensemble on raw image bytes.
    ///
    /// Logits are averaged before the softmax: averaging post-softmax
    /// probabilities over-weights high-confidence single views because
    /// softmax is non-linear. A failure in any view fails the whole call —
    /// dropping a view would silently change the averaging denominator.
    pub fn predict(&self, image_bytes: &[u8]) -> Result<PredictionResult> {
        let normalized = self.preprocessor.normalize(image_bytes)?;
        let views = self.augmentations.augment(&normalized);

        let mut summed = vec![0.0f32; self.classes.len()];
        for (view_index, view) in views.iter().enumerate() {
            let tensor = standardize(view);
            let logits = self.executor.forward(&tensor)?;

            if logits.len() != self.classes.len() {
                return Err(Error::Config(format!(
                    "model produced {} logits for {} classes",
                    logits.len(),
                    self.classes.len()
                )));
            }

            debug!(view = view_index, "Forward pass complete");
            for (sum, logit) in summed.iter_mut().zip(&logits) {
                *sum += logit;
            }
        }

        let view_count = views.len() as f32;
        let averaged: Vec<f32> = summed
            .iter()
            .map(|sum| sum / view_count / self.temperature)
            .collect();

        let probabilities = softmax(&averaged);

        let class_index = argmax(&probabilities);
        let confidence = probabilities[class_index];
        let label = self
            .classes
            .name(class_index)
            .unwrap_or("unknown")
            .to_string();

        let top_k = self.rank_top_k(&probabilities);
        let is_confident = confidence >= self.confidence_threshold;

        debug!(
            label = %label,
            confidence = confidence,
            is_confident = is_confident,
            "Ensemble prediction complete"
        );

        Ok(PredictionResult {
            label,
            class_index,
            confidence,
            top_k,
            is_confident,
        })
    }

    /// Highest-probability classes, sorted descending. The sort is stable,
    /// so ties keep the original class-index order.
    fn rank_top_k(&self, probabilities: &[f32]) -> Vec<ClassScore> {
        let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        indexed
            .iter()
            .take(self.top_k)
            .map(|&(index, probability)| ClassScore {
                label: self.classes.name(index).unwrap_or("unknown").to_string(),
                probability,
            })
            .collect()
    }

    /// Number of classes the predictor distinguishes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// All class labels in index order
    pub fn class_names(&self) -> &[String] {
        self.classes.names()
    }

    /// Active compute backend, when a real artifact is loaded
    pub fn backend(&self) -> Option<ComputeBackend> {
        self.executor.backend()
    }

    /// The configured confidence gate
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }
}

/// Numerically stable softmax (max-subtracted).
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.iter().map(|&e| e / sum).collect()
}

/// Index of the largest value; the first index wins on exact ties.
fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    const CLASS_COUNT: usize = 15;

    fn test_classes() -> ClassTable {
        ClassTable::from_names(
            (0..CLASS_COUNT)
                .map(|i| format!("disease_{i}"))
                .collect::<Vec<_>>(),
        )
    }

    fn gray_square_png(size: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::from_pixel(size, size, Rgb([128, 128, 128])))
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn stub_predictor(logits: Vec<f32>) -> EnsemblePredictor {
        EnsemblePredictor::new(
            ModelExecutor::Stub(StubModel::with_logits(logits)),
            test_classes(),
            64,
            0.50,
            1.0,
            5,
        )
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[5.0, 1.0, -2.0, 0.3]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0]);
        let b = softmax(&[101.0, 102.0, 103.0]);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn test_argmax_first_index_wins_ties() {
        assert_eq!(argmax(&[0.1, 0.5, 0.5, 0.2]), 1);
        assert_eq!(argmax(&[0.7]), 0);
    }

    #[test]
    fn test_gray_square_with_fixed_logits() {
        // Stub returns [5, 1, 1, ...]: class 0 must win with
        // confidence = softmax([5, 1, ...])[0] = 1 / (1 + 14 * e^-4)
        let mut logits = vec![1.0f32; CLASS_COUNT];
        logits[0] = 5.0;
        let predictor = stub_predictor(logits);

        let result = predictor.predict(&gray_square_png(300)).unwrap();

        let expected = 1.0 / (1.0 + (CLASS_COUNT as f32 - 1.0) * (-4.0f32).exp());
        assert_eq!(result.class_index, 0);
        assert_eq!(result.label, "disease_0");
        assert!((result.confidence - expected).abs() < 1e-6);
        assert!(result.is_confident);
        assert_eq!(result.top_k[0].label, "disease_0");
        assert_eq!(result.top_k[0].probability, result.confidence);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let mut logits = vec![0.5f32; CLASS_COUNT];
        logits[3] = 2.0;
        logits[7] = 1.5;
        let predictor = stub_predictor(logits);
        let bytes = gray_square_png(300);

        let first = predictor.predict(&bytes).unwrap();
        let second = predictor.predict(&bytes).unwrap();

        assert_eq!(first.label, second.label);
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.top_k, second.top_k);
    }

    #[test]
    fn test_top_k_sorted_non_increasing() {
        let logits: Vec<f32> = (0..CLASS_COUNT).map(|i| (i as f32) * 0.3).collect();
        let predictor = stub_predictor(logits);

        let result = predictor.predict(&gray_square_png(128)).unwrap();

        assert_eq!(result.top_k.len(), 5);
        for pair in result.top_k.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        assert_eq!(result.confidence, result.top_k[0].probability);
    }

    #[test]
    fn test_top_k_ties_keep_class_index_order() {
        // Classes 1 and 2 share the same logit: class 1 must rank first
        let mut logits = vec![0.0f32; CLASS_COUNT];
        logits[1] = 3.0;
        logits[2] = 3.0;
        let predictor = stub_predictor(logits);

        let result = predictor.predict(&gray_square_png(128)).unwrap();

        assert_eq!(result.label, "disease_1");
        assert_eq!(result.top_k[0].label, "disease_1");
        assert_eq!(result.top_k[1].label, "disease_2");
    }

    #[test]
    fn test_low_confidence_is_flagged_not_suppressed() {
        // Uniform logits: confidence 1/15 is far below the 0.50 gate
        let predictor = stub_predictor(vec![0.0; CLASS_COUNT]);

        let result = predictor.predict(&gray_square_png(128)).unwrap();

        assert!(!result.is_confident);
        assert!((result.confidence - 1.0 / CLASS_COUNT as f32).abs() < 1e-6);
        assert_eq!(result.label, "disease_0");
    }

    #[test]
    fn test_logit_width_mismatch_fails_whole_call() {
        let predictor = EnsemblePredictor::new(
            ModelExecutor::Stub(StubModel::with_logits(vec![1.0, 2.0])),
            test_classes(),
            64,
            0.50,
            1.0,
            5,
        );

        let err = predictor.predict(&gray_square_png(128)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_undecodable_bytes_propagate_decode_error() {
        let predictor = stub_predictor(vec![0.0; CLASS_COUNT]);
        let err = predictor.predict(b"not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_temperature_softens_confidence() {
        let mut logits = vec![1.0f32; CLASS_COUNT];
        logits[0] = 5.0;

        let calibrated = EnsemblePredictor::new(
            ModelExecutor::Stub(StubModel::with_logits(logits.clone())),
            test_classes(),
            64,
            0.50,
            2.0,
            5,
        );
        let sharp = stub_predictor(logits);
        let bytes = gray_square_png(128);

        let soft = calibrated.predict(&bytes).unwrap();
        let hard = sharp.predict(&bytes).unwrap();

        assert_eq!(soft.class_index, hard.class_index);
        assert!(soft.confidence < hard.confidence);
    }
}
