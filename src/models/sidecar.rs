//! Classifier sidecar configuration
//!
//! The artifact ships with two sidecars: an ordered class-index table
//! (`class_names.json`) and an inference config (`inference_config.json`).
//! Both are versioned configuration, loaded once at startup — class
//! identity is never guessed from the model's output shape.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Ordered table mapping class indices to disease labels.
#[derive(Debug, Clone)]
pub struct ClassTable {
    classes: Vec<String>,
}

impl ClassTable {
    /// Load the class-index table from its JSON sidecar.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "class table sidecar not found at {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let classes: Vec<String> = serde_json::from_str(&raw)?;

        if classes.is_empty() {
            return Err(Error::Config(format!(
                "class table at {} is empty",
                path.display()
            )));
        }

        info!(path = %path.display(), classes = classes.len(), "Class table loaded");

        Ok(Self {
            classes,
        })
    }

    /// Build a table from in-memory names (tests, stub configurations)
    pub fn from_names<S: Into<String>>(names: Vec<S>) -> Self {
        Self {
            classes: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Label for a class index
    pub fn name(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// All labels in index order
    pub fn names(&self) -> &[String] {
        &self.classes
    }
}

/// Inference configuration sidecar: image size and post-hoc calibration.
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceSidecar {
    /// Model input edge length in pixels
    #[serde(default = "default_img_size")]
    pub img_size: u32,
    /// Post-hoc calibration temperature applied to averaged logits
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_img_size() -> u32 {
    // EfficientNet-B3 input resolution
    260
}

fn default_temperature() -> f32 {
    1.0
}

impl Default for InferenceSidecar {
    fn default() -> Self {
        Self {
            img_size: default_img_size(),
            temperature: default_temperature(),
        }
    }
}

impl InferenceSidecar {
    /// Load the inference config from its JSON sidecar.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Config(format!(
                "inference config sidecar not found at {}",
                path.display()
            )));
        }

        let raw = std::fs::read_to_string(path)?;
        let sidecar: InferenceSidecar = serde_json::from_str(&raw)?;

        info!(
            path = %path.display(),
            img_size = sidecar.img_size,
            temperature = sidecar.temperature,
            "Inference config loaded"
        );

        Ok(sidecar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_class_table_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"["pepper_bacterial_spot", "pepper_healthy", "potato_early_blight"]"#
        )
        .unwrap();

        let table = ClassTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.name(1), Some("pepper_healthy"));
        assert_eq!(table.name(3), None);
    }

    #[test]
    fn test_class_table_missing_file_is_config_error() {
        let err = ClassTable::load("/nonexistent/class_names.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_class_table_empty_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let err = ClassTable::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_class_table_malformed_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "a list"}}"#).unwrap();

        let err = ClassTable::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_inference_sidecar_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let sidecar = InferenceSidecar::load(file.path()).unwrap();
        assert_eq!(sidecar.img_size, 260);
        assert_eq!(sidecar.temperature, 1.0);
    }

    #[test]
    fn test_inference_sidecar_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"img_size": 224, "temperature": 1.5}}"#).unwrap();

        let sidecar = InferenceSidecar::load(file.path()).unwrap();
        assert_eq!(sidecar.img_size, 224);
        assert_eq!(sidecar.temperature, 1.5);
    }
}
