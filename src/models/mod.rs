//! Classifier loading and ensemble inference components

pub mod ensemble;
pub mod executor;
pub mod sidecar;

pub use ensemble::EnsemblePredictor;
pub use executor::{ComputeBackend, ModelExecutor, OnnxModel, StubModel};
pub use sidecar::{ClassTable, InferenceSidecar};
