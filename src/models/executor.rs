//! Classifier execution backends
//!
//! Wraps a loaded ONNX artifact and runs raw forward passes. Loading is
//! expensive and happens exactly once, at engine construction; the session
//! is stateless after load and safely shared behind a lock.

use crate::error::{Error, Result};
use crate::imaging::InputTensor;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::ValueType;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

/// Which compute path ended up active after capability negotiation.
///
/// Recorded for diagnostics only; invisible to prediction callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeBackend {
    /// CUDA execution provider
    Cuda,
    /// Baseline CPU execution provider
    Cpu,
}

impl std::fmt::Display for ComputeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cuda => write!(f, "cuda"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

/// Loaded ONNX classifier session.
#[derive(Debug)]
pub struct OnnxModel {
    /// `Session::run` needs exclusive access; concurrent callers
    /// serialize on the forward pass only
    session: RwLock<Session>,
    input_name: String,
    output_name: String,
    backend: ComputeBackend,
}

impl OnnxModel {
    /// Load the artifact and validate its output width against the class
    /// table length. A mismatch is a fatal configuration error, not a
    /// per-request one.
    pub fn load<P: AsRef<Path>>(
        path: P,
        onnx_threads: usize,
        expected_classes: usize,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelUnavailable(format!(
                "classifier artifact not found at {}",
                path.display()
            )));
        }

        ort::init()
            .commit()
            .map_err(|e| Error::ModelUnavailable(format!("ONNX Runtime init failed: {e}")))?;

        let (session, backend) = build_session(path, onnx_threads)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "logits".to_string());

        if let Some(width) = output_width(&session) {
            if width != expected_classes {
                return Err(Error::Config(format!(
                    "class table has {expected_classes} entries but the artifact \
                     outputs {width} classes"
                )));
            }
        } else {
            debug!("Artifact output width is dynamic, deferring class-count check");
        }

        info!(
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            backend = %backend,
            "Classifier artifact loaded"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            output_name,
            backend,
        })
    }

    /// Run one forward pass, returning the raw per-class logits.
    pub fn forward(&self, tensor: &InputTensor) -> Result<Vec<f32>> {
        use ort::value::Tensor;

        let input = Tensor::from_array((tensor.shape.clone(), tensor.data.clone()))
            .map_err(|e| Error::Inference(format!("failed to create input tensor: {e}")))?;

        let mut session = self
            .session
            .write()
            .map_err(|e| Error::Inference(format!("session lock poisoned: {e}")))?;

        let outputs = session.run(ort::inputs![&self.input_name => input])?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            Error::Inference(format!("model output '{}' missing", self.output_name))
        })?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| Error::Inference(format!("unexpected output type: {e}")))?;

        Ok(data.to_vec())
    }

    /// The compute path selected at load time
    pub fn backend(&self) -> ComputeBackend {
        self.backend
    }
}

/// Build a session, preferring the accelerated provider when compiled in
/// and silently falling back to the CPU baseline.
fn build_session(path: &Path, onnx_threads: usize) -> Result<(Session, ComputeBackend)> {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::CUDAExecutionProvider;

        let attempt = Session::builder()
            .and_then(|b| b.with_execution_providers([CUDAExecutionProvider::default().build()]))
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(onnx_threads))
            .and_then(|b| b.commit_from_file(path));

        match attempt {
            Ok(session) => return Ok((session, ComputeBackend::Cuda)),
            Err(e) => {
                tracing::warn!(error = %e, "CUDA provider unavailable, falling back to CPU")
            }
        }
    }

    let session = Session::builder()
        .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|b| b.with_intra_threads(onnx_threads))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| {
            Error::ModelUnavailable(format!("failed to load {}: {e}", path.display()))
        })?;

    Ok((session, ComputeBackend::Cpu))
}

/// Static output width of the artifact's first output, if known.
fn output_width(session: &Session) -> Option<usize> {
    let output = session.outputs.first()?;
    match &output.output_type {
        ValueType::Tensor { shape, .. } => shape
            .iter()
            .copied()
            .last()
            .and_then(|dim| usize::try_from(dim).ok()),
        _ => None,
    }
}

/// Fixed-logits stub, selected only by explicit configuration.
///
/// Exists for tests and demos; production configuration never falls back
/// to it implicitly.
#[derive(Debug, Clone)]
pub struct StubModel {
    logits: Vec<f32>,
}

impl StubModel {
    /// Create a stub returning the given logits for every input
    pub fn with_logits(logits: Vec<f32>) -> Self {
        Self {
            logits,
        }
    }

    /// Create a stub returning uniform logits over `classes` classes
    pub fn uniform(classes: usize) -> Self {
        Self {
            logits: vec![0.0; classes],
        }
    }
}

/// A classifier execution backend: real artifact or explicit stub.
pub enum ModelExecutor {
    Onnx(OnnxModel),
    Stub(StubModel),
}

impl ModelExecutor {
    /// Run one forward pass for a standardized `1×3×S×S` tensor.
    pub fn forward(&self, tensor: &InputTensor) -> Result<Vec<f32>> {
        match self {
            Self::Onnx(model) => model.forward(tensor),
            Self::Stub(stub) => Ok(stub.logits.clone()),
        }
    }

    /// Active compute backend, when a real artifact is loaded
    pub fn backend(&self) -> Option<ComputeBackend> {
        match self {
            Self::Onnx(model) => Some(model.backend()),
            Self::Stub(_) => None,
        }
    }
}
