use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use ort::value::TensorRef;
use tracing::{debug, info};
use vocab::EncodedSequence;

use crate::config::{InputType, OracleConfig};
use crate::error::{OracleError, OracleUnavailable};
use crate::oracle::EmbeddingOracle;

/// Character encoder exported to ONNX.
///
/// Expects one `[batch, seq_len]` index tensor as its first input and yields
/// a `[batch, dimension]` float tensor as its first output. ONNX Runtime needs
/// exclusive access to run a session, so calls are serialized on a mutex.
pub struct OnnxOracle {
    session: Mutex<Session>,
    dimension: usize,
    input_type: InputType,
}

impl std::fmt::Debug for OnnxOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxOracle")
            .field("dimension", &self.dimension)
            .field("input_type", &self.input_type)
            .finish_non_exhaustive()
    }
}

impl OnnxOracle {
    pub fn load(cfg: &OracleConfig) -> Result<Self, OracleUnavailable> {
        cfg.validate()?;
        let path = cfg
            .model_path
            .as_deref()
            .ok_or_else(|| OracleUnavailable::InvalidConfig("onnx backend requires model_path".into()))?;
        if !path.exists() {
            return Err(OracleUnavailable::ModelNotFound(path.to_path_buf()));
        }

        let start = Instant::now();
        let session = create_session(path, cfg.intra_threads)?;
        info!(
            path = %path.display(),
            dimension = cfg.dimension,
            elapsed_micros = start.elapsed().as_micros() as u64,
            "onnx_model_loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            dimension: cfg.dimension,
            input_type: cfg.input_type,
        })
    }

    fn run(&self, seqs: &[EncodedSequence]) -> Result<Vec<Vec<f32>>, OracleError> {
        let batch = seqs.len();
        let seq_len = seqs[0].seq_len();
        if seqs.iter().any(|s| s.seq_len() != seq_len) {
            return Err(OracleError::Inference(
                "sequences in one batch must share a length".into(),
            ));
        }
        let shape = [batch as i64, seq_len as i64];

        let mut session = self
            .session
            .lock()
            .map_err(|_| OracleError::Inference("onnx session lock poisoned".into()))?;

        let outputs = match self.input_type {
            InputType::Int32 => {
                let data: Vec<i32> = seqs
                    .iter()
                    .flat_map(|s| s.ids().iter().map(|&id| id as i32))
                    .collect();
                let input = TensorRef::from_array_view((shape, data.as_slice()))
                    .map_err(|e| OracleError::Inference(e.to_string()))?;
                session
                    .run(ort::inputs![input])
                    .map_err(|e| OracleError::Inference(e.to_string()))?
            }
            InputType::Int64 => {
                let data: Vec<i64> = seqs
                    .iter()
                    .flat_map(|s| s.ids().iter().map(|&id| i64::from(id)))
                    .collect();
                let input = TensorRef::from_array_view((shape, data.as_slice()))
                    .map_err(|e| OracleError::Inference(e.to_string()))?;
                session
                    .run(ort::inputs![input])
                    .map_err(|e| OracleError::Inference(e.to_string()))?
            }
        };

        let (_, flat) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| OracleError::Inference(e.to_string()))?;

        if flat.len() != batch * self.dimension {
            return Err(OracleError::DimensionMismatch {
                expected: self.dimension,
                actual: flat.len() / batch.max(1),
            });
        }
        debug!(batch, seq_len, "onnx_batch_embedded");
        Ok(flat
            .chunks_exact(self.dimension)
            .map(|row| row.to_vec())
            .collect())
    }
}

impl EmbeddingOracle for OnnxOracle {
    fn embed(&self, seq: &EncodedSequence) -> Result<Vec<f32>, OracleError> {
        let mut rows = self.run(std::slice::from_ref(seq))?;
        rows.pop()
            .ok_or_else(|| OracleError::Inference("empty model output".into()))
    }

    fn embed_batch(&self, seqs: &[EncodedSequence]) -> Result<Vec<Vec<f32>>, OracleError> {
        if seqs.is_empty() {
            return Ok(Vec::new());
        }
        self.run(seqs)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "onnx"
    }
}

fn create_session(path: &Path, intra_threads: Option<usize>) -> Result<Session, OracleUnavailable> {
    let mut builder = SessionBuilder::new()
        .map_err(|e| OracleUnavailable::Load(e.to_string()))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| OracleUnavailable::Load(e.to_string()))?;
    if let Some(threads) = intra_threads {
        builder = builder
            .with_intra_threads(threads)
            .map_err(|e| OracleUnavailable::Load(e.to_string()))?;
    }
    builder
        .commit_from_file(path)
        .map_err(|e| OracleUnavailable::Load(e.to_string()))
}
