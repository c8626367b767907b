// ============================================================
// Layer 5 — ONNX Inferencer
// ============================================================
// Runs the exported DistilBERT question-answering graph with
// ONNX Runtime (the `ort` crate).
//
// Graph contract:
//   inputs  — int64 tensors of shape [1, seq_len], fed BY NAME.
//             Which names to feed comes from the config
//             (`model_inputs`); DistilBERT exports declare
//             input_ids and attention_mask, BERT exports add
//             token_type_ids. A declared input that is not fed
//             makes ONNX Runtime fail the run.
//   outputs — exactly two float tensors of shape [1, seq_len]:
//             output 0 = start logits, output 1 = end logits.
//
// The session is built once and reused. Each run is a pure
// function of its inputs and the fixed weights.
//
// Reference: ort crate documentation (Session, TensorRef)

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputValue};
use ort::value::TensorRef;
use std::fmt::Display;
use std::path::Path;

use crate::application::ask_use_case::AskConfig;
use crate::domain::encoded::{EncodedInput, SpanLogits};
use crate::domain::error::QaError;
use crate::domain::traits::SpanScorer;

pub struct OnnxQaModel {
    session:     Session,
    input_names: Vec<String>,
}

impl OnnxQaModel {
    /// Build an ONNX Runtime session for `model_path`.
    pub fn load(model_path: &Path, cfg: &AskConfig) -> Result<Self, QaError> {
        let session = build_session(model_path, cfg.intra_threads, cfg.optimization_level)?;

        tracing::info!(
            "ONNX model loaded from '{}' (inputs: {})",
            model_path.display(),
            cfg.model_inputs.join(", ")
        );

        Ok(Self { session, input_names: cfg.model_inputs.clone() })
    }
}

impl SpanScorer for OnnxQaModel {
    fn score(&mut self, input: &EncodedInput) -> Result<SpanLogits, QaError> {
        let seq_len = input.len();

        // Owned [1, seq_len] arrays; the tensors below borrow them
        let arrays = input_arrays(&self.input_names, input)?;

        let mut feeds: Vec<(&str, SessionInputValue<'_>)> = Vec::with_capacity(arrays.len());
        for (name, array) in &arrays {
            let tensor = TensorRef::from_array_view(array)
                .map_err(|e| QaError::Inference(format!("input '{name}': {e}")))?;
            feeds.push((*name, tensor.into()));
        }

        let outputs = self
            .session
            .run(feeds)
            .map_err(|e| QaError::Inference(format!("ONNX inference failed: {e}")))?;

        if outputs.len() < 2 {
            return Err(QaError::OutputShape(format!(
                "expected start and end logits, graph returned {} output(s)",
                outputs.len()
            )));
        }

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| QaError::OutputShape(format!("start logits: {e}")))?;
        let start = logits_row("start", shape.iter().copied().collect(), data, seq_len)?;

        let (shape, data) = outputs[1]
            .try_extract_tensor::<f32>()
            .map_err(|e| QaError::OutputShape(format!("end logits: {e}")))?;
        let end = logits_row("end", shape.iter().copied().collect(), data, seq_len)?;

        Ok(SpanLogits::new(start, end))
    }
}

/// Copy a [1, seq_len] logits tensor into a flat row
fn logits_row(which: &str, dims: Vec<i64>, data: &[f32], seq_len: usize) -> Result<Vec<f32>, QaError> {
    if data.len() != seq_len {
        return Err(QaError::OutputShape(format!(
            "{which} logits shape {dims:?}, expected [1, {seq_len}]"
        )));
    }
    Ok(data.to_vec())
}

/// Build a session the way every model in this crate is loaded:
/// existence check, optimisation level, intra-op threads, commit.
pub(crate) fn build_session(
    model_path:         &Path,
    intra_threads:      usize,
    optimization_level: u8,
) -> Result<Session, QaError> {
    if !model_path.exists() {
        return Err(QaError::ModelNotFound(model_path.to_path_buf()));
    }

    Session::builder()
        .map_err(init_error)?
        .with_optimization_level(graph_level(optimization_level))
        .map_err(init_error)?
        .with_intra_threads(intra_threads)
        .map_err(init_error)?
        .commit_from_file(model_path)
        .map_err(|e| QaError::ModelInit(format!("ONNX load failed: {e}")))
}

/// One [1, seq_len] i64 array per requested graph input, in order
pub(crate) fn input_arrays<'n>(
    names: &'n [String],
    input: &EncodedInput,
) -> Result<Vec<(&'n str, Array2<i64>)>, QaError> {
    let seq_len = input.len();
    let mut arrays = Vec::with_capacity(names.len());
    for name in names {
        let data  = input.field(name)?.to_vec();
        let array = Array2::from_shape_vec((1, seq_len), data)
            .map_err(|e| QaError::Inference(e.to_string()))?;
        arrays.push((name.as_str(), array));
    }
    Ok(arrays)
}

fn graph_level(level: u8) -> GraphOptimizationLevel {
    match level {
        0 => GraphOptimizationLevel::Disable,
        1 => GraphOptimizationLevel::Level1,
        2 => GraphOptimizationLevel::Level2,
        _ => GraphOptimizationLevel::Level3,
    }
}

fn init_error(e: impl Display) -> QaError {
    QaError::ModelInit(e.to_string())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        let err  = OnnxQaModel::load(&path, &AskConfig::default()).err().unwrap();
        assert!(matches!(err, QaError::ModelNotFound(p) if p == path));
    }

    #[test]
    fn test_input_arrays_follow_name_order() {
        let input = EncodedInput {
            input_ids:      vec![101, 7, 102],
            attention_mask: vec![1, 1, 1],
            token_type_ids: vec![0, 0, 0],
            context_mask:   vec![false; 3],
        };
        let names  = vec!["attention_mask".to_string(), "input_ids".to_string()];
        let arrays = input_arrays(&names, &input).unwrap();

        assert_eq!(arrays.len(), 2);
        assert_eq!(arrays[0].0, "attention_mask");
        assert_eq!(arrays[1].1.shape(), &[1, 3]);
        assert_eq!(arrays[1].1[[0, 2]], 102);

        let unknown = vec!["position_ids".to_string()];
        assert!(matches!(input_arrays(&unknown, &input), Err(QaError::MissingInput(_))));
    }

    #[test]
    fn test_logits_row_checks_length() {
        assert_eq!(logits_row("start", vec![1, 3], &[0.1, 0.2, 0.3], 3).unwrap(), vec![0.1, 0.2, 0.3]);
        let err = logits_row("end", vec![1, 2], &[0.1, 0.2], 3).unwrap_err();
        assert!(matches!(err, QaError::OutputShape(_)));
    }
}
