// ============================================================
// Layer 5 — ONNX Sentence Embedder
// ============================================================
// Turns a chunk of text (or the question) into a fixed-size
// vector with a sentence-transformer exported to ONNX
// (all-MiniLM-L6-v2 by default, 384 dimensions).
//
// Pipeline per text:
//   1. tokenize the text on its own (no pair, no truncation)
//   2. run the graph → token embeddings [1, seq_len, dim]
//   3. mean-pool over positions where attention_mask == 1
//   4. L2-normalise, so a dot product is a cosine similarity
//
// The session is built exactly like the QA model's session.
//
// Reference: Reimers & Gurevych (2019) Sentence-BERT, §3 (pooling)

use ort::session::{Session, SessionInputValue};
use ort::value::TensorRef;
use tokenizers::Tokenizer;

use crate::application::ask_use_case::{AskConfig, RetrievalConfig};
use crate::data::encoder::InputEncoder;
use crate::domain::error::QaError;
use crate::domain::traits::TextEmbedder;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::inferencer::{build_session, input_arrays};

pub struct OnnxEmbedder {
    session:     Session,
    tokenizer:   Tokenizer,
    input_names: Vec<String>,
}

impl OnnxEmbedder {
    /// Load the embedding model and its tokenizer from `retrieval.embedder_dir`.
    pub fn load(retrieval: &RetrievalConfig, cfg: &AskConfig) -> Result<Self, QaError> {
        let dir       = &retrieval.embedder_dir;
        let tokenizer = TokenizerStore::new(dir, &retrieval.tokenizer_file).load()?;

        let model_path = dir.join(&retrieval.model_file);
        let session    = build_session(&model_path, cfg.intra_threads, cfg.optimization_level)?;

        tracing::info!(
            "Embedding model loaded from '{}' (inputs: {})",
            model_path.display(),
            retrieval.model_inputs.join(", ")
        );

        Ok(Self { session, tokenizer, input_names: retrieval.model_inputs.clone() })
    }
}

impl TextEmbedder for OnnxEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, QaError> {
        let encoded = InputEncoder::new(&self.tokenizer).encode_text(text)?;
        let arrays  = input_arrays(&self.input_names, &encoded)?;

        let mut feeds: Vec<(&str, SessionInputValue<'_>)> = Vec::with_capacity(arrays.len());
        for (name, array) in &arrays {
            let tensor = TensorRef::from_array_view(array)
                .map_err(|e| QaError::Embedding(format!("input '{name}': {e}")))?;
            feeds.push((*name, tensor.into()));
        }

        let outputs = self
            .session
            .run(feeds)
            .map_err(|e| QaError::Embedding(format!("ONNX inference failed: {e}")))?;

        if outputs.len() == 0 {
            return Err(QaError::OutputShape("embedding graph returned no outputs".to_string()));
        }

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| QaError::OutputShape(format!("token embeddings: {e}")))?;
        let dims: Vec<i64> = shape.iter().copied().collect();

        let pooled = mean_pool(&dims, data, &encoded.attention_mask)?;
        Ok(l2_normalize(pooled))
    }
}

/// Average the token vectors of a [1, seq_len, dim] output,
/// counting only positions the attention mask keeps.
fn mean_pool(dims: &[i64], data: &[f32], mask: &[i64]) -> Result<Vec<f32>, QaError> {
    let (seq_len, dim) = match dims {
        [1, s, d] if *s >= 0 && *d > 0 => (*s as usize, *d as usize),
        _ => {
            return Err(QaError::OutputShape(format!(
                "token embeddings shape {dims:?}, expected [1, seq_len, dim]"
            )))
        }
    };
    if seq_len != mask.len() || data.len() != seq_len * dim {
        return Err(QaError::OutputShape(format!(
            "token embeddings shape {dims:?} for {} tokens",
            mask.len()
        )));
    }

    let mut pooled = vec![0.0f32; dim];
    let mut kept   = 0usize;
    for (row, &m) in data.chunks_exact(dim).zip(mask) {
        if m == 0 {
            continue;
        }
        kept += 1;
        for (p, &v) in pooled.iter_mut().zip(row) {
            *p += v;
        }
    }
    if kept > 0 {
        for p in &mut pooled {
            *p /= kept as f32;
        }
    }
    Ok(pooled)
}

fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pool_skips_masked_positions() {
        // Three tokens, two dims; the last token is padding
        let data   = [1.0, 2.0, 3.0, 4.0, 100.0, 100.0];
        let pooled = mean_pool(&[1, 3, 2], &data, &[1, 1, 0]).unwrap();
        assert_eq!(pooled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_mean_pool_rejects_bad_shape() {
        let data = [0.0; 6];
        assert!(matches!(mean_pool(&[1, 6], &data, &[1; 6]), Err(QaError::OutputShape(_))));
        assert!(matches!(mean_pool(&[1, 2, 3], &data, &[1; 3]), Err(QaError::OutputShape(_))));
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let v = l2_normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        // Zero vector stays zero instead of turning into NaN
        assert_eq!(l2_normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_missing_embedding_model() {
        let dir = tempfile::tempdir().unwrap();
        let retrieval = RetrievalConfig {
            embedder_dir: dir.path().join("minilm"),
            ..RetrievalConfig::default()
        };
        let err = OnnxEmbedder::load(&retrieval, &AskConfig::default()).err().unwrap();
        assert!(matches!(err, QaError::ModelNotFound(_)));
    }
}
