// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams of the pipeline:
//   - ContextSource → where a context passage comes from
//   - SpanScorer    → whatever turns encoded tokens into
//                     start/end logits
//   - TextEmbedder  → text → fixed-size vector, used to rank
//                     passage chunks against the question
//
// ONNX sessions implement SpanScorer and TextEmbedder in
// production; tests plug in fakes that need no model file.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use super::document::Document;
use super::encoded::{EncodedInput, SpanLogits};
use super::error::QaError;

// ─── ContextSource ────────────────────────────────────────────────────────────
/// Any component that can supply a context passage.
///
/// Implementations:
///   - ContextLoader → a .txt or .docx file on disk
pub trait ContextSource {
    fn load(&self) -> Result<Document>;
}

// ─── SpanScorer ───────────────────────────────────────────────────────────────
/// Produces start/end logits for an encoded question/context pair.
///
/// Must return exactly one start and one end score per token
/// position of `input`. Takes `&mut self` because ONNX Runtime
/// sessions need exclusive access to run.
///
/// Implementations:
///   - OnnxQaModel → DistilBERT exported to ONNX
pub trait SpanScorer {
    fn score(&mut self, input: &EncodedInput) -> Result<SpanLogits, QaError>;
}

// ─── TextEmbedder ─────────────────────────────────────────────────────────────
/// Maps a piece of text to an embedding vector.
///
/// Every call on the same embedder must return vectors of the same
/// dimension. Vectors are expected to be L2-normalised so that a dot
/// product is a cosine similarity.
///
/// Implementations:
///   - OnnxEmbedder → sentence-transformer (MiniLM) exported to ONNX
pub trait TextEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>, QaError>;
}
