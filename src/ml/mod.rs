// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Everything between encoded tokens and answer text:
//
//   inferencer.rs — ONNX Runtime session producing start/end logits
//   span.rs       — picks the answer span from the logits
//   decoder.rs    — turns the span's token ids back into text
//   embedder.rs   — ONNX sentence embedder for retrieval
//   retriever.rs  — ranks passage chunks against the question
//
// Model internals (attention, weights) stay inside the ONNX
// graph; this layer only feeds it and reads it.

/// ONNX Runtime session implementing SpanScorer
pub mod inferencer;

/// Span selection strategies
pub mod span;

/// Token ids → answer text
pub mod decoder;

/// ONNX Runtime session implementing TextEmbedder
pub mod embedder;

/// Top-n chunk retrieval by embedding similarity
pub mod retriever;
