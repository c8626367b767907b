// ============================================================
// Layer 3 — Error Type
// ============================================================
// Every failure the pipeline components can report.
// The application and CLI layers wrap these in anyhow with
// extra context; nothing below them ever panics on bad input.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QaError {
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("tokenizer load failed: {0}")]
    TokenizerLoad(String),

    #[error("model initialization failed: {0}")]
    ModelInit(String),

    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("model input '{0}' is not produced by the encoder")]
    MissingInput(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output: {0}")]
    OutputShape(String),

    #[error("invalid chunking settings: {0}")]
    Chunking(String),

    #[error("embedding failed: {0}")]
    Embedding(String),
}
