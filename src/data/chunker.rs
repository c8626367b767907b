// ============================================================
// Layer 4 — Text Chunker
// ============================================================
// Splits a long passage into overlapping windows of text so the
// retriever can pick the few that matter for a question.
//
// The encoder never truncates, so a passage longer than the
// model's sequence limit fails at inference. Chunking first keeps
// every sequence the model sees short.
//
// Splitting is done by `text-splitter`, which prefers semantic
// boundaries (paragraph → sentence → word → character) and only
// falls back to a smaller unit when a larger one does not fit.
//
//   chunk_size — maximum characters per chunk
//   overlap    — characters shared by neighbouring chunks, so an
//                answer near a boundary appears whole in one chunk
//
// Reference: text-splitter crate documentation (ChunkConfig)

use text_splitter::{Characters, ChunkConfig, TextSplitter};

use crate::domain::error::QaError;

pub struct Chunker {
    splitter: TextSplitter<Characters>,
}

impl Chunker {
    /// Fails when `chunk_size` is zero or `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, QaError> {
        if chunk_size == 0 {
            return Err(QaError::Chunking("chunk size must be positive".to_string()));
        }
        let config = ChunkConfig::new(chunk_size)
            .with_overlap(overlap)
            .map_err(|e| QaError::Chunking(e.to_string()))?;

        Ok(Self { splitter: TextSplitter::new(config) })
    }

    /// Chunks in passage order, each trimmed. Empty text → no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.splitter.chunks(text).map(str::to_string).collect()
    }
}
