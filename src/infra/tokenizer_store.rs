// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Loads the HuggingFace `tokenizer.json` that ships next to the
// exported model. The file carries everything the encoder and
// decoder rely on: vocabulary, normaliser (lowercasing, accent
// stripping), pre-tokeniser, the [CLS]/[SEP] post-processor for
// sentence pairs, and the WordPiece decoder.
//
// The tokenizer is loaded once and treated as read-only.
//
// Reference: HuggingFace tokenizers crate documentation

use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

use crate::domain::error::QaError;

pub struct TokenizerStore {
    path: PathBuf,
}

impl TokenizerStore {
    /// Point the store at `dir/file_name`
    pub fn new(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self { path: dir.as_ref().join(file_name) }
    }

    /// Load the tokenizer definition from disk
    pub fn load(&self) -> Result<Tokenizer, QaError> {
        if !self.path.exists() {
            return Err(QaError::ModelNotFound(self.path.clone()));
        }

        let tokenizer = Tokenizer::from_file(&self.path).map_err(|e| {
            QaError::TokenizerLoad(format!("'{}': {e}", self.path.display()))
        })?;

        tracing::info!(
            "Tokenizer loaded from '{}' (vocab size {})",
            self.path.display(),
            tokenizer.get_vocab_size(true)
        );
        Ok(tokenizer)
    }
}
