// ============================================================
// Layer 4 — Input Encoder
// ============================================================
// Joins a question and a context into the model's sentence-pair
// format and returns the integer arrays the graph consumes:
//
//   [CLS] question tokens [SEP] context tokens [SEP]
//
// The layout (special tokens, padding, truncation) belongs to the
// tokenizer.json post-processor. Nothing here adds, removes or
// truncates tokens, so the sequence matches what the model saw
// during fine-tuning.
//
// Every id is widened from u32 to i64 here and only here: the
// exported graph declares int64 inputs and ONNX Runtime rejects
// any other element type.
//
// Reference: HuggingFace tokenizers — Tokenizer::encode
//            Rust Book §13 (Iterators)

use tokenizers::Tokenizer;

use crate::domain::encoded::EncodedInput;
use crate::domain::error::QaError;

/// Sequence id the tokenizer gives to the second (context) segment
const CONTEXT_SEQUENCE: usize = 1;

pub struct InputEncoder<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> InputEncoder<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Encode a question/context pair with special tokens added.
    pub fn encode(&self, question: &str, context: &str) -> Result<EncodedInput, QaError> {
        let encoding = self
            .tokenizer
            .encode((question, context), true)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();
        let context_mask: Vec<bool> = encoding
            .get_sequence_ids()
            .into_iter()
            .map(|seq| seq == Some(CONTEXT_SEQUENCE))
            .collect();

        tracing::debug!(
            "Encoded pair: {} tokens ({} context)",
            input_ids.len(),
            context_mask.iter().filter(|&&c| c).count()
        );

        Ok(EncodedInput { input_ids, attention_mask, token_type_ids, context_mask })
    }

    /// Encode one standalone text (used for embeddings).
    ///
    /// There is no context segment, so `context_mask` is all false.
    pub fn encode_text(&self, text: &str) -> Result<EncodedInput, QaError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;

        let widen = |xs: &[u32]| -> Vec<i64> { xs.iter().map(|&x| x as i64).collect() };
        let input_ids = widen(encoding.get_ids());

        Ok(EncodedInput {
            context_mask:   vec![false; input_ids.len()],
            attention_mask: widen(encoding.get_attention_mask()),
            token_type_ids: widen(encoding.get_type_ids()),
            input_ids,
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer_store::{fixtures, TokenizerStore};

    const QUESTION: &str = "Where does the sun rise?";
    const CONTEXT:  &str = "The sun rises in the east and sets in the west.";

    fn tokenizer(dir: &tempfile::TempDir) -> Tokenizer {
        fixtures::write_word_level_tokenizer(
            dir.path(),
            &[QUESTION, CONTEXT, "The moon rises in the night."],
        );
        TokenizerStore::new(dir.path(), "tokenizer.json").load().unwrap()
    }

    #[test]
    fn test_pair_layout() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok).encode(QUESTION, CONTEXT).unwrap();

        // [CLS] where does the sun rise ? [SEP]  → 8 tokens
        // the sun rises in the east and sets in the west . [SEP] → 13 tokens
        assert_eq!(enc.len(), 21);
        assert_eq!(enc.input_ids[0], fixtures::CLS_ID as i64);
        assert_eq!(enc.input_ids[7], fixtures::SEP_ID as i64);
        assert_eq!(enc.input_ids[20], fixtures::SEP_ID as i64);
        assert_eq!(enc.input_ids[13], tok.token_to_id("east").unwrap() as i64);
    }

    #[test]
    fn test_fields_have_equal_length() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok).encode(QUESTION, CONTEXT).unwrap();

        assert_eq!(enc.attention_mask.len(), enc.len());
        assert_eq!(enc.token_type_ids.len(), enc.len());
        assert_eq!(enc.context_mask.len(), enc.len());
        assert!(enc.attention_mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_segments_and_context_mask() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok).encode(QUESTION, CONTEXT).unwrap();

        assert!(enc.token_type_ids[..8].iter().all(|&t| t == 0));
        assert!(enc.token_type_ids[8..].iter().all(|&t| t == 1));

        // Context words only: not the question, not the final [SEP]
        assert!(!enc.context_mask[0]);
        assert!(!enc.context_mask[5]);
        assert!(enc.context_mask[8]);
        assert!(enc.context_mask[19]);
        assert!(!enc.context_mask[20]);
    }

    #[test]
    fn test_context_change_changes_input() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok);

        let a = enc.encode(QUESTION, CONTEXT).unwrap();
        let b = enc.encode(QUESTION, "The moon rises in the night.").unwrap();
        assert_ne!(a.input_ids, b.input_ids);
        // The question half is untouched
        assert_eq!(a.input_ids[..8], b.input_ids[..8]);
    }

    #[test]
    fn test_single_text_has_no_context() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok).encode_text("The moon rises in the night.").unwrap();

        // [CLS] the moon rises in the night . [SEP]
        assert_eq!(enc.len(), 9);
        assert_eq!(enc.input_ids[0], fixtures::CLS_ID as i64);
        assert_eq!(enc.input_ids[8], fixtures::SEP_ID as i64);
        assert!(enc.token_type_ids.iter().all(|&t| t == 0));
        assert!(enc.context_mask.iter().all(|&c| !c));
    }

    #[test]
    fn test_empty_context_still_encodes() {
        let dir = tempfile::tempdir().unwrap();
        let tok = tokenizer(&dir);
        let enc = InputEncoder::new(&tok).encode(QUESTION, "").unwrap();

        // [CLS] question [SEP] [SEP]
        assert_eq!(enc.len(), 9);
        assert!(enc.context_mask.iter().all(|&c| !c));
    }
}
