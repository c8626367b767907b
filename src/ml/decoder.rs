// ============================================================
// Layer 5 — Answer Decoder
// ============================================================
// Maps the token ids inside the selected span back to text.
// Detokenisation (joining ## subwords, re-inserting spaces,
// dropping [CLS]/[SEP]/[PAD]) is done by the tokenizer's own
// decoder so the output matches the vocabulary's conventions.
//
// An empty or reversed span decodes to "" without touching the
// tokenizer. Span bounds past the sequence end are clamped.

use tokenizers::Tokenizer;

use crate::domain::answer::AnswerSpan;
use crate::domain::error::QaError;

pub struct AnswerDecoder<'a> {
    tokenizer: &'a Tokenizer,
}

impl<'a> AnswerDecoder<'a> {
    pub fn new(tokenizer: &'a Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Decode `input_ids[span.start..span.end]` with special tokens skipped.
    pub fn decode(&self, input_ids: &[i64], span: AnswerSpan) -> Result<String, QaError> {
        if span.is_empty() {
            return Ok(String::new());
        }

        let end   = span.end.min(input_ids.len());
        let start = span.start.min(end);

        let ids = input_ids[start..end]
            .iter()
            .map(|&id| {
                u32::try_from(id)
                    .map_err(|_| QaError::Tokenization(format!("token id {id} out of range")))
            })
            .collect::<Result<Vec<u32>, QaError>>()?;

        let text = self
            .tokenizer
            .decode(&ids, true)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;

        Ok(text.trim().to_string())
    }
}
