// ============================================================
// Layer 3 — Encoded Input and Span Logits
// ============================================================
// The two data shapes that cross the model boundary.
//
// EncodedInput is the tokenised [CLS] question [SEP] context [SEP]
// sequence, one integer per token position for each field.
// Every field is i64 because that is the element type the ONNX
// graph declares; the u32 → i64 cast happens once, in the encoder.
//
// SpanLogits are the two raw score vectors the model returns,
// one entry per token position, never softmaxed.
//
// Example (word-level vocabulary):
//   Question: "Where does the sun rise?"
//   Context:  "The sun rises in the east."
//   Tokens:   [CLS] where does the sun rise ? [SEP] the sun rises in the east . [SEP]
//   Type ids:   0     0    0    0   0    0   0   0    1   1    1    1   1    1  1   1
//
// Reference: Devlin et al. (2019) BERT paper, §3 (input representation)

use super::error::QaError;

/// Name of the token id field as declared by HuggingFace ONNX exports
pub const INPUT_IDS: &str = "input_ids";
/// Name of the attention mask field
pub const ATTENTION_MASK: &str = "attention_mask";
/// Name of the sequence-pair segment field
pub const TOKEN_TYPE_IDS: &str = "token_type_ids";

/// Tokenised question/context pair, ready to be fed to the model.
///
/// All vectors always have the same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedInput {
    pub input_ids:      Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub token_type_ids: Vec<i64>,

    /// True for positions holding a context token (not question,
    /// not special). Never fed to the model.
    pub context_mask:   Vec<bool>,
}

impl EncodedInput {
    /// Number of token positions in the sequence
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }

    /// Look up a field by the name the model graph uses for it.
    pub fn field(&self, name: &str) -> Result<&[i64], QaError> {
        match name {
            INPUT_IDS      => Ok(&self.input_ids),
            ATTENTION_MASK => Ok(&self.attention_mask),
            TOKEN_TYPE_IDS => Ok(&self.token_type_ids),
            other          => Err(QaError::MissingInput(other.to_string())),
        }
    }
}

/// Unnormalised start/end scores, one per token position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanLogits {
    pub start: Vec<f32>,
    pub end:   Vec<f32>,
}

impl SpanLogits {
    pub fn new(start: Vec<f32>, end: Vec<f32>) -> Self {
        Self { start, end }
    }
}
