// ============================================================
// Layer 3 — Answer Span and Answer
// ============================================================
// In extractive Q&A the model does not write an answer,
// it points at one: a start and end index into the combined
// [CLS] question [SEP] context [SEP] token sequence.
//
// Example:
//   Question: "Where does the sun rise?"
//   Context:  "The sun rises in the east and sets in the west."
//   Span:     (13, 14) → token "east"
//
// The end index is EXCLUSIVE, so the span covers
// input_ids[start..end]. A span with end <= start is empty.
//
// Reference: Rust Book §5 (Structs)

/// Token positions of a predicted answer, start inclusive, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSpan {
    pub start: usize,
    pub end:   usize,
}

impl AnswerSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when the span selects no tokens (end <= start)
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Number of tokens covered, zero for an out-of-order span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// The decoded answer for one question/context pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Human-readable answer text, empty when the span is empty
    pub text: String,

    /// Token span the text was decoded from
    pub span: AnswerSpan,

    /// Raw start logit at span.start (NaN when there were no logits)
    pub start_score: f32,

    /// Raw end logit at span.end - 1 (NaN when there were no logits)
    pub end_score: f32,
}

impl Answer {
    /// An answer that selected nothing
    pub fn empty() -> Self {
        Self {
            text:        String::new(),
            span:        AnswerSpan::new(0, 0),
            start_score: f32::NAN,
            end_score:   f32::NAN,
        }
    }
}
