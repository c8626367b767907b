// ============================================================
// Layer 5 — Span Selector
// ============================================================
// Turns start/end logits into a token span.
//
// Two strategies:
//
//   IndependentArgmax (default)
//     start = argmax(start_logits)
//     end   = argmax(end_logits) + 1
//     Each array is searched on its own. Nothing forces
//     end > start and no score threshold is applied, so the
//     result can be an empty (reversed) span.
//
//   BestValidSpan { max_answer_len }
//     Maximises start_logits[s] + end_logits[e] over context
//     positions with s <= e < s + max_answer_len. Always yields
//     a well-ordered span inside the context, or an empty span
//     when the context has no tokens.
//
// Ties go to the lowest index. NaN scores never win.
//
// Reference: Devlin et al. (2019) BERT paper, §4.2 (SQuAD)

use serde::{Deserialize, Serialize};

use crate::domain::answer::AnswerSpan;
use crate::domain::encoded::SpanLogits;

/// Default cap on answer length for BestValidSpan, in tokens
pub const DEFAULT_MAX_ANSWER_LEN: usize = 30;

/// Decoding choice as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodingMode {
    #[default]
    Independent,
    BestSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingStrategy {
    IndependentArgmax,
    BestValidSpan { max_answer_len: usize },
}

impl DecodingStrategy {
    pub fn from_mode(mode: DecodingMode, max_answer_len: usize) -> Self {
        match mode {
            DecodingMode::Independent => DecodingStrategy::IndependentArgmax,
            DecodingMode::BestSpan    => DecodingStrategy::BestValidSpan { max_answer_len },
        }
    }
}

/// Index of the first maximum, or None for an empty / all-NaN slice
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in scores.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Pick the answer span for one sequence.
///
/// `context_mask` marks the positions BestValidSpan may choose;
/// IndependentArgmax ignores it.
pub fn select_span(
    logits:       &SpanLogits,
    strategy:     DecodingStrategy,
    context_mask: &[bool],
) -> AnswerSpan {
    match strategy {
        DecodingStrategy::IndependentArgmax => independent_argmax(logits),
        DecodingStrategy::BestValidSpan { max_answer_len } => {
            best_valid_span(logits, max_answer_len.max(1), context_mask)
        }
    }
}

fn independent_argmax(logits: &SpanLogits) -> AnswerSpan {
    let start = argmax(&logits.start).unwrap_or(0);
    let end   = argmax(&logits.end).map(|e| e + 1).unwrap_or(0);
    AnswerSpan::new(start, end)
}

fn best_valid_span(logits: &SpanLogits, max_answer_len: usize, context_mask: &[bool]) -> AnswerSpan {
    let n = logits.start.len().min(logits.end.len()).min(context_mask.len());

    let mut best: Option<(f32, usize, usize)> = None;
    for s in (0..n).filter(|&s| context_mask[s]) {
        for e in s..s.saturating_add(max_answer_len).min(n) {
            // Spans stop at the first non-context position
            if !context_mask[e] {
                break;
            }
            let score = logits.start[s] + logits.end[e];
            if score.is_nan() {
                continue;
            }
            if best.map_or(true, |(b, _, _)| score > b) {
                best = Some((score, s, e));
            }
        }
    }

    match best {
        Some((_, s, e)) => AnswerSpan::new(s, e + 1),
        None            => AnswerSpan::new(0, 0),
    }
}
