// ============================================================
// Layer 2 — Ask Use Case
// ============================================================
// One extractive QA call, strictly in order:
//
//   Step 0: Retrieve the best chunks    (Layer 5 - ml, opt-in)
//   Step 1: Encode question + context   (Layer 4 - data)
//   Step 2: Score every token position  (Layer 5 - ml)
//   Step 3: Select the answer span      (Layer 5 - ml)
//   Step 4: Decode the span to text     (Layer 5 - ml)
//
// The tokenizer, the scorer and (when retrieval is on) the
// embedder are loaded once in `new` and reused by every
// `answer` call.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokenizers::Tokenizer;

use crate::data::chunker::Chunker;
use crate::data::encoder::InputEncoder;
use crate::domain::answer::Answer;
use crate::domain::encoded::{ATTENTION_MASK, INPUT_IDS, TOKEN_TYPE_IDS};
use crate::domain::error::QaError;
use crate::domain::traits::SpanScorer;
use crate::infra::{model_store::ModelStore, tokenizer_store::TokenizerStore};
use crate::ml::decoder::AnswerDecoder;
use crate::ml::embedder::OnnxEmbedder;
use crate::ml::inferencer::OnnxQaModel;
use crate::ml::retriever::Retriever;
use crate::ml::span::{select_span, DecodingMode, DecodingStrategy, DEFAULT_MAX_ANSWER_LEN};

// ─── Ask Configuration ───────────────────────────────────────────────────────
// Where the model lives and how to run it.
// Serialisable so a model directory can carry its own
// qa_config.json; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AskConfig {
    pub model_dir:          PathBuf,
    pub model_file:         String,
    pub tokenizer_file:     String,
    pub model_inputs:       Vec<String>,
    pub decoding:           DecodingMode,
    pub max_answer_len:     usize,
    pub intra_threads:      usize,
    pub optimization_level: u8,
    pub retrieval:          RetrievalConfig,
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            model_dir:          PathBuf::from("models/onnx_distilbert_qa"),
            model_file:         "model.onnx".to_string(),
            tokenizer_file:     "tokenizer.json".to_string(),
            model_inputs:       vec![INPUT_IDS.to_string(), ATTENTION_MASK.to_string()],
            decoding:           DecodingMode::Independent,
            max_answer_len:     DEFAULT_MAX_ANSWER_LEN,
            intra_threads:      1,
            optimization_level: 3,
            retrieval:          RetrievalConfig::default(),
        }
    }
}

impl AskConfig {
    pub fn strategy(&self) -> DecodingStrategy {
        DecodingStrategy::from_mode(self.decoding, self.max_answer_len)
    }
}

// ─── Retrieval Configuration ─────────────────────────────────────────────────
// Off by default. When enabled the context is chunked, every
// chunk is embedded, and only the `top_n` chunks closest to the
// question reach the QA model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub enabled:        bool,
    pub embedder_dir:   PathBuf,
    pub model_file:     String,
    pub tokenizer_file: String,
    pub model_inputs:   Vec<String>,
    /// Maximum characters per chunk
    pub chunk_size:     usize,
    /// Characters shared by neighbouring chunks
    pub chunk_overlap:  usize,
    pub top_n:          usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled:        false,
            embedder_dir:   PathBuf::from("models/all-MiniLM-L6-v2"),
            model_file:     "model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            model_inputs:   vec![
                INPUT_IDS.to_string(),
                ATTENTION_MASK.to_string(),
                TOKEN_TYPE_IDS.to_string(),
            ],
            chunk_size:     250,
            chunk_overlap:  100,
            top_n:          4,
        }
    }
}

// ─── AskUseCase ───────────────────────────────────────────────────────────────
pub struct AskUseCase<S: SpanScorer = OnnxQaModel> {
    tokenizer: Tokenizer,
    scorer:    S,
    strategy:  DecodingStrategy,
    retriever: Option<Retriever>,
}

impl AskUseCase<OnnxQaModel> {
    /// Load the tokenizer and the ONNX model named by `config`.
    pub fn new(config: AskConfig) -> Result<Self> {
        let store = ModelStore::new(&config.model_dir);

        let tokenizer = TokenizerStore::new(store.dir(), &config.tokenizer_file)
            .load()
            .context("Cannot load tokenizer")?;

        let scorer = OnnxQaModel::load(&store.file(&config.model_file), &config)
            .context("Cannot load ONNX model")?;

        let use_case = Self::with_scorer(tokenizer, scorer, config.strategy());
        if !config.retrieval.enabled {
            return Ok(use_case);
        }

        let retrieval = &config.retrieval;
        let chunker   = Chunker::new(retrieval.chunk_size, retrieval.chunk_overlap)
            .context("Invalid retrieval settings")?;
        let embedder  = OnnxEmbedder::load(retrieval, &config)
            .context("Cannot load embedding model")?;

        Ok(use_case.with_retriever(Retriever::new(Box::new(embedder), chunker, retrieval.top_n)))
    }
}

impl<S: SpanScorer> AskUseCase<S> {
    pub fn with_scorer(tokenizer: Tokenizer, scorer: S, strategy: DecodingStrategy) -> Self {
        Self { tokenizer, scorer, strategy, retriever: None }
    }

    /// Narrow every context down to its best chunks before answering.
    pub fn with_retriever(mut self, retriever: Retriever) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Answer `question` from `context`.
    ///
    /// An empty (or all-whitespace) context has nothing to extract
    /// from and yields an empty answer without running the model.
    pub fn answer(&mut self, question: &str, context: &str) -> Result<Answer> {
        if context.trim().is_empty() {
            tracing::warn!("Context is empty, returning an empty answer");
            return Ok(Answer::empty());
        }

        let retrieved;
        let context = match self.retriever.as_mut() {
            Some(retriever) => {
                retrieved = retriever
                    .select_context(question, context)
                    .context("Chunk retrieval failed")?;
                retrieved.as_str()
            }
            None => context,
        };

        let encoded = InputEncoder::new(&self.tokenizer).encode(question, context)?;
        if encoded.is_empty() {
            tracing::warn!("Tokenizer produced no tokens, returning an empty answer");
            return Ok(Answer::empty());
        }

        let logits = self.scorer.score(&encoded)?;
        if logits.start.len() != encoded.len() || logits.end.len() != encoded.len() {
            return Err(QaError::OutputShape(format!(
                "got {}/{} logits for {} tokens",
                logits.start.len(),
                logits.end.len(),
                encoded.len()
            ))
            .into());
        }

        let span = select_span(&logits, self.strategy, &encoded.context_mask);
        let text = AnswerDecoder::new(&self.tokenizer).decode(&encoded.input_ids, span)?;

        let start_score = logits.start.get(span.start).copied().unwrap_or(f32::NAN);
        let end_score   = span
            .end
            .checked_sub(1)
            .and_then(|e| logits.end.get(e))
            .copied()
            .unwrap_or(f32::NAN);

        tracing::debug!(
            "Span [{}, {}) {} token(s) start={:.4} end={:.4} answer='{}'",
            span.start, span.end, span.len(), start_score, end_score, text
        );

        Ok(Answer { text, span, start_score, end_score })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::answer::AnswerSpan;
    use crate::domain::encoded::{EncodedInput, SpanLogits};
    use crate::infra::tokenizer_store::fixtures;
    use crate::ml::retriever::fixtures::KeywordEmbedder;

    const QUESTION: &str = "Where does the sun rise?";
    const CONTEXT:  &str = "The sun rises in the east and sets in the west.";
    const OTHER:    &str = "The moon rises in the night.";

    /// Scores 1.0 wherever the input holds the target token, 0.0 elsewhere.
    struct PeakScorer {
        start_id: i64,
        end_id:   i64,
        seen:     Vec<SpanLogits>,
    }

    impl SpanScorer for PeakScorer {
        fn score(&mut self, input: &EncodedInput) -> Result<SpanLogits, QaError> {
            let peak = |target: i64| -> Vec<f32> {
                input.input_ids.iter().map(|&id| if id == target { 1.0 } else { 0.0 }).collect()
            };
            let logits = SpanLogits::new(peak(self.start_id), peak(self.end_id));
            self.seen.push(logits.clone());
            Ok(logits)
        }
    }

    /// Returns logits one position short.
    struct TruncatingScorer;

    impl SpanScorer for TruncatingScorer {
        fn score(&mut self, input: &EncodedInput) -> Result<SpanLogits, QaError> {
            let n = input.len().saturating_sub(1);
            Ok(SpanLogits::new(vec![0.0; n], vec![0.0; n]))
        }
    }

    fn tokenizer(dir: &tempfile::TempDir) -> Tokenizer {
        fixtures::write_word_level_tokenizer(dir.path(), &[QUESTION, CONTEXT, OTHER]);
        TokenizerStore::new(dir.path(), "tokenizer.json").load().unwrap()
    }

    fn use_case(
        tok:      Tokenizer,
        start:    &str,
        end:      &str,
        strategy: DecodingStrategy,
    ) -> AskUseCase<PeakScorer> {
        let scorer = PeakScorer {
            start_id: tok.token_to_id(start).unwrap() as i64,
            end_id:   tok.token_to_id(end).unwrap() as i64,
            seen:     Vec::new(),
        };
        AskUseCase::with_scorer(tok, scorer, strategy)
    }

    #[test]
    fn test_sample_question_answers_east() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(tokenizer(&dir), "east", "east", DecodingStrategy::IndependentArgmax);

        let answer = uc.answer(QUESTION, CONTEXT).unwrap();
        assert_eq!(answer.text, "east");
        assert_eq!(answer.span, AnswerSpan::new(13, 14));
        assert!(CONTEXT.to_lowercase().contains(&answer.text));
        assert_eq!(answer.start_score, 1.0);
        assert_eq!(answer.end_score, 1.0);
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(tokenizer(&dir), "the", "east", DecodingStrategy::IndependentArgmax);

        let first  = uc.answer(QUESTION, CONTEXT).unwrap();
        let second = uc.answer(QUESTION, CONTEXT).unwrap();
        assert_eq!(first, second);
        assert_eq!(uc.scorer.seen.len(), 2);
    }

    #[test]
    fn test_out_of_order_span_gives_empty_answer() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(tokenizer(&dir), "west", "east", DecodingStrategy::IndependentArgmax);

        let answer = uc.answer(QUESTION, CONTEXT).unwrap();
        assert!(answer.span.is_empty());
        assert_eq!(answer.text, "");
    }

    #[test]
    fn test_best_span_repairs_out_of_order_peaks() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(
            tokenizer(&dir),
            "west",
            "east",
            DecodingStrategy::BestValidSpan { max_answer_len: 30 },
        );

        let answer = uc.answer(QUESTION, CONTEXT).unwrap();
        assert!(answer.span.start < answer.span.end);
        assert!(!answer.text.is_empty());
        assert!(CONTEXT.to_lowercase().contains(&answer.text));
    }

    #[test]
    fn test_context_change_changes_scores() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(tokenizer(&dir), "east", "east", DecodingStrategy::IndependentArgmax);

        uc.answer(QUESTION, CONTEXT).unwrap();
        let other = uc.answer(QUESTION, OTHER).unwrap();
        assert_ne!(uc.scorer.seen[0], uc.scorer.seen[1]);
        // No "east" in the new context: both argmaxes fall on [CLS]
        assert_eq!(other.text, "");
    }

    #[test]
    fn test_empty_context_gives_empty_answer() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = use_case(tokenizer(&dir), "east", "east", DecodingStrategy::IndependentArgmax);

        let answer = uc.answer(QUESTION, "").unwrap();
        assert_eq!(answer.text, "");
        assert!(uc.scorer.seen.is_empty());
    }

    #[test]
    fn test_logit_length_mismatch_is_an_error() {
        let dir    = tempfile::tempdir().unwrap();
        let mut uc = AskUseCase::with_scorer(
            tokenizer(&dir),
            TruncatingScorer,
            DecodingStrategy::IndependentArgmax,
        );
        let err = uc.answer(QUESTION, CONTEXT).unwrap_err();
        assert!(matches!(err.downcast_ref::<QaError>(), Some(QaError::OutputShape(_))));
    }

    #[test]
    fn test_default_config_feeds_distilbert_inputs() {
        let cfg = AskConfig::default();
        assert_eq!(cfg.model_inputs, vec!["input_ids", "attention_mask"]);
        assert_eq!(cfg.strategy(), DecodingStrategy::IndependentArgmax);
        assert!(!cfg.retrieval.enabled);
    }

    #[test]
    fn test_retrieval_narrows_context_before_scoring() {
        let dir     = tempfile::tempdir().unwrap();
        let chunker = Chunker::new(50, 0).unwrap();
        let mut uc  = use_case(tokenizer(&dir), "east", "east", DecodingStrategy::IndependentArgmax)
            .with_retriever(Retriever::new(Box::new(KeywordEmbedder::new()), chunker, 1));

        let passage = format!("{OTHER}\n\n{CONTEXT}");
        let answer  = uc.answer(QUESTION, &passage).unwrap();

        assert_eq!(answer.text, "east");
        // Only the sun paragraph reached the scorer: same layout as
        // asking over CONTEXT alone
        assert_eq!(answer.span, AnswerSpan::new(13, 14));
        assert_eq!(uc.scorer.seen[0].start.len(), 21);
    }

    #[test]
    fn test_retrieval_config_is_optional_in_json() {
        let cfg: AskConfig = serde_json::from_str(r#"{"retrieval": {"enabled": true, "top_n": 2}}"#).unwrap();
        assert!(cfg.retrieval.enabled);
        assert_eq!(cfg.retrieval.top_n, 2);
        assert_eq!(cfg.retrieval.chunk_size, 250);
        assert_eq!(cfg.retrieval.model_inputs.len(), 3);
    }

    #[test]
    fn test_missing_model_dir_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AskConfig { model_dir: dir.path().join("nope"), ..AskConfig::default() };
        assert!(AskUseCase::new(cfg).is_err());
    }
}
