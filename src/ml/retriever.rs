// ============================================================
// Layer 5 — Chunk Retriever
// ============================================================
// Narrows a long passage down to the chunks most similar to the
// question, so the QA model only reads what fits its window.
//
//   passage ──Chunker──► chunks ──TextEmbedder──► vectors
//   question ──────────────────────TextEmbedder──► vector
//
//   similarity = dot(question, chunk)   (cosine: vectors are
//                                         L2-normalised)
//
// The top_n most similar chunks are kept and joined back in
// passage order, one per line, to form the new context.
//
// Ties keep passage order. Nothing is cached between calls.

use crate::data::chunker::Chunker;
use crate::domain::error::QaError;
use crate::domain::traits::TextEmbedder;

/// A chunk with its position in the passage and its similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedChunk {
    pub index: usize,
    pub text:  String,
    pub score: f32,
}

pub struct Retriever {
    embedder: Box<dyn TextEmbedder>,
    chunker:  Chunker,
    top_n:    usize,
}

impl Retriever {
    pub fn new(embedder: Box<dyn TextEmbedder>, chunker: Chunker, top_n: usize) -> Self {
        Self { embedder, chunker, top_n: top_n.max(1) }
    }

    /// All chunks of `passage`, most similar to `question` first.
    pub fn rank(&mut self, question: &str, passage: &str) -> Result<Vec<RankedChunk>, QaError> {
        let chunks = self.chunker.chunk(passage);
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query = self.embedder.embed(question)?;

        let mut ranked = Vec::with_capacity(chunks.len());
        for (index, text) in chunks.into_iter().enumerate() {
            let vector = self.embedder.embed(&text)?;
            if vector.len() != query.len() {
                return Err(QaError::Embedding(format!(
                    "chunk {index} has dimension {}, question has {}",
                    vector.len(),
                    query.len()
                )));
            }
            ranked.push(RankedChunk { index, score: dot(&query, &vector), text });
        }

        // Stable sort: equal scores keep passage order; NaN sinks
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or_else(|| a.score.is_nan().cmp(&b.score.is_nan()))
        });
        Ok(ranked)
    }

    /// The context the QA model should read: the `top_n` best chunks
    /// in passage order, one per line.
    pub fn select_context(&mut self, question: &str, passage: &str) -> Result<String, QaError> {
        let mut ranked = self.rank(question, passage)?;
        let total = ranked.len();

        ranked.truncate(self.top_n);
        for chunk in &ranked {
            tracing::debug!("Chunk {} [{:.1}% match]", chunk.index, chunk.score * 100.0);
        }
        ranked.sort_by_key(|c| c.index);

        tracing::info!("Retrieved {} of {} chunk(s)", ranked.len(), total);

        Ok(ranked.into_iter().map(|c| c.text).collect::<Vec<_>>().join("\n"))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
