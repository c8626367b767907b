// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the `ask` subcommand and its flags.
//
// Every tuning flag is an Option: a flag the user did not pass
// leaves the value from qa_config.json (or the built-in default)
// untouched.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::ask_use_case::AskConfig;
use crate::ml::span::DecodingMode;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer a question from a context passage
    Ask(AskArgs),
}

/// All arguments for the `ask` command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// The natural language question to answer
    #[arg(long)]
    pub question: String,

    /// Passage containing the answer
    #[arg(long, required_unless_present = "context_file", conflicts_with = "context_file")]
    pub context: Option<String>,

    /// Read the passage from a .txt or .docx file instead
    #[arg(long)]
    pub context_file: Option<PathBuf>,

    /// How to pick the answer span from the model's logits
    #[arg(long, value_enum)]
    pub decoding: Option<DecodingArg>,

    /// Longest answer, in tokens, considered by best-span decoding
    #[arg(long)]
    pub max_answer_len: Option<usize>,

    /// Answer over the chunks most similar to the question instead
    /// of the whole passage (needs an embedding model)
    #[arg(long)]
    pub retrieve: bool,

    /// Directory holding the embedding model and its tokenizer
    #[arg(long)]
    pub embedder_dir: Option<PathBuf>,

    /// Maximum characters per retrieved chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Characters shared by neighbouring chunks
    #[arg(long)]
    pub chunk_overlap: Option<usize>,

    /// How many chunks to keep
    #[arg(long)]
    pub top_n: Option<usize>,
}

/// Span decoding as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodingArg {
    /// Independent argmax over start and end scores
    Independent,
    /// Best start+end score with start <= end inside the context
    BestSpan,
}

impl From<DecodingArg> for DecodingMode {
    fn from(a: DecodingArg) -> Self {
        match a {
            DecodingArg::Independent => DecodingMode::Independent,
            DecodingArg::BestSpan    => DecodingMode::BestSpan,
        }
    }
}

impl AskArgs {
    /// Overwrite the config fields the user set explicitly
    pub fn apply_to(&self, cfg: &mut AskConfig) {
        if let Some(d) = self.decoding {
            cfg.decoding = d.into();
        }
        if let Some(n) = self.max_answer_len {
            cfg.max_answer_len = n;
        }

        let retrieval = &mut cfg.retrieval;
        if self.retrieve {
            retrieval.enabled = true;
        }
        if let Some(dir) = &self.embedder_dir {
            retrieval.embedder_dir = dir.clone();
        }
        if let Some(n) = self.chunk_size {
            retrieval.chunk_size = n;
        }
        if let Some(n) = self.chunk_overlap {
            retrieval.chunk_overlap = n;
        }
        if let Some(n) = self.top_n {
            retrieval.top_n = n;
        }
    }
}
