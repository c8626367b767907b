// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, builds the AskConfig, and prints
// the single result line:
//
//   Answer: <decoded text>
//
// Run with no subcommand to answer the built-in sample pair.
// All business logic is delegated to Layer 2 (application).
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::application::ask_use_case::{AskConfig, AskUseCase};
use crate::data::{loader::ContextLoader, preprocessor::Preprocessor};
use crate::domain::traits::ContextSource;
use crate::infra::model_store::ModelStore;
use commands::{AskArgs, Commands};

pub const SAMPLE_QUESTION: &str = "Where does the sun rise?";
pub const SAMPLE_CONTEXT:  &str = "The sun rises in the east and sets in the west.";

#[derive(Parser, Debug)]
#[command(
    name = "distilbert-qa",
    version,
    about = "Extractive question answering with a DistilBERT model exported to ONNX."
)]
pub struct Cli {
    /// The subcommand to run; omit it to answer the built-in sample
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding model.onnx, tokenizer.json and an optional qa_config.json
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = self.base_config()?;
        match self.command {
            Some(Commands::Ask(args)) => run_ask(config, args),
            None                      => answer_and_print(config, SAMPLE_QUESTION, SAMPLE_CONTEXT),
        }
    }

    /// Defaults, then qa_config.json from the model directory if present
    fn base_config(&self) -> Result<AskConfig> {
        let dir = self
            .model_dir
            .clone()
            .unwrap_or_else(|| AskConfig::default().model_dir);

        let config = ModelStore::new(&dir)
            .load_config()?
            .unwrap_or_else(|| AskConfig { model_dir: dir, ..AskConfig::default() });
        Ok(config)
    }
}

fn run_ask(mut config: AskConfig, args: AskArgs) -> Result<()> {
    args.apply_to(&mut config);

    let context = match (&args.context, &args.context_file) {
        (_, Some(path)) => {
            let doc = ContextLoader::new(path).load()?;
            tracing::debug!("Cleaning context from '{}'", doc.source);
            Preprocessor::new().clean(&doc.text)
        }
        (Some(text), None) => text.clone(),
        (None, None)       => bail!("either --context or --context-file is required"),
    };

    answer_and_print(config, &args.question, &context)
}

fn answer_and_print(config: AskConfig, question: &str, context: &str) -> Result<()> {
    let mut use_case = AskUseCase::new(config)?;
    let answer       = use_case.answer(question, context)?;
    println!("Answer: {}", answer.text);
    Ok(())
}
