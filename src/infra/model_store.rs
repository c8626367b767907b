// ============================================================
// Layer 6 — Model Store
// ============================================================
// Resolves the files inside an exported model directory:
//
//   models/onnx_distilbert_qa/
//     model.onnx       ← serialised inference graph
//     tokenizer.json   ← HuggingFace tokenizer definition
//     qa_config.json   ← optional AskConfig overrides
//
// qa_config.json lets a model directory carry its own settings
// (for example which inputs its graph declares) so the CLI does
// not need flags for every exported model.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{fs, path::{Path, PathBuf}};

use crate::application::ask_use_case::AskConfig;

/// File name of the optional per-model configuration
pub const CONFIG_FILE: &str = "qa_config.json";

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a file inside the model directory
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Load qa_config.json if the directory has one.
    ///
    /// Missing fields fall back to AskConfig defaults. The returned
    /// config always points at this directory, whatever the file says.
    pub fn load_config(&self) -> Result<Option<AskConfig>> {
        let path = self.file(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No {} in '{}', using defaults", CONFIG_FILE, self.dir.display());
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let mut cfg: AskConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;
        cfg.model_dir = self.dir.clone();

        tracing::info!("Loaded model config from '{}'", path.display());
        Ok(Some(cfg))
    }
}
