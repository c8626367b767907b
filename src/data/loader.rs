// ============================================================
// Layer 4 — Context Loader
// ============================================================
// Reads a context passage from a file so long passages do not
// have to be pasted on the command line.
//
//   .docx → paragraph text extracted with docx-rs
//   other → read as UTF-8 plain text
//
// A .docx file is a ZIP of XML parts. docx-rs gives us a typed
// tree over the main document part:
//
//   Document
//     └── children: Vec<DocumentChild>
//           └── Paragraph
//                 └── children: Vec<ParagraphChild>
//                       └── Run
//                             └── children: Vec<RunChild>
//                                   └── Text
//
// Runs inside one paragraph are concatenated with no separator;
// paragraphs are joined with newlines. Tables and images are
// ignored.
//
// Reference: docx-rs crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, ReaderError, RunChild};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::document::Document;
use crate::domain::traits::ContextSource;

/// Loads one context file.
pub struct ContextLoader {
    path: PathBuf,
}

impl ContextLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContextSource for ContextLoader {
    fn load(&self) -> Result<Document> {
        let is_docx = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("docx"));

        let text = if is_docx {
            load_docx_text(&self.path)?
        } else {
            fs::read_to_string(&self.path)
                .with_context(|| format!("Cannot read context file '{}'", self.path.display()))?
        };

        let source = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        tracing::info!("Loaded context '{}' ({} chars)", source, text.len());
        Ok(Document::new(source, text))
    }
}

/// Extract paragraph text from a .docx file.
fn load_docx_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let docx = read_docx(&bytes).map_err(|e: ReaderError| {
        anyhow::anyhow!("docx-rs parse error in '{}': {:?}", path.display(), e)
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    if paragraphs.is_empty() {
        tracing::warn!("No paragraph text found in '{}'", path.display());
    }

    Ok(paragraphs.join("\n"))
}

/// Paragraph → Run → Text, runs joined with no separator
fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|child| match child {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
        .flat_map(|run| run.children.iter())
        .filter_map(|rc| match rc {
            RunChild::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect()
}
