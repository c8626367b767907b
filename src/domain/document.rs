// ============================================================
// Layer 3 — Document Domain Type
// ============================================================
// A context passage loaded from disk: a source name and the
// text extracted from it. By the time a Document exists the
// file format (.txt or .docx) no longer matters.
//
// Reference: Rust Book §5 (Structs and Methods)

/// A context passage loaded from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name the text came from
    pub source: String,

    /// Extracted text, before cleaning
    pub text: String,
}

impl Document {
    /// Example:
    ///   let doc = Document::new("notes.docx", "The sun rises in the east.");
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text:   text.into(),
        }
    }
}
