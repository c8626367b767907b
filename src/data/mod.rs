// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything that happens to text before it reaches the model:
//
//   context file (.txt / .docx)
//       │
//       ▼
//   ContextLoader   → reads the file, extracts raw text
//       │
//       ▼
//   Preprocessor    → cleans whitespace and control characters
//       │
//       ▼
//   Chunker         → (retrieval only) overlapping passage windows
//       │
//       ▼
//   InputEncoder    → question + context → i64 id / mask arrays
//
// Inline contexts skip the first two steps.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Loads a context passage from a .txt or .docx file
pub mod loader;

/// Cleans file-loaded context text
pub mod preprocessor;

/// Splits long passages into overlapping chunks
pub mod chunker;

/// Tokenises a question/context pair into model inputs
pub mod encoder;
