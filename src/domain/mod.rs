// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that describe one
// question-answering call: what goes in, what comes out, and
// the seams the other layers plug into.
//
// Rules for this layer:
//   - NO ort or tokenizers types here
//   - NO file I/O
//   - Only plain Rust data, errors, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A context document loaded from disk
pub mod document;

// Token-level model inputs and outputs
pub mod encoded;

// The predicted span and the decoded answer
pub mod answer;

// Library-level error type
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
