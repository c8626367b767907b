// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to answer a question.
//
// Rules for this layer:
//   - No tensor or tokenizer internals here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and configuration
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// The question-answering workflow and its configuration
pub mod ask_use_case;
