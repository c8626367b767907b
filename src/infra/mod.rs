// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Filesystem concerns shared by the other layers:
//
//   model_store.rs     — Model directory layout
//                        Resolves model.onnx / tokenizer.json
//                        paths and reads the optional
//                        qa_config.json overrides.
//
//   tokenizer_store.rs — Tokenizer loading
//                        Reads the HuggingFace tokenizer.json
//                        exported alongside the model.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model directory layout and per-model config
pub mod model_store;

/// Tokenizer loading
pub mod tokenizer_store;
