//! Prelude module - common imports for tagform users
//!
//! ```rust
//! use tagform::prelude::*;
//! ```

pub use crate::{
    // Admission and evaluation
    admit,
    evaluate_formula,
    validate_formula,
    AdmissionError,
    // Editing
    Editor,
    EditorError,
    // Error types
    Error,
    Evaluation,
    FormulaError,
    FormulaStore,
    // Persistence
    KeyValueStore,
    Operator,
    Result,
    // Tags
    TagCatalog,
    TagResolver,
    TagSuggestion,
    // Tokens
    Token,
    TokenKind,
};
