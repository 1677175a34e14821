//! # tagform
//!
//! A formula editor engine. Users compose arithmetic out of number literals,
//! operators (`+ - * / ^ ( )`) and named *tags* whose values come from an
//! external lookup, and the formula is evaluated live.
//!
//! ## Features
//!
//! - Admission rules that decide what may be typed next
//! - Structural validation and a recursive-descent arithmetic evaluator
//! - Tag autocomplete with last-request-wins lookup ordering
//! - An [`Editor`] session that ties the pieces together
//! - Key-value persistence of the formula and cursor
//!
//! ## Example
//!
//! ```rust
//! use tagform::prelude::*;
//!
//! let catalog = TagCatalog::sample();
//! let formula = vec![
//!     Token::tag("name 1"),
//!     Token::operator(Operator::Add),
//!     Token::number("1"),
//! ];
//!
//! assert!(validate_formula(&formula, &catalog));
//! assert_eq!(evaluate_formula(&formula, &catalog).as_f64(), 10.0);
//! ```

pub mod editor;
pub mod prelude;
pub mod storage;

pub use editor::{Editor, EditorError, SuggestionList};
pub use storage::{
    restore_formula, save_formula, FormulaSnapshot, JsonFileStore, KeyValueStore, MemoryStore,
    STORAGE_KEY,
};

// Re-export core types
pub use tagform_core::{
    is_number_literal,
    // Error types
    Error,
    // Store
    FormulaStore,
    // Tag lookup
    LookupSequencer,
    LookupTicket,
    // Tokens
    Operator,
    Result,
    TagCatalog,
    TagResolver,
    TagSuggestion,
    Token,
    TokenKind,
    DEFAULT_SUGGESTION_LIMIT,
};

// Re-export formula types
pub use tagform_formula::{
    admit, admit_token, check_structure, evaluate, evaluate_expression, evaluate_formula,
    parse_expression, render_expression, structure_error, validate_formula, AdmissionError,
    Evaluation, Expr, FormulaError, FormulaResult,
};
