//! # tagform-formula
//!
//! Formula admission, validation and evaluation for tagform.
//!
//! This crate provides:
//! - Token admission rules (what may be typed next)
//! - Formula rendering (tokens → arithmetic text, tags resolved to numbers)
//! - Structural validation of rendered text
//! - Expression parsing (text → AST) and evaluation (AST → `f64`)
//!
//! ## Example
//!
//! ```rust
//! use tagform_core::{Operator, TagCatalog, Token};
//! use tagform_formula::{evaluate_formula, validate_formula, Evaluation};
//!
//! let catalog = TagCatalog::sample();
//! let formula = vec![
//!     Token::tag("name 1"),
//!     Token::operator(Operator::Add),
//!     Token::number("1"),
//! ];
//!
//! assert!(validate_formula(&formula, &catalog));
//! assert_eq!(evaluate_formula(&formula, &catalog), Evaluation::Value(10.0));
//! ```

pub mod admission;
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod render;
pub mod structure;

pub use admission::{admit, admit_token};
pub use ast::{BinaryOperator, Expr, UnaryOperator};
pub use error::{AdmissionError, FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_expression, evaluate_formula, Evaluation};
pub use parser::{parse_expression, MAX_DEPTH};
pub use render::render_expression;
pub use structure::{check_structure, structure_error, validate_formula};
