//! # tagform-core
//!
//! Core data structures for the tagform formula editor.
//!
//! This crate provides the fundamental types used throughout tagform:
//! - [`Token`] and [`TokenKind`] - the elements a formula is built from
//! - [`FormulaStore`] - the mutable formula, cursor and last result
//! - [`TagResolver`] and [`TagCatalog`] - tag suggestions and values
//! - [`LookupSequencer`] - last-request-wins ordering for suggestion lookups
//!
//! ## Example
//!
//! ```rust
//! use tagform_core::{FormulaStore, Operator, Token};
//!
//! let mut store = FormulaStore::new();
//! store.add_element(Token::tag("name 1"));
//! store.add_element(Token::operator(Operator::Add));
//! store.add_element(Token::number("1"));
//!
//! assert_eq!(store.len(), 3);
//! assert_eq!(store.cursor_index(), 3);
//! ```

pub mod error;
pub mod store;
pub mod tag;
pub mod token;

pub use error::{Error, Result};
pub use store::FormulaStore;
pub use tag::{
    LookupSequencer, LookupTicket, TagCatalog, TagResolver, TagSuggestion,
    DEFAULT_SUGGESTION_LIMIT,
};
pub use token::{is_number_literal, Operator, Token, TokenKind};
