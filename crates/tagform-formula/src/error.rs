//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Reasons a formula cannot produce a number
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Count of `(` differs from count of `)`
    #[error("Unbalanced parentheses in formula")]
    UnbalancedParentheses,

    /// Two or more operator characters in a row
    #[error("Invalid operator sequence in formula")]
    OperatorSequence,

    /// Leading or trailing `+`, `*`, `/` or `^`
    #[error("Formula starts or ends with an invalid operator")]
    DanglingOperator,

    /// Expression text is not well-formed arithmetic
    #[error("Parse error: {0}")]
    Parse(String),

    /// Arithmetic produced infinity or NaN
    #[error("Result is not a finite number: {0}")]
    NonFinite(f64),
}

/// Why a candidate token may not be added to a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("Formula cannot start with this operator")]
    LeadingOperator,

    #[error("Cannot add consecutive numbers without an operator")]
    ConsecutiveNumbers,

    #[error("Cannot add consecutive tags without an operator")]
    ConsecutiveTags,

    #[error("Cannot add a tag after a number without an operator")]
    TagAfterNumber,

    #[error("Cannot add a number after a tag without an operator")]
    NumberAfterTag,

    #[error("Cannot add consecutive operators")]
    ConsecutiveOperators,

    #[error("Cannot close parenthesis after an operator")]
    CloseAfterOperator,
}
