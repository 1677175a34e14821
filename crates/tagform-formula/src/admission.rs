//! Token admission
//!
//! Decides whether a candidate token may follow the current formula. Only
//! the last token matters. Rules are checked in a fixed order and the first
//! rejection wins:
//!
//! | formula | candidate | last token | outcome |
//! |---|---|---|---|
//! | empty | operator other than `-` | | [`AdmissionError::LeadingOperator`] |
//! | non-empty | number | number | [`AdmissionError::ConsecutiveNumbers`] |
//! | non-empty | tag | tag | [`AdmissionError::ConsecutiveTags`] |
//! | non-empty | tag | number | [`AdmissionError::TagAfterNumber`] |
//! | non-empty | number | tag | [`AdmissionError::NumberAfterTag`] |
//! | non-empty | operator | operator, unless `(` then `-` | [`AdmissionError::ConsecutiveOperators`] |
//! | non-empty | `)` | operator other than `)` | [`AdmissionError::CloseAfterOperator`] |

use crate::error::AdmissionError;
use tagform_core::{Token, TokenKind};

/// Check whether a token of `kind` with `value` may be appended to `formula`
///
/// Pure: the caller applies the mutation only on `Ok`.
///
/// # Example
/// ```rust
/// use tagform_core::{Token, TokenKind};
/// use tagform_formula::{admit, AdmissionError};
///
/// assert!(admit(&[], TokenKind::Operator, "-").is_ok());
/// assert_eq!(
///     admit(&[Token::number("1")], TokenKind::Number, "2"),
///     Err(AdmissionError::ConsecutiveNumbers)
/// );
/// ```
pub fn admit(formula: &[Token], kind: TokenKind, value: &str) -> Result<(), AdmissionError> {
    let Some(last) = formula.last() else {
        if kind == TokenKind::Operator && value != "-" {
            return Err(AdmissionError::LeadingOperator);
        }
        return Ok(());
    };

    match (kind, last.kind) {
        (TokenKind::Number, TokenKind::Number) => return Err(AdmissionError::ConsecutiveNumbers),
        (TokenKind::Tag, TokenKind::Tag) => return Err(AdmissionError::ConsecutiveTags),
        (TokenKind::Tag, TokenKind::Number) => return Err(AdmissionError::TagAfterNumber),
        (TokenKind::Number, TokenKind::Tag) => return Err(AdmissionError::NumberAfterTag),
        _ => {}
    }

    if kind != TokenKind::Operator || last.kind != TokenKind::Operator {
        return Ok(());
    }

    if !(last.value == "(" && value == "-") {
        return Err(AdmissionError::ConsecutiveOperators);
    }

    if value == ")" && last.value != ")" {
        return Err(AdmissionError::CloseAfterOperator);
    }

    Ok(())
}

/// [`admit`] for a ready-made token
pub fn admit_token(formula: &[Token], token: &Token) -> Result<(), AdmissionError> {
    admit(formula, token.kind, &token.value)
}
