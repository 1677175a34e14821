//! Structural validation
//!
//! Cheap pattern checks run on rendered expression text before any parsing.
//! [`validate_formula`] adds a syntax-only parse so callers can flag a
//! malformed formula without evaluating it.

use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_expression;
use crate::render::render_expression;
use lazy_regex::regex_is_match;
use tagform_core::{TagResolver, Token};

/// Pattern checks on trimmed expression text
///
/// In order: `(` and `)` counts must match, no two operator characters may
/// be adjacent, and the text may not start or end with `+`, `*`, `/` or `^`.
/// A leading `-` is allowed. Nesting order is not checked here.
pub fn check_structure(expression: &str) -> FormulaResult<()> {
    let open = expression.chars().filter(|&c| c == '(').count();
    let close = expression.chars().filter(|&c| c == ')').count();
    if open != close {
        return Err(FormulaError::UnbalancedParentheses);
    }

    if regex_is_match!(r"[+\-*/^]{2,}", expression) {
        return Err(FormulaError::OperatorSequence);
    }

    if regex_is_match!(r"^[+*/^]", expression) || regex_is_match!(r"[+*/^]$", expression) {
        return Err(FormulaError::DanglingOperator);
    }

    Ok(())
}

/// First reason the formula is malformed, if any
///
/// Empty and blank formulas are well-formed.
pub fn structure_error<R: TagResolver + ?Sized>(
    formula: &[Token],
    resolver: &R,
) -> Option<FormulaError> {
    if formula.is_empty() {
        return None;
    }

    let expression = render_expression(formula, resolver);
    let expression = expression.trim();
    if expression.is_empty() {
        return None;
    }

    check_structure(expression)
        .and_then(|_| parse_expression(expression).map(|_| ()))
        .err()
}

/// Whether the formula is well-formed enough to evaluate
pub fn validate_formula<R: TagResolver + ?Sized>(formula: &[Token], resolver: &R) -> bool {
    structure_error(formula, resolver).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagform_core::{Operator, TagCatalog};

    fn op(o: Operator) -> Token {
        Token::operator(o)
    }

    #[test]
    fn test_check_structure() {
        assert!(check_structure("1+2").is_ok());
        assert!(check_structure("-1*(2-3)").is_ok());
        assert!(check_structure("(-5)").is_ok());

        assert_eq!(check_structure("(1+2"), Err(FormulaError::UnbalancedParentheses));
        assert_eq!(check_structure("1+-2"), Err(FormulaError::OperatorSequence));
        assert_eq!(check_structure("1**2"), Err(FormulaError::OperatorSequence));
        assert_eq!(check_structure("+1"), Err(FormulaError::DanglingOperator));
        assert_eq!(check_structure("1/"), Err(FormulaError::DanglingOperator));
        assert_eq!(check_structure("^2"), Err(FormulaError::DanglingOperator));
    }

    #[test]
    fn test_parentheses_checked_by_count_only() {
        assert!(check_structure(")1(").is_ok());
    }

    #[test]
    fn test_trailing_minus_passes_patterns() {
        assert!(check_structure("1-").is_ok());
    }

    #[test]
    fn test_validate_empty_formula() {
        let catalog = TagCatalog::sample();
        assert!(validate_formula(&[], &catalog));
        assert!(validate_formula(&[Token::number("   ")], &catalog));
    }

    #[test]
    fn test_validate_formula() {
        let catalog = TagCatalog::sample();

        let formula = vec![Token::tag("name 2"), op(Operator::Divide), Token::number("4")];
        assert!(validate_formula(&formula, &catalog));

        let formula = vec![
            op(Operator::OpenParen),
            Token::number("1"),
            op(Operator::Add),
            Token::number("2"),
        ];
        assert!(!validate_formula(&formula, &catalog));
        assert_eq!(
            structure_error(&formula, &catalog),
            Some(FormulaError::UnbalancedParentheses)
        );
    }

    #[test]
    fn test_validate_catches_syntax_errors() {
        let catalog = TagCatalog::sample();

        let formula = vec![Token::number("1"), op(Operator::Subtract)];
        assert!(matches!(
            structure_error(&formula, &catalog),
            Some(FormulaError::Parse(_))
        ));

        let formula = vec![op(Operator::CloseParen), Token::number("1"), op(Operator::OpenParen)];
        assert!(!validate_formula(&formula, &catalog));
    }

    #[test]
    fn test_validate_does_not_evaluate() {
        let catalog = TagCatalog::sample();
        let formula = vec![Token::number("1"), op(Operator::Divide), Token::number("0")];
        assert!(validate_formula(&formula, &catalog));
    }
}
