//! Formula evaluator
//!
//! Evaluates expression ASTs with `f64` arithmetic, and evaluates whole
//! formulas: render, check structure, parse, compute. Every failure along
//! the way is logged and folded into [`Evaluation::Invalid`].

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::parser::parse_expression;
use crate::render::render_expression;
use crate::structure::check_structure;
use tagform_core::{TagResolver, Token};

/// Outcome of evaluating a formula
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// A finite result
    Value(f64),
    /// No usable number, with the reason
    Invalid(FormulaError),
}

impl Evaluation {
    /// The result, or `NaN` when invalid
    pub fn as_f64(&self) -> f64 {
        match self {
            Evaluation::Value(n) => *n,
            Evaluation::Invalid(_) => f64::NAN,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Evaluation::Value(n) => Some(*n),
            Evaluation::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Evaluation::Value(_))
    }

    /// Why evaluation failed, if it did
    pub fn reason(&self) -> Option<&FormulaError> {
        match self {
            Evaluation::Value(_) => None,
            Evaluation::Invalid(e) => Some(e),
        }
    }

    pub fn into_result(self) -> FormulaResult<f64> {
        match self {
            Evaluation::Value(n) => Ok(n),
            Evaluation::Invalid(e) => Err(e),
        }
    }
}

impl From<FormulaResult<f64>> for Evaluation {
    fn from(result: FormulaResult<f64>) -> Self {
        match result {
            Ok(n) => Evaluation::Value(n),
            Err(e) => Evaluation::Invalid(e),
        }
    }
}

/// Evaluate an AST
///
/// Follows IEEE-754: division by zero yields an infinity or NaN rather than
/// an error. Callers that need a finite answer check the result.
pub fn evaluate(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(n) => *n,

        Expr::BinaryOp { op, left, right } => {
            let l = evaluate(left);
            let r = evaluate(right);
            match op {
                BinaryOperator::Add => l + r,
                BinaryOperator::Subtract => l - r,
                BinaryOperator::Multiply => l * r,
                BinaryOperator::Divide => l / r,
                BinaryOperator::Power => l.powf(r),
            }
        }

        Expr::UnaryOp { op, operand } => {
            let v = evaluate(operand);
            match op {
                UnaryOperator::Negate => -v,
                UnaryOperator::Plus => v,
            }
        }
    }
}

/// Parse and evaluate arithmetic text, rejecting non-finite results
///
/// # Example
/// ```rust
/// use tagform_formula::evaluate_expression;
///
/// assert_eq!(evaluate_expression("2^3*2").unwrap(), 16.0);
/// assert!(evaluate_expression("1/0").is_err());
/// ```
pub fn evaluate_expression(text: &str) -> FormulaResult<f64> {
    let ast = parse_expression(text)?;
    let value = evaluate(&ast);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite(value))
    }
}

/// Evaluate a whole formula
///
/// An empty formula, or one that renders to blank text, evaluates to `0`.
/// Unresolved tags count as `0`.
pub fn evaluate_formula<R: TagResolver + ?Sized>(formula: &[Token], resolver: &R) -> Evaluation {
    if formula.is_empty() {
        return Evaluation::Value(0.0);
    }

    let expression = render_expression(formula, resolver);
    let expression = expression.trim();
    if expression.is_empty() {
        return Evaluation::Value(0.0);
    }

    if let Err(e) = check_structure(expression) {
        tracing::warn!(%expression, "{}", e);
        return Evaluation::Invalid(e);
    }

    match evaluate_expression(expression) {
        Ok(value) => Evaluation::Value(value),
        Err(e) => {
            tracing::error!(%expression, error = %e, "error evaluating formula");
            Evaluation::Invalid(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagform_core::{Operator, TagCatalog};

    fn eval(text: &str) -> FormulaResult<f64> {
        evaluate_expression(text)
    }

    fn op(o: Operator) -> Token {
        Token::operator(o)
    }

    #[test]
    fn test_evaluate_number() {
        assert_eq!(eval("42").unwrap(), 42.0);
        assert_eq!(eval("2.5").unwrap(), 2.5);
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2").unwrap(), 3.0);
        assert_eq!(eval("10-4").unwrap(), 6.0);
        assert_eq!(eval("3*4").unwrap(), 12.0);
        assert_eq!(eval("10/4").unwrap(), 2.5);
        assert_eq!(eval("2^10").unwrap(), 1024.0);
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("1+2*3").unwrap(), 7.0);
        assert_eq!(eval("(1+2)*3").unwrap(), 9.0);
        assert_eq!(eval("2*3^2").unwrap(), 18.0);
        assert_eq!(eval("2^3^2").unwrap(), 512.0);
        assert_eq!(eval("100/10/5").unwrap(), 2.0);
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(eval("-5").unwrap(), -5.0);
        assert_eq!(eval("-2^2").unwrap(), -4.0);
        assert_eq!(eval("3*(-2)").unwrap(), -6.0);
    }

    #[test]
    fn test_evaluate_division_by_zero() {
        assert!(matches!(eval("1/0"), Err(FormulaError::NonFinite(v)) if v.is_infinite()));
        assert!(matches!(eval("0/0"), Err(FormulaError::NonFinite(v)) if v.is_nan()));
    }

    #[test]
    fn test_evaluate_formula_empty() {
        let catalog = TagCatalog::sample();
        assert_eq!(evaluate_formula(&[], &catalog), Evaluation::Value(0.0));
    }

    #[test]
    fn test_evaluate_formula_with_tags() {
        let catalog = TagCatalog::sample();
        let formula = vec![Token::tag("name 1"), op(Operator::Add), Token::number("1")];
        assert_eq!(evaluate_formula(&formula, &catalog), Evaluation::Value(10.0));

        let formula = vec![Token::tag("unknown"), op(Operator::Add), Token::number("5")];
        assert_eq!(evaluate_formula(&formula, &catalog), Evaluation::Value(5.0));
    }

    #[test]
    fn test_evaluate_formula_structural_failures() {
        let catalog = TagCatalog::sample();

        let formula = vec![
            op(Operator::OpenParen),
            Token::number("1"),
            op(Operator::Add),
            Token::number("2"),
        ];
        let result = evaluate_formula(&formula, &catalog);
        assert!(result.as_f64().is_nan());
        assert_eq!(result.reason(), Some(&FormulaError::UnbalancedParentheses));

        let formula = vec![Token::number("1"), op(Operator::Add), op(Operator::Multiply)];
        assert_eq!(
            evaluate_formula(&formula, &catalog),
            Evaluation::Invalid(FormulaError::OperatorSequence)
        );

        let formula = vec![Token::number("1"), op(Operator::Power)];
        assert_eq!(
            evaluate_formula(&formula, &catalog),
            Evaluation::Invalid(FormulaError::DanglingOperator)
        );
    }

    #[test]
    fn test_evaluate_formula_faults_are_invalid() {
        let catalog = TagCatalog::sample();

        // Balanced by count but mis-nested
        let formula = vec![
            op(Operator::CloseParen),
            Token::number("1"),
            op(Operator::OpenParen),
        ];
        let result = evaluate_formula(&formula, &catalog);
        assert!(matches!(result.reason(), Some(FormulaError::Parse(_))));

        let formula = vec![Token::number("4"), op(Operator::Divide), Token::number("0")];
        let result = evaluate_formula(&formula, &catalog);
        assert!(matches!(result.reason(), Some(FormulaError::NonFinite(_))));
        assert!(result.as_f64().is_nan());
    }

    #[test]
    fn test_evaluation_accessors() {
        let ok = Evaluation::from(FormulaResult::Ok(3.0));
        assert!(ok.is_valid());
        assert_eq!(ok.value(), Some(3.0));
        assert_eq!(ok.into_result().unwrap(), 3.0);

        let bad = Evaluation::from(FormulaResult::<f64>::Err(FormulaError::DanglingOperator));
        assert!(!bad.is_valid());
        assert_eq!(bad.value(), None);
        assert!(bad.into_result().is_err());
    }
}
