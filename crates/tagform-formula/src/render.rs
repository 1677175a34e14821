//! Formula to expression text

use tagform_core::{TagResolver, Token, TokenKind};

/// Render a formula as arithmetic text
///
/// Numbers and operators are copied verbatim. Tags are replaced by their
/// resolved value, or `0` when the resolver does not know the name. Tokens
/// are joined without separators.
///
/// # Example
/// ```rust
/// use tagform_core::{Operator, TagCatalog, Token};
/// use tagform_formula::render_expression;
///
/// let formula = [Token::tag("name 1"), Token::operator(Operator::Add), Token::number("1")];
/// assert_eq!(render_expression(&formula, &TagCatalog::sample()), "9+1");
/// ```
pub fn render_expression<R: TagResolver + ?Sized>(formula: &[Token], resolver: &R) -> String {
    let mut out = String::new();
    for token in formula {
        match token.kind {
            TokenKind::Number | TokenKind::Operator => out.push_str(&token.value),
            TokenKind::Tag => out.push_str(&render_tag_value(resolver.value_of(&token.value))),
        }
    }
    out
}

fn render_tag_value(value: Option<f64>) -> String {
    match value {
        None => "0".to_string(),
        // `-0.0` would print as `-0`
        Some(v) if v == 0.0 => "0".to_string(),
        // Keep a negative value from fusing with the preceding operator
        Some(v) if v < 0.0 => format!("({})", v),
        Some(v) => format!("{}", v),
    }
}
