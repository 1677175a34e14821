//! Formula tokens
//!
//! A formula is an ordered list of [`Token`]s. Each token is a number literal,
//! one of the seven operator symbols, or a tag name that is resolved to a
//! number when the formula is evaluated.

use crate::error::{Error, Result};
use std::fmt;

/// The closed set of token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TokenKind {
    Number,
    Operator,
    Tag,
}

impl TokenKind {
    /// Lowercase name, as shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Tag => "tag",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator symbols accepted in a formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    OpenParen,
    CloseParen,
}

impl Operator {
    /// All operators, in the order the editor offers them
    pub const ALL: [Operator; 7] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
        Operator::OpenParen,
        Operator::CloseParen,
    ];

    /// Parse a single operator symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "*" => Some(Operator::Multiply),
            "/" => Some(Operator::Divide),
            "^" => Some(Operator::Power),
            "(" => Some(Operator::OpenParen),
            ")" => Some(Operator::CloseParen),
            _ => None,
        }
    }

    /// Operator for a single character
    pub fn from_char(c: char) -> Option<Self> {
        let mut buf = [0u8; 4];
        Self::from_symbol(c.encode_utf8(&mut buf))
    }

    /// The operator's symbol text
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
            Operator::OpenParen => "(",
            Operator::CloseParen => ")",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operator::from_symbol(s).ok_or_else(|| Error::UnknownOperator(s.to_string()))
    }
}

/// One element of a formula
///
/// `value` holds the literal text for numbers, the symbol for operators and
/// the tag name for tags. `id` is opaque host bookkeeping and is never read
/// by validation or evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: TokenKind,
    pub value: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
}

impl Token {
    /// Create a token of any kind
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            id: None,
        }
    }

    /// Number literal token
    pub fn number(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Number, text)
    }

    /// Operator token
    pub fn operator(op: Operator) -> Self {
        Self::new(TokenKind::Operator, op.symbol())
    }

    /// Tag reference token
    pub fn tag(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Tag, name)
    }

    /// Attach a host-side id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }

    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    pub fn is_tag(&self) -> bool {
        self.kind == TokenKind::Tag
    }

    /// The operator this token carries, if it is an operator token with a known symbol
    pub fn as_operator(&self) -> Option<Operator> {
        if self.is_operator() {
            Operator::from_symbol(&self.value)
        } else {
            None
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Whether `text` reads as a finite decimal number literal
///
/// Accepts an optional sign, digits with an optional fraction and an
/// optional exponent. Rejects the words `inf` and `NaN` that `f64::from_str`
/// would otherwise accept.
pub fn is_number_literal(text: &str) -> bool {
    if text.is_empty()
        || text
            .chars()
            .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return false;
    }
    text.parse::<f64>().map_or(false, f64::is_finite)
}
