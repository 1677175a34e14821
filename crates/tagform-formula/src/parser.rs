//! Expression parser
//!
//! A recursive descent parser for rendered formula text with the usual
//! arithmetic precedence:
//!
//! 1. Addition/Subtraction: `+`, `-` (left associative)
//! 2. Multiplication/Division: `*`, `/` (left associative)
//! 3. Unary: prefix `-`, `+`
//! 4. Exponentiation: `^` (right associative)
//! 5. Primary: number literals, parentheses
//!
//! Unary minus binds looser than `^`, so `-2^2` is `-(2^2)`.
//!
//! Nesting is capped at [`MAX_DEPTH`] levels. Parentheses, signs, `^` and
//! every operator in a `+ -` or `* /` chain each count as a level, which also
//! bounds the depth of the resulting AST.

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};

/// Deepest expression the parser accepts
pub const MAX_DEPTH: usize = 256;

/// Parse arithmetic text into an AST
///
/// # Example
/// ```rust
/// use tagform_formula::parse_expression;
///
/// assert!(parse_expression("1+2*3").is_ok());
/// assert!(parse_expression("(9+1)^2").is_ok());
/// assert!(parse_expression("1+").is_err());
/// ```
pub fn parse_expression(text: &str) -> FormulaResult<Expr> {
    let mut parser = ExpressionParser::new(text.trim())?;
    let expr = parser.parse_additive()?;

    // Make sure we consumed all input
    if parser.current_token() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    LeftParen,
    RightParen,

    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Caret => f.write_str("'^'"),
            Token::LeftParen => f.write_str("'('"),
            Token::RightParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

/// Expression parser
struct ExpressionParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Token,
    depth: usize,
}

impl<'a> ExpressionParser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: Token::Eof,
            depth: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current_token = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            c if c.is_ascii_digit() || c == '.' => return self.scan_number(),
            other => {
                return Err(FormulaError::Parse(format!(
                    "Unexpected character '{}' at position {}",
                    other, self.pos
                )))
            }
        };

        self.advance();
        Ok(token)
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let num_str = &self.input[start..self.pos];
        num_str
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", num_str)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, char::is_whitespace) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        &self.current_token
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current_token, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {}, got {}",
                expected,
                self.current_token()
            )))
        }
    }

    fn descend(&mut self) -> FormulaResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::Parse("Expression nested too deeply".to_string()));
        }
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    // === Expression parsing with precedence ===

    fn parse_additive(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        let mut levels = 0;

        loop {
            let op = match self.current_token() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.consume()?;
            self.descend()?;
            levels += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::binary(op, left, right);
        }

        self.ascend(levels);
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_unary()?;
        let mut levels = 0;

        loop {
            let op = match self.current_token() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.consume()?;
            self.descend()?;
            levels += 1;
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }

        self.ascend(levels);
        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        let op = match self.current_token() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_exponent(),
        };

        self.consume()?;
        self.descend()?;
        let operand = self.parse_unary()?;
        self.ascend(1);
        Ok(Expr::unary(op, operand))
    }

    fn parse_exponent(&mut self) -> FormulaResult<Expr> {
        let left = self.parse_primary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume()?;
            self.descend()?;
            // Right associative; the exponent may carry its own sign
            let right = self.parse_unary()?;
            self.ascend(1);
            return Ok(Expr::binary(BinaryOperator::Power, left, right));
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume()?;
                Ok(Expr::Number(n))
            }

            Token::LeftParen => {
                self.consume()?;
                self.descend()?;
                let expr = self.parse_additive()?;
                self.expect(&Token::RightParen)?;
                self.ascend(1);
                Ok(expr)
            }

            other => Err(FormulaError::Parse(format!("Unexpected {}", other))),
        }
    }
}
