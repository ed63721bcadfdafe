use log::{debug, warn};

use crate::expression::ast::{Expression, Operator};
use crate::expression::errors::FormatError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(u64),
    Decimal(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    FloorDiv,
    Modulo,
    LParen,
    RParen,
}

fn read_literal(chars: &[char], mut i: usize) -> Result<(Token, usize), FormatError> {
    let start = i;
    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }

    if chars.get(i) == Some(&'.') {
        i += 1;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        let literal: String = chars[start..i].iter().collect();
        if literal == "." {
            return Err(FormatError::FailedToParse("unexpected character '.'".to_string()));
        }
        return Ok((Token::Decimal(literal), i));
    }

    let literal: String = chars[start..i].iter().collect();
    if literal.len() > 1 && literal.starts_with('0') && literal.chars().any(|c| c != '0') {
        debug!("Rejecting number with leading zero: '{}'", literal);
        return Err(FormatError::FailedToParse(format!(
            "leading zero in literal {literal}"
        )));
    }
    let value = literal
        .parse::<u64>()
        .map_err(|_| FormatError::FailedToParse(format!("literal {literal} is out of range")))?;
    Ok((Token::Number(value), i))
}

fn tokenize(text: &str) -> Result<Vec<Token>, FormatError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while let Some(&c) = chars.get(i) {
        let next = chars.get(i + 1).copied();
        let (token, width) = match c {
            '0'..='9' | '.' => {
                let (token, end) = read_literal(&chars, i)?;
                (token, end - i)
            }
            '+' => (Token::Plus, 1),
            '-' => (Token::Minus, 1),
            '*' if next == Some('*') => (Token::Power, 2),
            '*' => (Token::Star, 1),
            '/' if next == Some('/') => (Token::FloorDiv, 2),
            '/' => (Token::Slash, 1),
            '^' => (Token::Power, 1),
            '%' => (Token::Modulo, 1),
            '(' => (Token::LParen, 1),
            ')' => (Token::RParen, 1),
            other => {
                return Err(FormatError::FailedToParse(format!(
                    "unexpected character '{other}'"
                )));
            }
        };
        tokens.push(token);
        i += width;
    }

    Ok(tokens)
}

/// Parentheses and unary signs may nest at most this deep
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recursive-descent parser over the full operator grammar
///
/// Unary signs, powers, floor division, modulo and decimal literals are
/// accepted syntactically and recorded in `deferred`, so malformed input is
/// always reported as `FailedToParse` before any of them.
struct Parser {
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    deferred: Option<FormatError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
            deferred: None,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn defer(&mut self, error: FormatError) {
        if self.deferred.is_none() {
            self.deferred = Some(error);
        }
    }

    fn parse_expression(&mut self) -> Result<Expression, FormatError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => Operator::Add,
                Some(Token::Minus) => Operator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = op.apply(left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Expression, FormatError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => Ok(Operator::Mul),
                Some(Token::Slash) => Ok(Operator::Div),
                Some(Token::Power) => Err("Pow"),
                Some(Token::FloorDiv) => Err("FloorDiv"),
                Some(Token::Modulo) => Err("Mod"),
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_factor()?;
            left = match op {
                Ok(op) => op.apply(left, right),
                Err(name) => {
                    self.defer(FormatError::UnallowedOperator(name.to_string()));
                    left
                }
            };
        }
    }

    fn parse_factor(&mut self) -> Result<Expression, FormatError> {
        self.depth += 1;
        let result = if self.depth > MAX_NESTING_DEPTH {
            Err(FormatError::FailedToParse(format!(
                "nesting deeper than {MAX_NESTING_DEPTH}"
            )))
        } else {
            self.parse_operand()
        };
        self.depth -= 1;
        result
    }

    fn parse_operand(&mut self) -> Result<Expression, FormatError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expression::Number(n)),
            Some(Token::Decimal(literal)) => {
                self.defer(FormatError::NotAnInteger(literal));
                Ok(Expression::Number(0))
            }
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FormatError::FailedToParse(
                        "unbalanced parentheses".to_string(),
                    )),
                }
            }
            Some(Token::Minus) => {
                self.defer(FormatError::UnallowedOperator("USub".to_string()));
                self.parse_factor()
            }
            Some(Token::Plus) => {
                self.defer(FormatError::UnallowedOperator("UAdd".to_string()));
                self.parse_factor()
            }
            Some(token) => Err(FormatError::FailedToParse(format!(
                "expected an operand, found {token:?}"
            ))),
            None => Err(FormatError::FailedToParse(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

/// Parses normalized text into an expression tree without evaluating it
///
/// Syntax is checked over the whole input first; operator and literal
/// restrictions only apply to text that parses.
///
/// # Errors
///
/// Returns `FailedToParse` for malformed syntax or nesting deeper than
/// `MAX_NESTING_DEPTH`, then `UnallowedOperator` for unary signs, powers, floor
/// division or modulo, and `NotAnInteger` for decimal literals.
pub fn parse(text: &str) -> Result<Expression, FormatError> {
    debug!("Parsing expression: '{}'", text);

    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormatError::FailedToParse("empty expression".to_string()));
    }

    let mut parser = Parser::new(tokens);
    let expression = parser.parse_expression()?;

    match parser.peek() {
        None => {}
        Some(Token::RParen) => {
            return Err(FormatError::FailedToParse(
                "unbalanced parentheses".to_string(),
            ));
        }
        Some(token) => {
            return Err(FormatError::FailedToParse(format!(
                "unexpected {token:?} after operand"
            )));
        }
    }

    if let Some(error) = parser.deferred {
        warn!("Rejecting '{}': {}", text, error);
        return Err(error);
    }
    debug!("Parsed expression: {}", expression);
    Ok(expression)
}
