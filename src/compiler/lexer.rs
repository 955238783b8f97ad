use crate::foundation::error::{FrameletError, FrameletResult};

/// A lexed token with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// Token payload.
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: usize,
    /// 1-based source column.
    pub column: usize,
}

/// Token kinds of the worklet mini-language.
///
/// The token set is deliberately closed: there is no assignment, no braces,
/// no statement separators. Constructs outside the restricted expression
/// grammar fail here or in the parser rather than reaching the IR.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Numeric literal.
    Number(f64),
    /// String literal (single- or double-quoted).
    Str(String),
    /// Identifier: parameter, function, method, or property name.
    Ident(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `.`
    Dot,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
}

/// Tokenize a worklet expression body.
pub fn lex(source: &str) -> FrameletResult<Vec<Token>> {
    Lexer::new(source).lex()
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn lex(mut self) -> FrameletResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let (line, column) = (self.line, self.column);
            let Some(ch) = self.peek() else { break };

            let kind = if ch.is_ascii_digit() {
                self.lex_number(line, column)?
            } else if is_ident_start(ch) {
                self.lex_ident()
            } else {
                match ch {
                    '"' | '\'' => self.lex_string(ch, line, column)?,
                    '+' => self.single(TokenKind::Plus),
                    '-' => self.single(TokenKind::Minus),
                    '*' => self.single(TokenKind::Star),
                    '/' => self.single(TokenKind::Slash),
                    '%' => self.single(TokenKind::Percent),
                    '?' => self.single(TokenKind::Question),
                    ':' => self.single(TokenKind::Colon),
                    '.' => self.single(TokenKind::Dot),
                    ',' => self.single(TokenKind::Comma),
                    '(' => self.single(TokenKind::LParen),
                    ')' => self.single(TokenKind::RParen),
                    '[' => self.single(TokenKind::LBracket),
                    ']' => self.single(TokenKind::RBracket),
                    '=' => self.pair('=', TokenKind::EqEq, line, column)?,
                    '!' => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                            TokenKind::NotEq
                        } else {
                            TokenKind::Bang
                        }
                    }
                    '<' => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                            TokenKind::LessEq
                        } else {
                            TokenKind::Less
                        }
                    }
                    '>' => {
                        self.advance();
                        if self.peek() == Some('=') {
                            self.advance();
                            TokenKind::GreaterEq
                        } else {
                            TokenKind::Greater
                        }
                    }
                    '&' => self.pair('&', TokenKind::AndAnd, line, column)?,
                    '|' => self.pair('|', TokenKind::OrOr, line, column)?,
                    other => {
                        return Err(FrameletError::compile(format!(
                            "unexpected character '{other}' at {line}:{column}"
                        )));
                    }
                }
            };
            tokens.push(Token { kind, line, column });
        }
        Ok(tokens)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.advance();
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Two-char operator whose halves are identical or fixed (`==`, `&&`, `||`).
    fn pair(
        &mut self,
        second: char,
        kind: TokenKind,
        line: usize,
        column: usize,
    ) -> FrameletResult<TokenKind> {
        let first = self.advance().unwrap_or(second);
        if self.peek() == Some(second) {
            self.advance();
            Ok(kind)
        } else {
            Err(FrameletError::compile(format!(
                "unexpected character '{first}' at {line}:{column}"
            )))
        }
    }

    fn lex_number(&mut self, line: usize, column: usize) -> FrameletResult<TokenKind> {
        let mut literal = String::new();
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
            literal.push(self.advance().unwrap_or('0'));
        }
        // A '.' is part of the number only when followed by a digit, so
        // `1.floor()` lexes as a method call on the integer literal.
        if self.peek() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some(ch) if ch.is_ascii_digit()) {
                literal.push(self.advance().unwrap_or('.'));
                while matches!(self.peek(), Some(ch) if ch.is_ascii_digit()) {
                    literal.push(self.advance().unwrap_or('0'));
                }
            }
        }
        literal
            .parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| {
                FrameletError::compile(format!("invalid number '{literal}' at {line}:{column}"))
            })
    }

    fn lex_ident(&mut self) -> TokenKind {
        let mut ident = String::new();
        while matches!(self.peek(), Some(ch) if is_ident_char(ch)) {
            if let Some(ch) = self.advance() {
                ident.push(ch);
            }
        }
        match ident.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(ident),
        }
    }

    fn lex_string(&mut self, quote: char, line: usize, column: usize) -> FrameletResult<TokenKind> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => {
                        return Err(FrameletError::compile(format!(
                            "unterminated string at {line}:{column}"
                        )));
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(FrameletError::compile(format!(
                        "unterminated string at {line}:{column}"
                    )));
                }
            }
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
#[path = "../../tests/unit/compiler/lexer.rs"]
mod tests;
