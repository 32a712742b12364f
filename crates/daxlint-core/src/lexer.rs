//! Scans a raw DAX expression and produces a stream of channel-tagged tokens.
//!
//! The lexer is total: every byte of the input ends up in exactly one token,
//! so keeping the non-comment tokens and re-inserting the comment tokens
//! always reproduces the source. Unterminated literals and comments run to the
//! end of the input, and characters it does not recognize become
//! [`TokenKind::Unknown`] tokens rather than errors.
//!
//! SUPPORTED SYNTAX:
//! - Comments: `// ...`, `-- ...`, `/* ... */`
//! - Table names: `'Dim Date'` (`''` escapes a quote)
//! - Columns and measures: `[Total Sales]` (`]]` escapes a bracket)
//! - Strings: `"text"` (`""` escapes a quote)
//! - Numbers: `42`, `4.2`, `.5`, `1e3`
//! - Operators: `+ - * / ^ & && || = == <> < <= > >= => , . ( ) { }`

use crate::token::{Builtin, Token, TokenKind};
use std::iter::Peekable;
use std::str::CharIndices;
use tracing::trace;

/// Tokenizes a complete expression.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Streaming lexer over a source string.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    offset: usize,
    line: usize,
    column: usize,
    index: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            index: 0,
        }
    }

    /// Consumes the lexer and returns every token.
    #[must_use]
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Advances the lexer and returns the next token, or `None` at the end.
    pub fn next_token(&mut self) -> Option<Token> {
        let start = self.offset;
        let line = self.line;
        let column = self.column;

        let kind = match self.bump()? {
            ch if ch.is_whitespace() => {
                self.eat_while(char::is_whitespace);
                TokenKind::Whitespace
            }
            '/' => match self.peek() {
                Some('/') => self.read_line_comment(),
                Some('*') => self.read_delimited_comment(),
                _ => TokenKind::Div,
            },
            '-' => match self.peek() {
                Some('-') => self.read_line_comment(),
                _ => TokenKind::Minus,
            },
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '^' => TokenKind::Caret,
            ',' => TokenKind::Comma,
            '(' => TokenKind::OpenParens,
            ')' => TokenKind::CloseParens,
            '{' => TokenKind::OpenCurly,
            '}' => TokenKind::CloseCurly,
            '&' => self.pair('&', TokenKind::And, TokenKind::Ampersand),
            '|' => self.pair('|', TokenKind::Or, TokenKind::Unknown),
            '=' => match self.peek() {
                Some('>') => {
                    self.bump();
                    TokenKind::Arrow
                }
                Some('=') => {
                    self.bump();
                    TokenKind::StrictEquals
                }
                _ => TokenKind::Equals,
            },
            '<' => match self.peek() {
                Some('=') => {
                    self.bump();
                    TokenKind::LessEquals
                }
                Some('>') => {
                    self.bump();
                    TokenKind::NotEquals
                }
                _ => TokenKind::Less,
            },
            '>' => self.pair('=', TokenKind::GreaterEquals, TokenKind::Greater),
            '"' => {
                self.read_quoted('"');
                TokenKind::StringLiteral
            }
            '\'' => {
                self.read_quoted('\'');
                TokenKind::Table
            }
            '[' => {
                self.read_quoted(']');
                TokenKind::ColumnOrMeasure
            }
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.read_number(true),
            '.' => TokenKind::Dot,
            ch if ch.is_ascii_digit() => self.read_number(false),
            ch if is_identifier_start(ch) => self.read_identifier(start),
            ch => {
                trace!("Unrecognized character {ch:?} at {line}:{column}");
                TokenKind::Unknown
            }
        };

        let token = Token {
            kind,
            text: self.source[start..self.offset].to_string(),
            start,
            stop: self.offset,
            line,
            column,
            channel: kind.channel(),
            index: self.index,
        };
        self.index += 1;
        Some(token)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn bump(&mut self) -> Option<char> {
        let (idx, ch) = self.chars.next()?;
        self.offset = idx + ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    /// Returns `double` if the next char is `second`, consuming it.
    fn pair(&mut self, second: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(second) {
            self.bump();
            double
        } else {
            single
        }
    }

    fn read_line_comment(&mut self) -> TokenKind {
        self.eat_while(|c| c != '\n' && c != '\r');
        TokenKind::SingleLineComment
    }

    fn read_delimited_comment(&mut self) -> TokenKind {
        // opening '*'
        self.bump();
        let mut prev = '\0';
        while let Some(ch) = self.bump() {
            if prev == '*' && ch == '/' {
                return TokenKind::DelimitedComment;
            }
            prev = ch;
        }
        trace!("Unterminated delimited comment");
        TokenKind::DelimitedComment
    }

    /// Reads up to and including `close`; a doubled `close` is an escape.
    fn read_quoted(&mut self, close: char) {
        while let Some(ch) = self.bump() {
            if ch == close {
                if self.peek() == Some(close) {
                    self.bump();
                } else {
                    return;
                }
            }
        }
        trace!("Unterminated literal, expected {close:?}");
    }

    fn read_number(&mut self, leading_dot: bool) -> TokenKind {
        let mut real = leading_dot;
        self.eat_while(|c| c.is_ascii_digit());
        if !real && self.peek() == Some('.') {
            real = true;
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) && self.exponent_follows() {
            real = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.eat_while(|c| c.is_ascii_digit());
        }
        if real {
            TokenKind::RealLiteral
        } else {
            TokenKind::IntegerLiteral
        }
    }

    /// Checks that the `e` under the cursor starts an exponent, not a word.
    fn exponent_follows(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        match ahead.next() {
            Some((_, '+' | '-')) => ahead.next().is_some_and(|(_, c)| c.is_ascii_digit()),
            Some((_, c)) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn read_identifier(&mut self, start: usize) -> TokenKind {
        self.eat_while(is_identifier_continue);
        let word = &self.source[start..self.offset];

        match word.to_ascii_uppercase().as_str() {
            "VAR" => return TokenKind::Var,
            "RETURN" => return TokenKind::Return,
            "DEFINE" => return TokenKind::Define,
            "EVALUATE" => return TokenKind::Evaluate,
            "MEASURE" => return TokenKind::Measure,
            "NOT" => return TokenKind::Not,
            "IN" => return TokenKind::In,
            "ORDER" => return TokenKind::Order,
            "BY" => return TokenKind::By,
            "ASC" => return TokenKind::Asc,
            "DESC" => return TokenKind::Desc,
            _ => {}
        }

        // A built-in name is only a function when it is called.
        match Builtin::from_name(word) {
            Some(builtin) if self.call_follows() => TokenKind::Function(builtin),
            _ => TokenKind::TableOrVariable,
        }
    }

    fn call_follows(&self) -> bool {
        self.chars
            .clone()
            .map(|(_, ch)| ch)
            .find(|ch| !ch.is_whitespace())
            == Some('(')
    }
}

/// Returns true if `ch` can start an identifier.
fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// Returns true if `ch` can continue an identifier.
/// `.` is allowed for dotted function names such as `PERCENTILE.INC`.
fn is_identifier_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '.'
}
