// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the SimPL language.
// Converts source text into a flat sequence of tokens for the parser.
//
// Supports:
// - Keywords: func, return, if, else, let, while, for, print,
//   int, string, char, bool, true, false, nil
// - Identifiers, integer and float literals
// - String and char literals (quotes are kept in the token text)
// - Operators: + - * / % ^ = == != < <= > >= && ||
// - Punctuation: ( ) { } ; ,
// - Line comments starting with //
//
// Malformed input never stops the scan. Stray characters and unterminated
// literals come out as `TokenKind::Unknown` and are reported by the parser.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Semicolon,
    Comma,

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,

    // Assignment, relational and logical operators
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AndAnd,
    OrOr,

    // Literals
    Identifier,
    Integer,
    Float,
    String,
    Char,

    // Keywords
    Func,
    Return,
    If,
    Else,
    Let,
    While,
    For,
    Print,
    IntType,
    StringType,
    CharType,
    BoolType,
    True,
    False,
    Nil,

    Unknown,
    Eof,
}

impl TokenKind {
    /// Returns true for tokens that may open a new declaration or statement.
    /// The parser resynchronizes on these after a syntax error.
    pub fn starts_declaration(self) -> bool {
        matches!(
            self,
            TokenKind::Func
                | TokenKind::If
                | TokenKind::Return
                | TokenKind::Let
                | TokenKind::For
                | TokenKind::While
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexical unit. `text` is the exact slice of source it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Token {
            text: text.into(),
            kind,
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} '{}'", self.line, self.kind, self.text)
    }
}

static KEYWORDS: Lazy<HashMap<&'static str, TokenKind>> = Lazy::new(|| {
    HashMap::from([
        ("func", TokenKind::Func),
        ("return", TokenKind::Return),
        ("if", TokenKind::If),
        ("else", TokenKind::Else),
        ("let", TokenKind::Let),
        ("while", TokenKind::While),
        ("for", TokenKind::For),
        ("print", TokenKind::Print),
        ("int", TokenKind::IntType),
        ("string", TokenKind::StringType),
        ("char", TokenKind::CharType),
        ("bool", TokenKind::BoolType),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
        ("nil", TokenKind::Nil),
    ])
});

/// Tokenizes SimPL source code into a vector of tokens.
///
/// The scan is a single left-to-right pass with at most two characters of
/// lookahead. The returned vector always ends with exactly one `Eof` token.
///
/// # Arguments
/// * `source` - The SimPL source code as a string
///
/// # Returns
/// A vector of Token structs in source order
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    scanner.scan_all();
    scanner.tokens
}

struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    start: usize,
    line: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    fn scan_all(&mut self) {
        while let Some((start, c)) = self.chars.next() {
            self.start = start;
            match c {
                '(' => self.push(TokenKind::LeftParen),
                ')' => self.push(TokenKind::RightParen),
                '{' => self.push(TokenKind::LeftBrace),
                '}' => self.push(TokenKind::RightBrace),
                ';' => self.push(TokenKind::Semicolon),
                ',' => self.push(TokenKind::Comma),
                '+' => self.push(TokenKind::Plus),
                '-' => self.push(TokenKind::Minus),
                '*' => self.push(TokenKind::Star),
                '%' => self.push(TokenKind::Percent),
                '^' => self.push(TokenKind::Caret),
                '=' => self.push_two_char('=', TokenKind::EqualEqual, TokenKind::Equal),
                '!' => self.push_two_char('=', TokenKind::BangEqual, TokenKind::Unknown),
                '<' => self.push_two_char('=', TokenKind::LessEqual, TokenKind::Less),
                '>' => self.push_two_char('=', TokenKind::GreaterEqual, TokenKind::Greater),
                '&' => self.push_two_char('&', TokenKind::AndAnd, TokenKind::Unknown),
                '|' => self.push_two_char('|', TokenKind::OrOr, TokenKind::Unknown),
                '/' => {
                    if self.matches('/') {
                        // Stop before the newline so the main loop counts it
                        while let Some(ch) = self.peek() {
                            if ch == '\n' {
                                break;
                            }
                            self.chars.next();
                        }
                    } else {
                        self.push(TokenKind::Slash);
                    }
                }
                '"' => self.quoted('"', TokenKind::String),
                '\'' => self.quoted('\'', TokenKind::Char),
                ' ' | '\r' | '\t' => {}
                '\n' => self.line += 1,
                c if c.is_ascii_digit() => self.number(),
                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
                _ => self.push(TokenKind::Unknown),
            }
        }

        self.tokens.push(Token::new(TokenKind::Eof, "", self.line));
    }

    fn quoted(&mut self, quote: char, kind: TokenKind) {
        loop {
            match self.peek() {
                None => {
                    self.push(TokenKind::Unknown);
                    return;
                }
                Some(ch) if ch == quote => {
                    self.chars.next();
                    self.push(kind);
                    return;
                }
                Some(ch) => {
                    if ch == '\n' {
                        self.line += 1;
                    }
                    self.chars.next();
                }
            }
        }
    }

    fn number(&mut self) {
        self.consume_digits();

        // A fractional part needs at least one digit after the dot
        let has_fraction =
            self.peek() == Some('.') && self.peek_next().map_or(false, |ch| ch.is_ascii_digit());
        if has_fraction {
            self.chars.next();
            self.consume_digits();
            self.push(TokenKind::Float);
        } else {
            self.push(TokenKind::Integer);
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().map_or(false, |ch| ch.is_ascii_digit()) {
            self.chars.next();
        }
    }

    fn identifier(&mut self) {
        while self.peek().map_or(false, is_identifier_char) {
            self.chars.next();
        }
        let text = &self.source[self.start..self.offset()];
        let kind = KEYWORDS.get(text).copied().unwrap_or(TokenKind::Identifier);
        self.push(kind);
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, ch)| ch)
    }

    fn peek_next(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, ch)| ch)
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    /// Byte offset of the next unread character
    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn push(&mut self, kind: TokenKind) {
        let end = self.offset();
        let text = &self.source[self.start..end];
        self.tokens.push(Token::new(kind, text, self.line));
    }

    /// Pushes `long` if the next character is `second`, `short` otherwise
    fn push_two_char(&mut self, second: char, long: TokenKind, short: TokenKind) {
        let kind = if self.matches(second) { long } else { short };
        self.push(kind);
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_yields_only_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens, vec![Token::new(TokenKind::Eof, "", 1)]);
    }

    #[test]
    fn test_two_char_operators_use_maximal_munch() {
        assert_eq!(
            kinds("== != <= >= && || = < >"),
            vec![
                TokenKind::EqualEqual,
                TokenKind::BangEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_bang_ampersand_pipe_are_unknown() {
        let tokens = tokenize("! & |");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["!", "&", "|", ""]);
        assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::Unknown));
    }

    #[test]
    fn test_number_needs_digit_after_dot() {
        let tokens = tokenize("3. 3.25 42");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "3");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].text, ".");
        assert_eq!(tokens[2].kind, TokenKind::Float);
        assert_eq!(tokens[2].text, "3.25");
        assert_eq!(tokens[3].kind, TokenKind::Integer);
    }

    #[test]
    fn test_peek_next_does_not_consume() {
        let mut scanner = Scanner::new("ab");
        assert_eq!(scanner.peek_next(), Some('b'));
        assert_eq!(scanner.peek(), Some('a'));
    }
}
