// File: src/parser.rs
//
// Recursive descent parser for the SimPL language.
// Transforms a sequence of tokens into an Abstract Syntax Tree (AST).
//
// Each precedence level is one method that calls the next-tighter level and
// loops on its own operators, which yields left-associative binary nodes.
// Assignment is the one right-associative level.
//
//   declaration → function_decl | let_decl | statement
//   statement   → if | while | return | print | block | expression_stmt
//   expression  → assignment
//   assignment  → equality ( "=" assignment )?
//   equality    → comparison ( ( "==" | "!=" ) comparison )*
//   comparison  → term ( ( "<" | "<=" | ">" | ">=" ) term )*
//   term        → factor ( ( "+" | "-" ) factor )*
//   factor      → unary ( ( "*" | "/" | "%" ) unary )*
//   unary       → "-" unary | primary
//   primary     → literal | IDENTIFIER | "(" expression ")"
//
// Grammar violations travel up as `Err(SyntaxError)` until the nearest
// `declaration`, which records the error, skips to a statement boundary and
// carries on. One call to `parse` can therefore report several errors.
//
// Nesting depth is capped at MAX_NESTING. Grouping, unary and assignment
// operands, statement bodies and blocks each add a level, and so does every
// operator in a left-associative chain. Input nested past the cap is
// reported as a syntax error instead of exhausting the stack, and the cap
// also bounds the depth of every tree the interpreter walks.

use crate::ast::{Expr, Stmt};
use crate::errors::SyntaxError;
use crate::lexer::{Token, TokenKind};

type ParseResult<T> = Result<T, SyntaxError>;

/// Deepest syntax tree the parser will build
pub const MAX_NESTING: usize = 200;

/// Parser maintains position in the token stream plus the syntax errors seen so far
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    /// Creates a new parser from a vector of tokens.
    /// A trailing `Eof` token is appended if the stream lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    /// Parse the entire token stream into a vector of statements.
    ///
    /// Best effort: declarations that fail to parse are left out and their
    /// errors are available from `errors()` afterwards.
    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        stmts
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn take_errors(&mut self) -> Vec<SyntaxError> {
        std::mem::take(&mut self.errors)
    }

    // --- Declarations and statements ---

    fn declaration(&mut self) -> Option<Stmt> {
        let start = self.pos;
        let result = if self.check(TokenKind::Func) && self.check_next(TokenKind::Identifier) {
            self.function_declaration()
        } else if self.match_kind(TokenKind::Let) {
            self.let_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.errors.push(error);
                self.synchronize(start);
                None
            }
        }
    }

    fn function_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // func
        let name = self.consume(TokenKind::Identifier, "Expect function name.")?;
        self.consume(TokenKind::LeftParen, "Expect '(' after function name.")?;
        self.consume(TokenKind::RightParen, "Expect ')' after parameters.")?;
        self.consume(TokenKind::LeftBrace, "Expect '{' before function body.")?;
        let body = self.block()?;
        Ok(Stmt::FunctionDecl { name, body })
    }

    fn let_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;
        let initializer = if self.match_kind(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Let { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::If => {
                self.advance();
                self.if_statement()
            }
            TokenKind::While => {
                self.advance();
                self.while_statement()
            }
            TokenKind::Return => {
                self.advance();
                self.return_statement()
            }
            TokenKind::Print => {
                self.advance();
                self.print_statement()
            }
            TokenKind::LeftBrace => {
                self.advance();
                Ok(Stmt::Block(self.block()?))
            }
            _ => self.expression_statement(),
        }
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;
        let then_branch = Box::new(self.nested(Self::statement)?);
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.nested(Self::statement)?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after while condition.")?;
        let body = Box::new(self.nested(Self::statement)?);
        Ok(Stmt::While { condition, body })
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(value))
    }

    /// Parses the statements of a block whose `{` has already been consumed
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.nested(Self::block_body)
    }

    fn block_body(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }
        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(stmts)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    // --- Expressions, loosest binding first ---

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.equality()?;

        if self.match_kind(TokenKind::Equal) {
            let equals = self.previous().clone();
            let value = self.nested(Self::assignment)?;
            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                _ => Err(SyntaxError::new(equals, "Invalid assignment target.")),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[TokenKind::EqualEqual, TokenKind::BangEqual],
            Self::comparison,
        )
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[
                TokenKind::Less,
                TokenKind::LessEqual,
                TokenKind::Greater,
                TokenKind::GreaterEqual,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::unary,
        )
    }

    /// One left-associative precedence level: `next (op next)*`
    fn binary_level(
        &mut self,
        operators: &[TokenKind],
        next: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let base = self.depth;
        let result = self.binary_chain(operators, next);
        self.depth = base;
        result
    }

    /// Each operator makes the left-leaning tree one level deeper
    fn binary_chain(
        &mut self,
        operators: &[TokenKind],
        next: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut left = next(self)?;
        while self.match_any(operators) {
            let op = self.previous().clone();
            self.enter()?;
            let right = next(self)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_kind(TokenKind::Minus) {
            let op = self.previous().clone();
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::Integer
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::Char
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Nil => Ok(Expr::Literal(self.advance().clone())),
            TokenKind::Identifier => Ok(Expr::Variable(self.advance().clone())),
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.nested(Self::expression)?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(expr)
            }
            TokenKind::Unknown => {
                let token = self.peek().clone();
                let message = if token.text.starts_with('"') || token.text.starts_with('\'') {
                    "Unterminated literal.".to_string()
                } else {
                    format!("Unexpected character '{}'.", token.text)
                };
                Err(SyntaxError::new(token, message))
            }
            _ => Err(self.error_at_current("Expect expression.")),
        }
    }

    // --- Nesting limit ---

    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_at_current("Too much nesting."));
        }
        self.depth += 1;
        Ok(())
    }

    /// Runs `parse` one level deeper, failing once MAX_NESTING is reached
    fn nested<T>(&mut self, parse: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.enter()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // --- Error recovery ---

    /// Discards tokens until a statement boundary: just past a `;`, or before a
    /// token that starts a new declaration. At least one token is skipped when
    /// the failed declaration consumed nothing, so the parse always advances.
    fn synchronize(&mut self, start: usize) {
        if self.pos == start && !self.is_at_end() {
            if self.advance().kind == TokenKind::Semicolon {
                return;
            }
        }

        while !self.is_at_end() {
            if self.peek().kind.starts_declaration() {
                return;
            }
            if self.advance().kind == TokenKind::Semicolon {
                return;
            }
        }
    }

    // --- Token stream helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Two-token lookahead, used to tell `func name` apart from other statements
    fn check_next(&self, kind: TokenKind) -> bool {
        let next = self.tokens.get(self.pos + 1);
        next.map_or(false, |t| t.kind == kind)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|&kind| self.match_kind(kind))
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance().clone());
        }
        Err(self.error_at_current(message))
    }

    fn error_at_current(&self, message: &str) -> SyntaxError {
        SyntaxError::new(self.peek().clone(), message)
    }
}

/// Parses a token stream, returning the program only if it had no syntax errors
pub fn parse_program(tokens: Vec<Token>) -> Result<Vec<Stmt>, Vec<SyntaxError>> {
    let mut parser = Parser::new(tokens);
    let stmts = parser.parse();
    if parser.has_errors() {
        Err(parser.take_errors())
    } else {
        Ok(stmts)
    }
}
