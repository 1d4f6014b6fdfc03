use crate::ast::Expr;
use crate::error::SyntaxError;
use crate::token::{Literal, Token, TokenKind};
use crate::value::Value;

// expression → equality
// equality   → comparison ( ( "!=" | "==" ) comparison )*
// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
// term       → factor ( ( "-" | "+" ) factor )*
// factor     → unary ( ( "/" | "*" ) unary )*
// unary      → ( "!" | "-" ) unary | primary
// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"

type ParseResult = Result<Expr, SyntaxError>;

/// Deepest run of nested groupings and prefix operators, bounding parser recursion.
const MAX_NESTING: usize = 128;
/// Tallest tree the parser builds, bounding recursion when it is evaluated or dropped.
const MAX_HEIGHT: usize = 1024;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    height: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }

        Self {
            tokens,
            current: 0,
            depth: 0,
            height: 0,
            errors: Vec::new(),
        }
    }

    /// Parses a single expression. On failure no tree is produced and the
    /// reported syntax errors are returned instead.
    pub fn parse(mut self) -> Result<Expr, Vec<SyntaxError>> {
        match self.expression() {
            Ok(expr) => Ok(expr),
            Err(err) => {
                self.errors.push(err);
                self.synchronize();
                Err(self.errors)
            }
        }
    }

    /// Skips to the next statement boundary: just past a `;`, or right before
    /// a statement-leading keyword.
    pub fn synchronize(&mut self) {
        self.next_token();

        while !self.is_eof() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }

            match self.at().kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.next_token();
                }
            }
        }
    }

    fn expression(&mut self) -> ParseResult {
        self.equality()
    }

    fn equality(&mut self) -> ParseResult {
        self.binary(&[TokenKind::BangEqual, TokenKind::EqualEqual], Self::comparison)
    }

    fn comparison(&mut self) -> ParseResult {
        self.binary(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::term,
        )
    }

    fn term(&mut self) -> ParseResult {
        self.binary(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    fn factor(&mut self) -> ParseResult {
        self.binary(&[TokenKind::Slash, TokenKind::Star], Self::unary)
    }

    /// One left-associative precedence level. Every fold makes the tree one
    /// node taller.
    fn binary(&mut self, operators: &[TokenKind], operand: fn(&mut Self) -> ParseResult) -> ParseResult {
        let outer = self.height;
        let result = self.fold(operators, operand);
        self.height = outer;
        result
    }

    fn fold(&mut self, operators: &[TokenKind], operand: fn(&mut Self) -> ParseResult) -> ParseResult {
        let mut left = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous().clone();
            self.grow()?;
            let right = operand(self)?;
            left = Expr::binary(left, operator, right);
        }

        Ok(left)
    }

    fn unary(&mut self) -> ParseResult {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.nested(Self::unary)?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult {
        match self.at().kind {
            TokenKind::False => {
                self.next_token();
                Ok(Expr::literal(Value::Bool(false)))
            }
            TokenKind::True => {
                self.next_token();
                Ok(Expr::literal(Value::Bool(true)))
            }
            TokenKind::Nil => {
                self.next_token();
                Ok(Expr::literal(Value::Nil))
            }
            TokenKind::Number | TokenKind::String => {
                let token = self.next_token();
                match token.literal {
                    Some(Literal::Number(n)) => Ok(Expr::literal(Value::Number(n))),
                    Some(Literal::Str(s)) => Ok(Expr::literal(Value::Str(s))),
                    None => Err(SyntaxError::from_token(&token, "Expect expression.")),
                }
            }
            TokenKind::LeftParen => {
                self.next_token();
                let expr = self.nested(Self::expression)?;
                self.eat(TokenKind::RightParen, "Expect ')' after expression.")?;
                Ok(Expr::grouping(expr))
            }
            _ => Err(SyntaxError::from_token(self.at(), "Expect expression.")),
        }
    }

    /// Runs `parse` one recursion level deeper.
    fn nested(&mut self, parse: fn(&mut Self) -> ParseResult) -> ParseResult {
        if self.depth >= MAX_NESTING {
            return Err(self.too_deep());
        }

        let (depth, height) = (self.depth, self.height);
        self.depth += 1;
        let result = self.grow().and_then(|()| parse(self));
        self.depth = depth;
        self.height = height;
        result
    }

    fn grow(&mut self) -> Result<(), SyntaxError> {
        if self.height >= MAX_HEIGHT {
            return Err(self.too_deep());
        }

        self.height += 1;
        Ok(())
    }

    fn too_deep(&self) -> SyntaxError {
        SyntaxError::from_token(self.at(), "Too much nesting.")
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.next_token();
            return true;
        }

        false
    }

    fn eat(&mut self, expecting: TokenKind, message: &str) -> Result<Token, SyntaxError> {
        if self.check(expecting) {
            return Ok(self.next_token());
        }

        Err(SyntaxError::from_token(self.at(), message))
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_eof() && self.at().kind == kind
    }

    fn at(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn next_token(&mut self) -> Token {
        if !self.is_eof() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn is_eof(&self) -> bool {
        self.at().kind == TokenKind::EOF
    }
}
