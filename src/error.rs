use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoxError {
    #[error("FileNotFoundError: {0}")]
    FileNotFound(String),
    #[error("IOError: {0}")]
    IO(#[from] std::io::Error),
    #[error("{}", render_diagnostics(.0))]
    Static(Vec<Diagnostic>),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl LoxError {
    /// Process exit status for batch mode, following sysexits.h.
    pub fn exit_code(&self) -> u8 {
        match self {
            LoxError::Static(_) => 65,
            LoxError::Runtime(_) => 70,
            LoxError::FileNotFound(_) | LoxError::IO(_) => 74,
        }
    }
}

fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A lexical or syntax error reported before evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    #[error(transparent)]
    Lexing(#[from] LexingError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::Lexing(err) => err.line,
            Diagnostic::Syntax(err) => err.line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Lexing(err) => &err.message,
            Diagnostic::Syntax(err) => &err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error: {message}")]
pub struct LexingError {
    pub line: usize,
    pub message: String,
}

impl LexingError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error {location}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub location: String,
    pub message: String,
}

impl SyntaxError {
    pub fn from_token(token: &Token, message: impl Into<String>) -> Self {
        let location = if token.kind == TokenKind::EOF {
            "at end".to_string()
        } else {
            format!("at '{}'", token.lexeme)
        };

        Self {
            line: token.line,
            location,
            message: message.into(),
        }
    }
}

/// Operand type mismatch raised while evaluating; carries the operator token.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}\n[line {}]", .token.line)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        Self {
            token: token.clone(),
            message: message.into(),
        }
    }
}
