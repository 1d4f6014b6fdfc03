//! # lox-expr
//!
//! The front half of a tree-walking Lox interpreter: a hand-written lexer, a
//! recursive-descent expression parser and an evaluator over dynamically
//! typed values.
//!
//! ```
//! use lox_expr::{run, value::Value};
//!
//! assert_eq!(run("1 + 2 * 3", false).unwrap(), Value::Number(7.0));
//! assert!(run("(1 + 2", false).is_err());
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use crate::ast::{AstPrinter, Expr};
use crate::error::{Diagnostic, LexingError, LoxError, RuntimeError, SyntaxError};
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::token::Token;
use crate::value::Value;

/// Scans `source` into tokens. Never fails; lexical errors come back alongside.
pub fn scan(source: &str) -> (Vec<Token>, Vec<LexingError>) {
    Lexer::new(source).tokenize()
}

/// Parses one expression, or returns the syntax errors that prevented it.
pub fn parse(tokens: Vec<Token>) -> Result<Expr, Vec<SyntaxError>> {
    Parser::new(tokens).parse()
}

pub fn evaluate(expr: &Expr) -> Result<Value, RuntimeError> {
    Evaluator::new().evaluate(expr)
}

/// Scans and parses `source`, collecting lexical and syntax diagnostics
/// together. Parsing still runs when the scan reported errors.
pub fn compile(source: &str, trace: bool) -> Result<Expr, LoxError> {
    let (tokens, lexing_errors) = scan(source);

    if trace {
        for token in &tokens {
            eprintln!("[debug] token: {}", token);
        }
    }

    let mut diagnostics: Vec<Diagnostic> = lexing_errors.into_iter().map(Diagnostic::from).collect();

    match parse(tokens) {
        Ok(expr) if diagnostics.is_empty() => {
            if trace {
                eprintln!("[debug] ast: {}", AstPrinter::print(&expr));
            }
            Ok(expr)
        }
        Ok(_) => Err(LoxError::Static(diagnostics)),
        Err(syntax_errors) => {
            diagnostics.extend(syntax_errors.into_iter().map(Diagnostic::from));
            Err(LoxError::Static(diagnostics))
        }
    }
}

/// Runs `source` end to end and returns the value of its expression.
///
/// # Errors
/// `LoxError::Static` when scanning or parsing reported anything,
/// `LoxError::Runtime` when evaluation hit an operand type mismatch.
pub fn run(source: &str, trace: bool) -> Result<Value, LoxError> {
    let expr = compile(source, trace)?;
    Ok(evaluate(&expr)?)
}
