use crate::token::Token;
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// Expression tree. Each node owns its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Literal(Value),
    Grouping(Box<Expr>),
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: Value) -> Self {
        Expr::Literal(value)
    }

    pub fn grouping(inner: Expr) -> Self {
        Expr::Grouping(Box::new(inner))
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, Expr::Unary { .. } | Expr::Binary { .. })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", AstPrinter::print(self))
    }
}

pub struct AstPrinter;

impl AstPrinter {
    /// Lisp-style rendering, e.g. `(* (- 123) (group 45.67))`.
    pub fn print(expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => value.to_string(),
            Expr::Grouping(inner) => Self::parenthesize("group", &[inner.as_ref()]),
            Expr::Unary { operator, right } => Self::parenthesize(&operator.lexeme, &[right.as_ref()]),
            Expr::Binary { left, operator, right } => {
                Self::parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()])
            }
        }
    }

    /// Infix rendering that scans and parses back to the same tree, apart from
    /// the extra groupings around every compound operand.
    pub fn print_source(expr: &Expr) -> String {
        match expr {
            Expr::Literal(Value::Str(s)) => format!("\"{}\"", s),
            Expr::Literal(Value::Number(n)) => Self::number_source(*n),
            Expr::Literal(value) => value.to_string(),
            Expr::Grouping(inner) => format!("({})", Self::print_source(inner)),
            Expr::Unary { operator, right } => {
                format!("{}{}", operator.lexeme, Self::operand(right))
            }
            Expr::Binary { left, operator, right } => format!(
                "{} {} {}",
                Self::operand(left),
                operator.lexeme,
                Self::operand(right)
            ),
        }
    }

    /// Number literals only scan as non-negative finite values, so the rest
    /// are spelled as expressions that evaluate to the same number.
    fn number_source(n: f64) -> String {
        if n.is_nan() {
            "(0 / 0)".to_string()
        } else if n.is_infinite() {
            if n > 0.0 { "(1 / 0)" } else { "(-1 / 0)" }.to_string()
        } else if n.is_sign_negative() {
            format!("(-{})", Value::Number(-n))
        } else {
            Value::Number(n).to_string()
        }
    }

    fn operand(expr: &Expr) -> String {
        if expr.is_compound() {
            format!("({})", Self::print_source(expr))
        } else {
            Self::print_source(expr)
        }
    }

    fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
        let mut output = format!("({}", name);
        for expr in exprs {
            output.push(' ');
            output.push_str(&Self::print(expr));
        }
        output.push(')');
        output
    }
}
