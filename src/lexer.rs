use crate::error::LexingError;
use crate::token::{Literal, Token, TokenKind};

pub struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<LexingError>,
    start: usize,
    current: usize,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole input. Always ends with a single `EOF` token; lexical
    /// errors are collected alongside instead of aborting the scan.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<LexingError>) {
        while !self.is_eof() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::eof(self.line));
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let ch = self.advance();

        match ch {
            '(' => self.create_token(TokenKind::LeftParen),
            ')' => self.create_token(TokenKind::RightParen),
            '{' => self.create_token(TokenKind::LeftBrace),
            '}' => self.create_token(TokenKind::RightBrace),
            ',' => self.create_token(TokenKind::Comma),
            '.' => self.create_token(TokenKind::Dot),
            '-' => self.create_token(TokenKind::Minus),
            '+' => self.create_token(TokenKind::Plus),
            ';' => self.create_token(TokenKind::Semicolon),
            '*' => self.create_token(TokenKind::Star),
            '!' => {
                let kind = if self.eat('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.create_token(kind);
            }
            '=' => {
                let kind = if self.eat('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.create_token(kind);
            }
            '<' => {
                let kind = if self.eat('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.create_token(kind);
            }
            '>' => {
                let kind = if self.eat('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.create_token(kind);
            }
            '/' => {
                if self.eat('/') {
                    // Single-line comment, the newline itself is left for the main loop
                    while self.at() != '\n' && !self.is_eof() {
                        self.advance();
                    }
                } else {
                    self.create_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            c => self
                .errors
                .push(LexingError::new(self.line, format!("Unexpected character: {}", c))),
        }
    }

    fn string(&mut self) {
        while self.at() != '"' && !self.is_eof() {
            if self.at() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_eof() {
            self.errors.push(LexingError::new(self.line, "Unterminated string"));
            return;
        }

        self.advance(); // closing quote

        let value: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        self.create_literal_token(TokenKind::String, Literal::Str(value));
    }

    fn number(&mut self) {
        while self.at().is_ascii_digit() {
            self.advance();
        }

        // A trailing '.' without a digit after it is not part of the number
        if self.at() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.at().is_ascii_digit() {
                self.advance();
            }
        }

        match self.lexeme().parse::<f64>() {
            Ok(value) => self.create_literal_token(TokenKind::Number, Literal::Number(value)),
            Err(err) => self
                .errors
                .push(LexingError::new(self.line, format!("Invalid number literal: {}", err))),
        }
    }

    fn identifier(&mut self) {
        while is_alpha(self.at()) || self.at().is_ascii_digit() {
            self.advance();
        }

        let kind = TokenKind::keyword(&self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.create_token(kind);
    }

    fn at(&self) -> char {
        self.chars.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.chars.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let ch = self.at();
        self.current += 1;
        ch
    }

    /// Consumes the next character only if it is `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.is_eof() || self.at() != expected {
            return false;
        }

        self.current += 1;
        true
    }

    fn is_eof(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn create_token(&mut self, kind: TokenKind) {
        let token = Token::new(kind, self.lexeme(), None, self.line);
        self.tokens.push(token);
    }

    fn create_literal_token(&mut self, kind: TokenKind, literal: Literal) {
        let token = Token::new(kind, self.lexeme(), Some(literal), self.line);
        self.tokens.push(token);
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        assert!(errors.is_empty(), "unexpected lexing errors: {:?}", errors);
        tokens
    }

    fn token(kind: TokenKind, lexeme: &str, line: usize) -> Token {
        Token::new(kind, lexeme, None, line)
    }

    #[test]
    fn single_character_punctuation() {
        let cases = [
            ("(", TokenKind::LeftParen),
            (")", TokenKind::RightParen),
            ("{", TokenKind::LeftBrace),
            ("}", TokenKind::RightBrace),
            (",", TokenKind::Comma),
            (".", TokenKind::Dot),
            ("-", TokenKind::Minus),
            ("+", TokenKind::Plus),
            (";", TokenKind::Semicolon),
            ("*", TokenKind::Star),
        ];

        for (source, kind) in cases {
            assert_eq!(scan(source), vec![token(kind, source, 1), Token::eof(1)]);
        }
    }

    #[test]
    fn one_or_two_character_operators() {
        assert_eq!(
            scan("! != = == < <= > >="),
            vec![
                token(TokenKind::Bang, "!", 1),
                token(TokenKind::BangEqual, "!=", 1),
                token(TokenKind::Equal, "=", 1),
                token(TokenKind::EqualEqual, "==", 1),
                token(TokenKind::Less, "<", 1),
                token(TokenKind::LessEqual, "<=", 1),
                token(TokenKind::Greater, ">", 1),
                token(TokenKind::GreaterEqual, ">=", 1),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn comments_are_elided_but_advance_lines() {
        assert_eq!(
            scan("// comment\n/"),
            vec![token(TokenKind::Slash, "/", 2), Token::eof(2)]
        );
        assert_eq!(
            scan("// comment\n \r \t/"),
            vec![token(TokenKind::Slash, "/", 2), Token::eof(2)]
        );
        assert_eq!(scan("// only a comment"), vec![Token::eof(1)]);
    }

    #[test]
    fn strings() {
        assert_eq!(
            scan("\"hello\""),
            vec![
                Token::new(TokenKind::String, "\"hello\"", Some(Literal::Str("hello".into())), 1),
                Token::eof(1),
            ]
        );
        assert_eq!(
            scan("\"\""),
            vec![
                Token::new(TokenKind::String, "\"\"", Some(Literal::Str(String::new())), 1),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn multi_line_string_reports_closing_line() {
        assert_eq!(
            scan("\"a\nb\""),
            vec![
                Token::new(TokenKind::String, "\"a\nb\"", Some(Literal::Str("a\nb".into())), 2),
                Token::eof(2),
            ]
        );
    }

    #[test]
    fn unterminated_string_reports_and_emits_nothing() {
        let (tokens, errors) = Lexer::new("1 \"abc").tokenize();
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Number, "1", Some(Literal::Number(1.0)), 1),
                Token::eof(1),
            ]
        );
        assert_eq!(errors, vec![LexingError::new(1, "Unterminated string")]);
    }

    #[test]
    fn numbers() {
        assert_eq!(
            scan("12 0.33"),
            vec![
                Token::new(TokenKind::Number, "12", Some(Literal::Number(12.0)), 1),
                Token::new(TokenKind::Number, "0.33", Some(Literal::Number(0.33)), 1),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        assert_eq!(
            scan("123."),
            vec![
                Token::new(TokenKind::Number, "123", Some(Literal::Number(123.0)), 1),
                token(TokenKind::Dot, ".", 1),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn keywords_and_identifiers() {
        let source = "and class else false for fun if nil or print return super this true var while";
        let kinds: Vec<TokenKind> = scan(source).iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Else,
                TokenKind::False,
                TokenKind::For,
                TokenKind::Fun,
                TokenKind::If,
                TokenKind::Nil,
                TokenKind::Or,
                TokenKind::Print,
                TokenKind::Return,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::True,
                TokenKind::Var,
                TokenKind::While,
                TokenKind::EOF,
            ]
        );

        assert_eq!(
            scan("anderson or _andy9"),
            vec![
                token(TokenKind::Identifier, "anderson", 1),
                token(TokenKind::Or, "or", 1),
                token(TokenKind::Identifier, "_andy9", 1),
                Token::eof(1),
            ]
        );
    }

    #[test]
    fn unexpected_character_does_not_abort() {
        let (tokens, errors) = Lexer::new("1 @ 2").tokenize();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Number, TokenKind::EOF]);
        assert_eq!(errors, vec![LexingError::new(1, "Unexpected character: @")]);
    }

    #[test]
    fn empty_input_is_just_eof() {
        assert_eq!(scan(""), vec![Token::eof(1)]);
        assert_eq!(scan("\n\n"), vec![Token::eof(3)]);
    }
}
