//=====================================================
// File: tokenizer.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Civet scanner for the C subset
// Objective: Turn source text into a token stream with line/column
//            positions, skipping line and block comments
//=====================================================

use std::fmt;

use thiserror::Error;

use crate::ast::Position;

/// All token types of the C subset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Integer(i64),
    Identifier(String),

    // Keywords
    Int,
    Void,
    If,
    Else,
    While,
    For,
    Return,
    Extern,
    Sizeof,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(value) => write!(f, "{}", value),
            TokenKind::Identifier(name) => f.write_str(name),
            TokenKind::Int => f.write_str("int"),
            TokenKind::Void => f.write_str("void"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::While => f.write_str("while"),
            TokenKind::For => f.write_str("for"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::Extern => f.write_str("extern"),
            TokenKind::Sizeof => f.write_str("sizeof"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Equal => f.write_str("="),
            TokenKind::EqualEqual => f.write_str("=="),
            TokenKind::NotEqual => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::LessEqual => f.write_str("<="),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::GreaterEqual => f.write_str(">="),
            TokenKind::LeftParen => f.write_str("("),
            TokenKind::RightParen => f.write_str(")"),
            TokenKind::LeftBracket => f.write_str("["),
            TokenKind::RightBracket => f.write_str("]"),
            TokenKind::LeftBrace => f.write_str("{"),
            TokenKind::RightBrace => f.write_str("}"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Semicolon => f.write_str(";"),
            TokenKind::Eof => f.write_str("<eof>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unexpected character `{ch}` at {position}")]
    UnexpectedChar { ch: char, position: Position },
    #[error("unterminated block comment starting at {position}")]
    UnterminatedComment { position: Position },
    #[error("integer literal out of range at {position}")]
    IntegerOutOfRange { position: Position },
}

pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let position = self.position();
            let Some(ch) = self.peek() else {
                tokens.push(Token::new(TokenKind::Eof, position));
                return Ok(tokens);
            };

            let kind = if ch.is_ascii_digit() {
                self.scan_integer(position)?
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                self.scan_word()
            } else {
                self.scan_operator(position)?
            };
            tokens.push(Token::new(kind, position));
        }
    }

    fn scan_integer(&mut self, position: Position) -> Result<TokenKind, TokenizeError> {
        let mut digits = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            digits.push(ch);
            self.advance();
        }
        digits
            .parse::<i64>()
            .map(TokenKind::Integer)
            .map_err(|_| TokenizeError::IntegerOutOfRange { position })
    }

    fn scan_word(&mut self) -> TokenKind {
        let mut word = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphanumeric() && ch != '_' {
                break;
            }
            word.push(ch);
            self.advance();
        }
        match word.as_str() {
            "int" => TokenKind::Int,
            "void" => TokenKind::Void,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "return" => TokenKind::Return,
            "extern" => TokenKind::Extern,
            "sizeof" => TokenKind::Sizeof,
            _ => TokenKind::Identifier(word),
        }
    }

    fn scan_operator(&mut self, position: Position) -> Result<TokenKind, TokenizeError> {
        let ch = self.chars[self.pos];
        self.advance();
        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '=' => {
                if self.eat('=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEqual
                } else {
                    return Err(TokenizeError::UnexpectedChar { ch, position });
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            _ => return Err(TokenizeError::UnexpectedChar { ch, position }),
        };
        Ok(kind)
    }

    /// Skip whitespace and both comment forms.
    fn skip_trivia(&mut self) -> Result<(), TokenizeError> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.position();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_at(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => self.advance(),
                            None => {
                                return Err(TokenizeError::UnterminatedComment { position: start })
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source)
            .tokenize()
            .expect("tokenize")
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn scans_declaration_and_keywords() {
        assert_eq!(
            kinds("int main() { return 0; }"),
            vec![
                TokenKind::Int,
                TokenKind::Identifier("main".to_string()),
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::Return,
                TokenKind::Integer(0),
                TokenKind::Semicolon,
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_two_char_operators() {
        assert_eq!(
            kinds("== != <= >= < > ="),
            vec![
                TokenKind::EqualEqual,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_and_block_comments() {
        let source = "// leading\nint a; /* int b; */ int c;";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Int,
                TokenKind::Identifier("a".to_string()),
                TokenKind::Semicolon,
                TokenKind::Int,
                TokenKind::Identifier("c".to_string()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_positions_across_lines() {
        let tokens = Tokenizer::new("int\n  x;").tokenize().expect("tokenize");
        assert_eq!(tokens[0].position, Position::new(1, 1));
        assert_eq!(tokens[1].position, Position::new(2, 3));
    }

    #[test]
    fn rejects_unterminated_block_comment() {
        let err = Tokenizer::new("int a; /* oops").tokenize().unwrap_err();
        assert!(matches!(err, TokenizeError::UnterminatedComment { .. }));
    }

    #[test]
    fn rejects_stray_bang() {
        let err = Tokenizer::new("a ! b").tokenize().unwrap_err();
        assert!(matches!(
            err,
            TokenizeError::UnexpectedChar { ch: '!', .. }
        ));
    }
}
