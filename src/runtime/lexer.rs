use thiserror::Error;

use self::source_position::{SourcePosition, SourcePositionSpan};
pub use self::token::{Token, TokenType};

pub mod source_position;
mod token;

// Example script:
//
//   # white and magenta
//   GBA.set_object_palette_memory(1, 0x1F, 0x1F, 0x1F)
//   GBA.set_object_palette_memory 2, 0x1F, 0x00, 0x1F
//   paddle_y = 96
//   GBA.set_object_position(0, 5, paddle_y)
//   GBA.display_register = 0x1000 | 0x0040

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("{0}: Unexpected character '{1}'")]
    UnexpectedCharacter(SourcePosition, char),
}

pub struct Lexer {
    chars: Vec<char>,
    /// Index of the current char
    index: usize,
    /// Position of the current char
    position: SourcePosition,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            index: 0,
            position: SourcePosition::default(),
        }
    }

    fn ch(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn read_char(&mut self) {
        if let Some(ch) = self.ch() {
            self.position.advance(ch);
            self.index += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch(), Some(ch) if ch.is_whitespace() && ch != '\n') {
            self.read_char();
        }
    }

    fn skip_comment(&mut self) {
        while matches!(self.ch(), Some(ch) if ch != '\n') {
            self.read_char();
        }
    }

    /// Alphanumerics and underscores. Covers names as well as `0x1F`, `0b101` and
    /// `1_000`; the parser makes sense of the digits.
    fn read_word(&mut self) -> String {
        let start = self.index;
        while matches!(self.ch(), Some(ch) if ch.is_alphanumeric() || ch == '_') {
            self.read_char();
        }
        self.chars[start..self.index].iter().collect()
    }

    fn single(&mut self, token: TokenType, start: SourcePosition) -> Token {
        let literal = self.ch().map(String::from).unwrap_or_default();
        self.read_char();
        Token::new(token, &literal, SourcePositionSpan::new(start, self.position))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.position;

        let Some(ch) = self.ch() else {
            return Ok(Token::new(
                TokenType::Eof,
                "",
                SourcePositionSpan::new(start, start),
            ));
        };

        let token = match ch {
            '#' => {
                self.skip_comment();
                return self.next_token();
            }
            '\n' | ';' => self.single(TokenType::Newline, start),
            '.' => self.single(TokenType::Dot, start),
            ',' => self.single(TokenType::Comma, start),
            '(' => self.single(TokenType::ParenLeft, start),
            ')' => self.single(TokenType::ParenRight, start),
            '=' => self.single(TokenType::Assign, start),
            '|' => self.single(TokenType::Pipe, start),
            '&' => self.single(TokenType::Ampersand, start),
            '+' => self.single(TokenType::Plus, start),
            '-' => self.single(TokenType::Minus, start),
            ':' if self.peek_char() == Some(':') => {
                self.read_char();
                self.read_char();
                Token::new(
                    TokenType::DoubleColon,
                    "::",
                    SourcePositionSpan::new(start, self.position),
                )
            }
            '0'..='9' => {
                let literal = self.read_word();
                Token::new(
                    TokenType::Integer,
                    &literal,
                    SourcePositionSpan::new(start, self.position),
                )
            }
            ch if ch.is_alphabetic() || ch == '_' => {
                let literal = self.read_word();
                Token::new(
                    TokenType::Identifier,
                    &literal,
                    SourcePositionSpan::new(start, self.position),
                )
            }
            ch => return Err(LexError::UnexpectedCharacter(start, ch)),
        };

        Ok(token)
    }
}
