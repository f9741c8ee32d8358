use super::source_position::SourcePositionSpan;

/// TokenType defines the kinds of tokens found in a call script.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum TokenType {
    /// Receiver, method, constant or local variable name
    Identifier,
    /// Integer literal, decimal or with a `0x` / `0b` prefix
    Integer,
    /// `.`
    Dot,
    /// `::`
    DoubleColon,
    /// `,`
    Comma,
    /// `(`
    ParenLeft,
    /// `)`
    ParenRight,
    /// `=`
    Assign,
    /// `|`
    Pipe,
    /// `&`
    Ampersand,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// End of a statement
    Newline,
    /// Eof marks the end of the script
    #[default]
    Eof,
}

/// Token is a lexical unit of a call script.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Token {
    pub token: TokenType,
    /// Literal text, e.g. `"GBA"`, `"0x1F"`, `","`
    pub literal: String,
    pub span: SourcePositionSpan,
}

impl Token {
    pub fn new(token: TokenType, literal: &str, span: SourcePositionSpan) -> Self {
        Self {
            token,
            literal: literal.to_owned(),
            span,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token {
            TokenType::Newline => write!(f, "{}: end of line", self.span.start),
            TokenType::Eof => write!(f, "{}: end of script", self.span.start),
            _ => write!(f, "{}: {:?} '{}'", self.span.start, self.token, self.literal),
        }
    }
}
