use thiserror::Error;

use super::{
    ast::{BinaryOperator, Call, Expression, Node, Program, Statement},
    lexer::{LexError, Lexer, Token, TokenType},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),
    #[error("{0}: expected a statement")]
    ExpectedStatement(Token),
    #[error("{0}: expected an expression")]
    ExpectedExpression(Token),
    #[error("{found}: expected {expected:?}")]
    UnexpectedToken { expected: TokenType, found: Token },
    #[error("{0}: invalid integer literal")]
    InvalidInteger(Token),
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    peek_token: Token,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Result<Self, ParseError> {
        let mut parser = Self {
            lexer,
            current_token: Token::default(),
            peek_token: Token::default(),
        };

        // Fill both current and peek
        parser.next_token()?;
        parser.next_token()?;

        Ok(parser)
    }

    fn next_token(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token()?;
        self.current_token = std::mem::replace(&mut self.peek_token, next);
        Ok(())
    }

    fn current_token_is(&self, token_type: TokenType) -> bool {
        self.current_token.token == token_type
    }

    fn peek_token_is(&self, token_type: TokenType) -> bool {
        self.peek_token.token == token_type
    }

    /// Consume the current token if it has type `token_type`, returning its literal.
    fn expect(&mut self, token_type: TokenType) -> Result<String, ParseError> {
        if !self.current_token_is(token_type) {
            return Err(ParseError::UnexpectedToken {
                expected: token_type,
                found: self.current_token.clone(),
            });
        }
        let literal = std::mem::take(&mut self.current_token.literal);
        self.next_token()?;
        Ok(literal)
    }

    fn at_end_of_statement(&self) -> bool {
        self.current_token_is(TokenType::Newline) || self.current_token_is(TokenType::Eof)
    }

    fn parse_integer(&mut self) -> Result<i64, ParseError> {
        let literal = self.current_token.literal.replace('_', "");
        let lowered = literal.to_ascii_lowercase();
        let parsed = if let Some(hex) = lowered.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(binary) = lowered.strip_prefix("0b") {
            i64::from_str_radix(binary, 2)
        } else {
            lowered.parse::<i64>()
        };

        match parsed {
            Ok(value) => {
                self.next_token()?;
                Ok(value)
            }
            Err(_) => Err(ParseError::InvalidInteger(self.current_token.clone())),
        }
    }

    /// `expr {, expr}`
    fn parse_arguments(&mut self, terminator: TokenType) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        if self.current_token_is(terminator) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expression()?);
            if self.current_token_is(TokenType::Comma) {
                self.next_token()?;
                // Allow the argument list to continue on the next line
                while self.current_token_is(TokenType::Newline) {
                    self.next_token()?;
                }
            } else {
                return Ok(args);
            }
        }
    }

    /// `(args)` or nothing.
    fn parse_parenthesized_arguments(&mut self) -> Result<Vec<Expression>, ParseError> {
        if !self.current_token_is(TokenType::ParenLeft) {
            return Ok(Vec::new());
        }
        self.next_token()?;
        let args = self.parse_arguments(TokenType::ParenRight)?;
        self.expect(TokenType::ParenRight)?;
        Ok(args)
    }

    /// Receiver followed by `.method` or `::NAME`. The receiver is the current token.
    fn parse_qualified(&mut self) -> Result<Expression, ParseError> {
        let receiver = self.expect(TokenType::Identifier)?;
        if self.current_token_is(TokenType::DoubleColon) {
            self.next_token()?;
            let name = self.expect(TokenType::Identifier)?;
            return Ok(Expression::Constant { receiver, name });
        }

        self.expect(TokenType::Dot)?;
        let method = self.expect(TokenType::Identifier)?;
        let args = self.parse_parenthesized_arguments()?;
        Ok(Expression::Call(Call::new(&receiver, &method, args)))
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.current_token.token {
            TokenType::Integer => Ok(Expression::Integer(self.parse_integer()?)),
            TokenType::Minus => {
                self.next_token()?;
                Ok(Expression::Negate(Box::new(self.parse_primary()?)))
            }
            TokenType::ParenLeft => {
                self.next_token()?;
                let expression = self.parse_expression()?;
                self.expect(TokenType::ParenRight)?;
                Ok(expression)
            }
            TokenType::Identifier
                if self.peek_token_is(TokenType::Dot)
                    || self.peek_token_is(TokenType::DoubleColon) =>
            {
                self.parse_qualified()
            }
            TokenType::Identifier => Ok(Expression::Variable(self.expect(TokenType::Identifier)?)),
            _ => Err(ParseError::ExpectedExpression(self.current_token.clone())),
        }
    }

    /// Binary operators are evaluated left to right with no precedence between them.
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut expression = self.parse_primary()?;
        loop {
            let operator = match self.current_token.token {
                TokenType::Pipe => BinaryOperator::Or,
                TokenType::Ampersand => BinaryOperator::And,
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => return Ok(expression),
            };
            self.next_token()?;
            let right = self.parse_primary()?;
            expression = Expression::binary(operator, expression, right);
        }
    }

    /// `Receiver.method(args)`, `Receiver.method args`, or `Receiver.name = value`.
    fn parse_call_statement(&mut self) -> Result<Statement, ParseError> {
        let receiver = self.expect(TokenType::Identifier)?;
        self.expect(TokenType::Dot)?;
        let method = self.expect(TokenType::Identifier)?;

        let call = match self.current_token.token {
            TokenType::Assign => {
                self.next_token()?;
                let value = self.parse_expression()?;
                Call::new(&receiver, &format!("{}=", method), vec![value])
            }
            TokenType::ParenLeft => {
                let args = self.parse_parenthesized_arguments()?;
                Call::new(&receiver, &method, args)
            }
            _ if self.at_end_of_statement() => Call::new(&receiver, &method, vec![]),
            _ => {
                let args = self.parse_arguments(TokenType::Newline)?;
                Call::new(&receiver, &method, args)
            }
        };

        Ok(Statement::Call(call))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current_token.token {
            TokenType::Identifier if self.peek_token_is(TokenType::Assign) => {
                let name = self.expect(TokenType::Identifier)?;
                self.next_token()?; // Consume the `=`
                let value = self.parse_expression()?;
                Ok(Statement::Assign { name, value })
            }
            TokenType::Identifier if self.peek_token_is(TokenType::Dot) => {
                self.parse_call_statement()
            }
            _ => Err(ParseError::ExpectedStatement(self.current_token.clone())),
        }
    }

    /// Parse the entire script.
    #[tracing::instrument(skip(self))]
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();
        loop {
            while self.current_token_is(TokenType::Newline) {
                self.next_token()?;
            }
            if self.current_token_is(TokenType::Eof) {
                return Ok(program);
            }

            let line = self.current_token.span.start.line;
            let statement = self.parse_statement()?;
            if !self.at_end_of_statement() {
                return Err(ParseError::UnexpectedToken {
                    expected: TokenType::Newline,
                    found: self.current_token.clone(),
                });
            }
            program.push(Node { statement, line });
        }
    }
}

/// Parse a whole call script.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(Lexer::new(source))?.parse_program()
}
