use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,
    And,
    Add,
    Subtract,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Or => "|",
            BinaryOperator::And => "&",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
        };
        write!(f, "{}", symbol)
    }
}

/// `Receiver.method(args)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub receiver: String,
    pub method: String,
    pub args: Vec<Expression>,
}

impl Call {
    pub fn new(receiver: &str, method: &str, args: Vec<Expression>) -> Self {
        Self {
            receiver: receiver.to_owned(),
            method: method.to_owned(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Integer(i64),
    Variable(String),
    /// `Receiver::NAME`
    Constant { receiver: String, name: String },
    Negate(Box<Expression>),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call(Call),
}

impl Expression {
    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name = value`
    Assign { name: String, value: Expression },
    /// A call made for its side effect. Setters `Receiver.name = value` become a call to
    /// `name=`.
    Call(Call),
}

/// A statement and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub statement: Statement,
    pub line: usize,
}

pub type Program = Vec<Node>;
