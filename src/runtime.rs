use std::collections::HashMap;

use thiserror::Error;

use crate::host::{CallError, CallSurface, Value, CLASS_NAME};

use self::ast::{BinaryOperator, Call, Expression, Program, Statement};
pub use self::parser::{parse, ParseError};

pub mod ast;
pub mod lexer;
pub mod parser;

#[derive(Error, Debug, PartialEq)]
pub enum ScriptError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("line {line}: {source}")]
    Call {
        line: usize,
        #[source]
        source: CallError,
    },
    #[error("line {line}: uninitialized constant {receiver}::{name}")]
    UnknownConstant {
        line: usize,
        receiver: String,
        name: String,
    },
    #[error("line {line}: undefined local variable {name}")]
    UnknownVariable { line: usize, name: String },
    #[error("line {line}: unknown receiver {receiver}")]
    UnknownReceiver { line: usize, receiver: String },
    #[error("line {line}: {operator} needs integers, got {left} and {right}")]
    TypeError {
        line: usize,
        operator: BinaryOperator,
        left: &'static str,
        right: &'static str,
    },
    #[error("line {line}: unary minus needs an integer, got {got}")]
    NegateTypeError { line: usize, got: &'static str },
    #[error("No script loaded")]
    NotLoaded,
}

/// Execution context for one call script.
///
/// The bridge's call surface is registered on [`Runtime::open`], a script is loaded with
/// [`Runtime::load`] and runs to completion with [`Runtime::call_entry`]. Dropping the runtime
/// releases the context.
pub struct Runtime<'s> {
    surface: &'s mut dyn CallSurface,
    locals: HashMap<String, Value>,
    program: Option<Program>,
}

impl<'s> Runtime<'s> {
    #[tracing::instrument(skip_all)]
    pub fn open(surface: &'s mut dyn CallSurface) -> Self {
        tracing::debug!("Opened script context for {}", CLASS_NAME);
        Self {
            surface,
            locals: HashMap::new(),
            program: None,
        }
    }

    #[tracing::instrument(skip_all)]
    pub fn load(&mut self, source: &str) -> Result<(), ScriptError> {
        let program = parse(source)?;
        tracing::debug!("Loaded {} statements", program.len());
        self.program = Some(program);
        Ok(())
    }

    /// Run the loaded script from the top.
    #[tracing::instrument(skip_all)]
    pub fn call_entry(&mut self) -> Result<(), ScriptError> {
        let program = self.program.take().ok_or(ScriptError::NotLoaded)?;
        let result = program
            .iter()
            .try_for_each(|node| self.execute(&node.statement, node.line));
        self.program = Some(program);
        result
    }

    /// Value of a local variable assigned by the script.
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    fn execute(&mut self, statement: &Statement, line: usize) -> Result<(), ScriptError> {
        match statement {
            Statement::Assign { name, value } => {
                let value = self.evaluate(value, line)?;
                self.locals.insert(name.clone(), value);
            }
            Statement::Call(call) => {
                self.call(call, line)?;
            }
        }
        Ok(())
    }

    fn call(&mut self, call: &Call, line: usize) -> Result<Value, ScriptError> {
        if call.receiver != CLASS_NAME {
            return Err(ScriptError::UnknownReceiver {
                line,
                receiver: call.receiver.clone(),
            });
        }
        let args = call
            .args
            .iter()
            .map(|arg| self.evaluate(arg, line))
            .collect::<Result<Vec<_>, _>>()?;
        self.surface
            .call(&call.method, &args)
            .map_err(|source| ScriptError::Call { line, source })
    }

    fn evaluate(&mut self, expression: &Expression, line: usize) -> Result<Value, ScriptError> {
        match expression {
            Expression::Integer(value) => Ok(Value::Integer(*value)),
            Expression::Variable(name) => {
                self.locals
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ScriptError::UnknownVariable {
                        line,
                        name: name.clone(),
                    })
            }
            Expression::Constant { receiver, name } => {
                let constant = if receiver == CLASS_NAME {
                    self.surface.constant(name)
                } else {
                    None
                };
                constant.ok_or_else(|| ScriptError::UnknownConstant {
                    line,
                    receiver: receiver.clone(),
                    name: name.clone(),
                })
            }
            Expression::Negate(operand) => match self.evaluate(operand, line)? {
                Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
                other => Err(ScriptError::NegateTypeError {
                    line,
                    got: other.type_name(),
                }),
            },
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.evaluate(left, line)?;
                let right = self.evaluate(right, line)?;
                let (Value::Integer(l), Value::Integer(r)) = (&left, &right) else {
                    return Err(ScriptError::TypeError {
                        line,
                        operator: *operator,
                        left: left.type_name(),
                        right: right.type_name(),
                    });
                };
                let value = match operator {
                    BinaryOperator::Or => l | r,
                    BinaryOperator::And => l & r,
                    BinaryOperator::Add => l.wrapping_add(*r),
                    BinaryOperator::Subtract => l.wrapping_sub(*r),
                };
                Ok(Value::Integer(value))
            }
            Expression::Call(call) => self.call(call, line),
        }
    }
}

impl Drop for Runtime<'_> {
    fn drop(&mut self) {
        tracing::debug!("Closed script context, {} locals released", self.locals.len());
    }
}

/// Open a context on `surface`, run `source` and close the context again.
pub fn run_script(source: &str, surface: &mut dyn CallSurface) -> Result<(), ScriptError> {
    let mut runtime = Runtime::open(surface);
    runtime.load(source)?;
    runtime.call_entry()
}
