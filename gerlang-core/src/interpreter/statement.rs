use crate::{
    environment::prelude::{Environment, Value},
    parser::prelude::{Block, ForStatement, Statement, TryCatch, VariableDeclaration},
};
use super::error::{ExecError, RuntimeErrorKind};
use super::interpreter::{Completion, ExecResult, Interpreter};

impl Interpreter {
    pub fn execute(&mut self, statement: &Statement) -> ExecResult<Completion> {
        match statement {
            Statement::Expression(statement) => {
                self.evaluate(&statement.expression)?;
            },
            Statement::Variable(declaration) => self.declare(declaration)?,
            Statement::Function(declaration) => self.register_function(declaration),
            Statement::Assignment(assignment) => {
                let value = self.evaluate(&assignment.value)?;
                self.assign(&assignment.name, value)?;
            },
            Statement::Block(block) => return self.execute_block(block),
            Statement::If(statement) => {
                if self.evaluate(&statement.condition)?.is_truthy() {
                    return self.execute(&statement.then_branch);
                }

                if let Some(else_branch) = &statement.else_branch {
                    return self.execute(else_branch);
                }
            },
            Statement::While(statement) => {
                while self.evaluate(&statement.condition)?.is_truthy() {
                    if let Completion::Return(value) = self.execute(&statement.body)? {
                        return Ok(Completion::Return(value));
                    }
                }
            },
            Statement::For(statement) => {
                let scope = Environment::new_enclosed(&self.env);
                return self.with_env(scope, |interpreter| interpreter.execute_for(statement));
            },
            Statement::Return(statement) => {
                let value = match &statement.value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Null,
                };

                return Ok(Completion::Return(value));
            },
            Statement::Print(statement) => {
                let value = self.evaluate(&statement.expression)?;
                self.console.write_line(&value.to_string());
            },
            Statement::Throw(statement) => {
                let value = self.evaluate(&statement.expression)?;

                return Err(self.error(
                    RuntimeErrorKind::Raised { message: value.to_string() },
                    statement.position,
                ));
            },
            Statement::TryCatch(statement) => return self.execute_try(statement),
            Statement::Export(export) => return self.execute(&export.declaration),
            Statement::ExportList(_) => {},
            Statement::Import(import) => self.execute_import(import)?,
        }

        Ok(Completion::Normal)
    }

    /// Runs statements in the current scope, stopping at the first return.
    pub(super) fn execute_statements(&mut self, statements: &[Statement]) -> ExecResult<Completion> {
        for statement in statements {
            if let Completion::Return(value) = self.execute(statement)? {
                return Ok(Completion::Return(value));
            }
        }

        Ok(Completion::Normal)
    }

    fn execute_block(&mut self, block: &Block) -> ExecResult<Completion> {
        let scope = Environment::new_enclosed(&self.env);

        self.with_env(scope, |interpreter| interpreter.execute_statements(&block.statements))
    }

    fn declare(&mut self, declaration: &VariableDeclaration) -> ExecResult<()> {
        let value = match &declaration.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Value::Null,
        };

        self.env.borrow_mut().define(declaration.name.name.clone(), value);
        Ok(())
    }

    /// Initializer, condition, body and update all share the loop's one scope.
    fn execute_for(&mut self, statement: &ForStatement) -> ExecResult<Completion> {
        if let Some(initializer) = &statement.initializer {
            self.execute(initializer)?;
        }

        loop {
            if let Some(condition) = &statement.condition {
                if !self.evaluate(condition)?.is_truthy() {
                    break;
                }
            }

            if let Completion::Return(value) = self.execute(&statement.body)? {
                return Ok(Completion::Return(value));
            }

            if let Some(update) = &statement.update {
                self.execute(update)?;
            }
        }

        Ok(Completion::Normal)
    }

    /// Only runtime errors are caught; returns pass through and stack
    /// exhaustion keeps unwinding.
    fn execute_try(&mut self, statement: &TryCatch) -> ExecResult<Completion> {
        let error = match self.execute(&statement.body) {
            Err(ExecError::Runtime(error)) => error,
            other => return other,
        };

        tracing::debug!(code = error.kind.code(), "caught runtime error");

        let scope = Environment::new_enclosed(&self.env);

        if let Some(name) = &statement.catch_name {
            scope.borrow_mut().define(name.name.clone(), Value::String(error.message()));
        }

        self.with_env(scope, |interpreter| {
            interpreter.execute_statements(&statement.handler.statements)
        })
    }
}
