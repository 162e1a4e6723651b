use std::{
    cell::RefCell,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    builtins,
    environment::prelude::{Env, Environment, FunctionTable, NativeFunction, UserFunction, Value},
    parser::prelude::{FunctionDeclaration, Identifier, Program, Statement, TypeName},
    utils::prelude::{ConsoleIO, Position, StdConsoleIO},
};
use super::call_stack::{CallFrame, CallStack, FrameGuard};
use super::error::{ExecError, RuntimeError, RuntimeErrorKind};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 2000;

/// Remaining native stack below which a call moves to a fresh stack segment.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT_SIZE: usize = 4 * 1024 * 1024;

/// Name of the function invoked after the top-level statements ran.
pub const ENTRY_POINT: &str = "haupt";

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub max_call_depth: usize,
    /// File the program was read from; imports resolve relative to it.
    pub current_file: Option<PathBuf>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            current_file: None,
        }
    }
}

/// Result of executing a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Normal,
    Return(Value),
}

/// Top-level names of one module and the file they were read from.
#[derive(Debug, Clone)]
pub(super) struct ModuleScope {
    pub(super) globals: Env,
    pub(super) functions: FunctionTable,
    pub(super) file: Option<PathBuf>,
}

pub struct Interpreter {
    /// Natives, shared by the program and every imported module.
    pub(super) builtins: Env,
    pub(super) globals: Env,
    pub(super) env: Env,
    pub(super) functions: FunctionTable,
    /// Scopes of imported modules. Functions only hold weak references to
    /// their module, this keeps the modules alive.
    pub(super) modules: Vec<ModuleScope>,
    pub(super) call_stack: Rc<RefCell<CallStack>>,
    pub(super) current_file: Option<PathBuf>,
    /// Canonical paths of the entry file and the modules being loaded.
    pub(super) loading: Vec<PathBuf>,
    pub(super) max_call_depth: usize,
    pub(super) console: Rc<dyn ConsoleIO>,
}

impl Interpreter {
    pub fn new(config: InterpreterConfig) -> Self {
        Self::with_console(config, Rc::new(StdConsoleIO))
    }

    pub fn with_console(config: InterpreterConfig, console: Rc<dyn ConsoleIO>) -> Self {
        let builtins = Environment::new().shared();
        let globals = Environment::new_enclosed(&builtins);

        let mut interpreter = Self {
            env: Rc::clone(&globals),
            globals,
            builtins,
            functions: FunctionTable::default(),
            modules: vec![],
            call_stack: Rc::new(RefCell::new(CallStack::new())),
            current_file: config.current_file,
            loading: vec![],
            max_call_depth: config.max_call_depth,
            console,
        };

        for native in builtins::catalog() {
            interpreter.define_native(native);
        }

        interpreter
    }

    /// Binds a builtin, visible to the program and to every module.
    pub fn define_native(&mut self, native: NativeFunction) {
        let name = native.name.clone();
        self.builtins.borrow_mut().define(name, Value::Native(Rc::new(native)));
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn function(&self, name: &str) -> Option<Rc<UserFunction>> {
        self.functions.borrow().get(name).cloned()
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.borrow().depth()
    }

    pub fn stack_trace(&self) -> Vec<CallFrame> {
        self.call_stack.borrow().get_stack_trace()
    }

    /// Runs a whole program: registers its functions, executes the remaining
    /// top-level statements and finally calls `haupt` if it is declared.
    /// Returns the value of `haupt`, or of a top-level `ZURÜCK`.
    pub fn interpret(&mut self, program: &Program) -> ExecResult<Option<Value>> {
        self.reset();
        self.register_functions(&program.statements);

        let entry = self.function(ENTRY_POINT);

        if let Some(entry) = &entry {
            self.validate_entry_point(&entry.declaration)?;
        }

        for statement in &program.statements {
            if matches!(statement, Statement::Function(_)) {
                continue;
            }

            if let Completion::Return(value) = self.execute(statement)? {
                tracing::debug!("top-level return, entry point skipped");
                return Ok(Some(value));
            }
        }

        match entry {
            Some(entry) => {
                let position = entry.declaration.position;
                self.call_function(&entry, vec![], position).map(Some)
            },
            None => Ok(None),
        }
    }

    /// Runs one REPL input against the persistent global scope and returns
    /// the value of a trailing expression statement. Never calls `haupt`.
    pub fn evaluate_line(&mut self, program: &Program) -> ExecResult<Option<Value>> {
        self.reset();
        self.register_functions(&program.statements);

        let last = program.statements.len().saturating_sub(1);
        let mut result = None;

        for (idx, statement) in program.statements.iter().enumerate() {
            match statement {
                Statement::Function(_) => {},
                Statement::Expression(statement) if idx == last => {
                    result = Some(self.evaluate(&statement.expression)?);
                },
                statement => {
                    if let Completion::Return(value) = self.execute(statement)? {
                        return Ok(Some(value));
                    }
                }
            }
        }

        Ok(result)
    }

    fn reset(&mut self) {
        self.call_stack.borrow_mut().clear();
        self.env = Rc::clone(&self.globals);
        self.loading = self.current_file.iter()
            .map(|file| file.canonicalize().unwrap_or_else(|_| file.clone()))
            .collect();
    }

    fn validate_entry_point(&self, declaration: &FunctionDeclaration) -> ExecResult<()> {
        if declaration.return_type == TypeName::Int && declaration.parameters.is_empty() {
            return Ok(());
        }

        Err(self.error(
            RuntimeErrorKind::InvalidEntryPoint {
                return_type: declaration.return_type,
                parameters: declaration.parameters.len(),
            },
            declaration.position,
        ))
    }

    pub(super) fn register_functions(&mut self, statements: &[Statement]) {
        for statement in statements {
            match statement {
                Statement::Function(declaration) => self.register_function(declaration),
                Statement::Export(export) => {
                    if let Statement::Function(declaration) = export.declaration.as_ref() {
                        self.register_function(declaration);
                    }
                },
                _ => {}
            }
        }
    }

    pub(super) fn register_function(&mut self, declaration: &Rc<FunctionDeclaration>) {
        let function = UserFunction {
            declaration: Rc::clone(declaration),
            file: self.current_file.clone(),
            globals: Rc::downgrade(&self.globals),
            functions: Rc::downgrade(&self.functions),
        };

        self.functions.borrow_mut().insert(declaration.name.name.clone(), Rc::new(function));
    }

    /// Runs `f` at the top level of `module`; the previous module, scope and
    /// file are restored whatever `f` returns.
    pub(super) fn with_module<T>(
        &mut self,
        module: ModuleScope,
        f: impl FnOnce(&mut Self) -> ExecResult<T>,
    ) -> ExecResult<T> {
        let env = Rc::clone(&module.globals);
        let previous = ModuleScope {
            globals: std::mem::replace(&mut self.globals, module.globals),
            functions: std::mem::replace(&mut self.functions, module.functions),
            file: std::mem::replace(&mut self.current_file, module.file),
        };

        let result = self.with_env(env, f);

        self.globals = previous.globals;
        self.functions = previous.functions;
        self.current_file = previous.file;
        result
    }

    /// Runtime error at `position` in the current file, with a snapshot of the call stack.
    pub(super) fn error(&self, kind: RuntimeErrorKind, position: Position) -> ExecError {
        ExecError::Runtime(RuntimeError {
            kind,
            file_path: self.current_file.clone(),
            position,
            call_stack: self.stack_trace(),
        })
    }

    /// Runs `f` with `env` as the current scope; the previous scope is
    /// restored whatever `f` returns.
    pub(super) fn with_env<T>(
        &mut self,
        env: Env,
        f: impl FnOnce(&mut Self) -> ExecResult<T>,
    ) -> ExecResult<T> {
        let previous = std::mem::replace(&mut self.env, env);
        let result = f(self);
        self.env = previous;
        result
    }

    pub(super) fn assign(&mut self, name: &Identifier, value: Value) -> ExecResult<()> {
        let assigned = self.env.borrow_mut().assign(&name.name, value);

        assigned.map_err(|_| self.error(
            RuntimeErrorKind::UndefinedVariable { name: name.name.clone() },
            name.position,
        ))
    }

    pub(super) fn call_value(
        &mut self,
        callee: Value,
        arguments: Vec<Value>,
        position: Position,
    ) -> ExecResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(&function, arguments, position),
            Value::Native(native) => self.call_native(&native, arguments, position),
            other => Err(self.error(RuntimeErrorKind::NotCallable { got: other.type_name() }, position)),
        }
    }

    pub(super) fn call_function(
        &mut self,
        function: &Rc<UserFunction>,
        arguments: Vec<Value>,
        position: Position,
    ) -> ExecResult<Value> {
        let declaration = Rc::clone(&function.declaration);

        if arguments.len() != function.arity() {
            return Err(self.error(
                RuntimeErrorKind::ArgumentCount {
                    name: function.name().to_string(),
                    expected: function.arity().to_string(),
                    given: arguments.len(),
                },
                position,
            ));
        }

        if self.call_depth() >= self.max_call_depth {
            return Err(ExecError::StackExhausted {
                limit: self.max_call_depth,
                file_path: self.current_file.clone(),
                position,
                call_stack: self.stack_trace(),
            });
        }

        let _frame = FrameGuard::enter(&self.call_stack, CallFrame {
            function_name: function.name().to_string(),
            file_path: self.current_file.clone(),
            line: position.line,
            column: position.column,
        });

        tracing::debug!(function = %function.name(), depth = self.call_depth(), "calling function");

        let module = ModuleScope {
            globals: function.globals.upgrade().unwrap_or_else(|| Rc::clone(&self.globals)),
            functions: function.functions.upgrade().unwrap_or_else(|| Rc::clone(&self.functions)),
            file: function.file.clone(),
        };

        let scope = Environment::new_enclosed(&module.globals);
        for (parameter, argument) in declaration.parameters.iter().zip(arguments) {
            scope.borrow_mut().define(parameter.name.name.clone(), argument);
        }

        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, || {
            self.with_module(module, |interpreter| {
                interpreter.with_env(scope, |interpreter| {
                    interpreter.execute_statements(&declaration.body.statements)
                })
            })
        });

        match result? {
            Completion::Return(value) => Ok(value),
            Completion::Normal => Ok(Value::Null),
        }
    }

    fn call_native(
        &mut self,
        native: &NativeFunction,
        arguments: Vec<Value>,
        position: Position,
    ) -> ExecResult<Value> {
        if !native.arity.accepts(arguments.len()) {
            return Err(self.error(
                RuntimeErrorKind::ArgumentCount {
                    name: native.name.clone(),
                    expected: native.arity.to_string(),
                    given: arguments.len(),
                },
                position,
            ));
        }

        native.call(self.console.as_ref(), &arguments)
            .map_err(|error| self.error(
                RuntimeErrorKind::Native { name: native.name.clone(), error },
                position,
            ))
    }
}
