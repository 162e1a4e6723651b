use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    environment::prelude::{Environment, FunctionTable, Value},
    parser::prelude::{parse_module, FunctionDeclaration, Import, Program, Statement, VariableDeclaration},
};
use super::error::RuntimeErrorKind;
use super::interpreter::{ExecResult, Interpreter, ModuleScope};

/// Extension tried when an import names a file without one.
pub const MODULE_EXTENSION: &str = "gerl";

/// A top-level declaration a module may export.
#[derive(Debug)]
enum Item<'a> {
    Function(&'a Rc<FunctionDeclaration>),
    Variable(&'a VariableDeclaration),
}

/// The public surface of a parsed module.
#[derive(Debug)]
struct Exports<'a> {
    items: HashMap<&'a str, Item<'a>>,
    public: Vec<&'a str>,
}

impl<'a> Exports<'a> {
    fn collect(program: &'a Program) -> Result<Self, String> {
        let mut items = HashMap::new();
        let mut public = vec![];
        let mut listed = vec![];

        for statement in &program.statements {
            let (statement, exported) = match statement {
                Statement::Export(export) => (export.declaration.as_ref(), true),
                Statement::ExportList(list) => {
                    listed.extend(list.names.iter().map(|name| name.name.as_str()));
                    continue;
                },
                statement => (statement, false),
            };

            let (name, item) = match statement {
                Statement::Function(function) => (function.name.name.as_str(), Item::Function(function)),
                Statement::Variable(variable) => (variable.name.name.as_str(), Item::Variable(variable)),
                _ => continue,
            };

            items.insert(name, item);
            if exported {
                public.push(name);
            }
        }

        for name in listed {
            if !items.contains_key(name) {
                return Err(name.to_string());
            }
            public.push(name);
        }

        Ok(Self { items, public })
    }

    fn get(&self, name: &str) -> Option<&Item<'a>> {
        if !self.public.iter().any(|public| *public == name) {
            return None;
        }

        self.items.get(name)
    }
}

fn resolve(base: Option<&Path>, module: &str) -> PathBuf {
    let directory = base
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();

    let path = directory.join(module);

    if !path.exists() && path.extension().is_none() {
        return path.with_extension(MODULE_EXTENSION);
    }

    path
}

impl Interpreter {
    pub(super) fn execute_import(&mut self, import: &Import) -> ExecResult<()> {
        let module = import.module.clone();
        let path = resolve(self.current_file.as_deref(), &module);

        tracing::debug!(module = %module, path = %path.display(), "resolving import");

        let path = path.canonicalize().map_err(|_| self.error(
            RuntimeErrorKind::ModuleNotFound { module: module.clone() },
            import.position,
        ))?;

        if self.loading.contains(&path) {
            let chain = self.loading.iter()
                .chain(std::iter::once(&path))
                .map(|path| path.display().to_string())
                .collect();

            return Err(self.error(RuntimeErrorKind::CyclicImport { chain }, import.position));
        }

        let src = std::fs::read_to_string(&path).map_err(|error| self.error(
            RuntimeErrorKind::ModuleIo { module: module.clone(), message: error.to_string() },
            import.position,
        ))?;

        let program = parse_module(&src).map_err(|error| self.error(
            RuntimeErrorKind::ModuleSyntax { module: module.clone(), message: error.to_string() },
            import.position,
        ))?;

        let exports = Exports::collect(&program).map_err(|name| self.error(
            RuntimeErrorKind::InvalidExport { name, module: module.clone() },
            import.position,
        ))?;

        for name in &import.names {
            if exports.get(&name.name).is_none() {
                return Err(self.error(
                    RuntimeErrorKind::ExportNotFound { name: name.name.clone(), module: module.clone() },
                    name.position,
                ));
            }
        }

        tracing::debug!(module = %module, names = import.names.len(), "loading module");

        let scope = ModuleScope {
            globals: Environment::new_enclosed(&self.builtins),
            functions: FunctionTable::default(),
            file: Some(path.clone()),
        };
        self.modules.push(scope.clone());

        self.loading.push(path);
        let result = self.with_module(scope.clone(), |interpreter| interpreter.load_module(&program));
        self.loading.pop();
        result?;

        for name in &import.names {
            match exports.get(&name.name) {
                Some(Item::Function(declaration)) => {
                    let function = scope.functions.borrow().get(&declaration.name.name).cloned();
                    if let Some(function) = function {
                        self.functions.borrow_mut().insert(name.name.clone(), function);
                    }
                },
                Some(Item::Variable(declaration)) => {
                    let value = scope.globals.borrow().get(&declaration.name.name).unwrap_or(Value::Null);
                    self.env.borrow_mut().define(name.name.clone(), value);
                },
                None => {},
            }
        }

        Ok(())
    }

    /// Declares the module's functions, then runs its imports and variable
    /// declarations in order. Other top-level statements are not executed.
    fn load_module(&mut self, program: &Program) -> ExecResult<()> {
        self.register_functions(&program.statements);

        for statement in &program.statements {
            let runs = match statement {
                Statement::Import(_) | Statement::Variable(_) => true,
                Statement::Export(export) => matches!(export.declaration.as_ref(), Statement::Variable(_)),
                _ => false,
            };

            if runs {
                self.execute(statement)?;
            }
        }

        Ok(())
    }
}
