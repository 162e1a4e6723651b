use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Display,
    path::PathBuf,
    rc::{Rc, Weak},
};

use crate::{
    parser::prelude::{FunctionDeclaration, LiteralValue},
    utils::prelude::ConsoleIO,
};
use super::environment::Environment;
use super::error::NativeError;

type ArrayCell = RefCell<Vec<Value>>;

/// Functions declared in one module, by name.
pub type FunctionTable = Rc<RefCell<HashMap<String, Rc<UserFunction>>>>;

pub type NativeFn = dyn Fn(&dyn ConsoleIO, &[Value]) -> Result<Value, NativeError>;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    /// Shared and mutable: every binding of the same array sees its mutations.
    Array(Rc<RefCell<Vec<Value>>>),
    Null,
    Function(Rc<UserFunction>),
    Native(Rc<NativeFunction>),
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "GANZ",
            Self::Float(_) => "KOMMA",
            Self::Boolean(_) => "JAIN",
            Self::String(_) => "WORT",
            Self::Array(_) => "KISTE",
            Self::Null => "NIX",
            Self::Function(_) => "FUNKTION",
            Self::Native(_) => "EINGEBAUT",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(value) => *value,
            Self::Integer(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::String(value) => !value.is_empty(),
            Self::Array(elements) => !elements.borrow().is_empty(),
            Self::Function(_) | Self::Native(_) => true,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Native(_))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Text form where strings nested in arrays stay unquoted.
    pub fn to_plain_string(&self) -> String {
        let mut text = String::new();
        self.write_text(&mut text, false, false, &mut vec![]);
        text
    }

    /// `open` holds the arrays currently being written; an array that
    /// contains itself is written as `[...]` on the second visit.
    fn write_text(&self, out: &mut String, nested: bool, quote_nested: bool, open: &mut Vec<*const ArrayCell>) {
        match self {
            Self::Integer(value) => out.push_str(&value.to_string()),
            Self::Float(value) => out.push_str(&format_float(*value)),
            Self::Boolean(true) => out.push_str("JA"),
            Self::Boolean(false) => out.push_str("NEIN"),
            Self::String(value) if nested && quote_nested => {
                out.push('"');
                out.push_str(value);
                out.push('"');
            },
            Self::String(value) => out.push_str(value),
            Self::Array(elements) if open.contains(&Rc::as_ptr(elements)) => out.push_str("[...]"),
            Self::Array(elements) => {
                open.push(Rc::as_ptr(elements));
                out.push('[');
                for (idx, element) in elements.borrow().iter().enumerate() {
                    if idx > 0 {
                        out.push_str(", ");
                    }
                    element.write_text(out, true, quote_nested, open);
                }
                out.push(']');
                open.pop();
            },
            Self::Null => out.push_str("NIX"),
            Self::Function(function) => {
                out.push_str(&format!("<funktion {}>", function.name()));
            },
            Self::Native(native) => {
                out.push_str(&format!("<eingebaut {}>", native.name));
            },
        }
    }

    /// Structural equality. A pair of arrays already under comparison counts
    /// as equal, so self-containing arrays terminate.
    fn equals(&self, other: &Self, open: &mut Vec<(*const ArrayCell, *const ArrayCell)>) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                *a as f64 == *b
            },
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => {
                let pair = (Rc::as_ptr(a), Rc::as_ptr(b));
                if Rc::ptr_eq(a, b) || open.contains(&pair) {
                    return true;
                }

                let (left, right) = (a.borrow(), b.borrow());
                if left.len() != right.len() {
                    return false;
                }

                open.push(pair);
                let equal = left.iter().zip(right.iter()).all(|(x, y)| x.equals(y, open));
                open.pop();
                equal
            },
            (Self::Null, Self::Null) => true,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Native(a), Self::Native(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Canonical text form used by printing, templates and string concatenation.
impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut text = String::new();
        self.write_text(&mut text, false, true, &mut vec![]);
        write!(f, "{text}")
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut vec![])
    }
}

impl From<&LiteralValue> for Value {
    fn from(value: &LiteralValue) -> Self {
        match value {
            LiteralValue::Integer(value) => Self::Integer(*value),
            LiteralValue::Float(value) => Self::Float(*value),
            LiteralValue::String(value) => Self::String(value.clone()),
            LiteralValue::Boolean(value) => Self::Boolean(*value),
            LiteralValue::Null => Self::Null,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// A user function and the module it was declared in. While it runs, names
/// resolve against that module's globals and functions, and its file is the
/// current file.
#[derive(Debug)]
pub struct UserFunction {
    pub declaration: Rc<FunctionDeclaration>,
    pub file: Option<PathBuf>,
    pub globals: Weak<RefCell<Environment>>,
    pub functions: Weak<RefCell<HashMap<String, Rc<UserFunction>>>>,
}

impl UserFunction {
    pub fn name(&self) -> &str {
        &self.declaration.name.name
    }

    pub fn arity(&self) -> usize {
        self.declaration.parameters.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeArity {
    Exact(usize),
    /// Inclusive bounds; `max: None` accepts any number above `min`.
    Range { min: usize, max: Option<usize> },
}

impl NativeArity {
    pub fn accepts(&self, count: usize) -> bool {
        match self {
            Self::Exact(n) => *n == count,
            Self::Range { min, max } => count >= *min && max.map_or(true, |max| count <= max),
        }
    }
}

impl Display for NativeArity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Range { min, max: Some(max) } if min == max => write!(f, "{min}"),
            Self::Range { min, max: Some(max) } => write!(f, "{min} bis {max}"),
            Self::Range { min: 0, max: None } => write!(f, "beliebig viele"),
            Self::Range { min, max: None } => write!(f, "mindestens {min}"),
        }
    }
}

pub struct NativeFunction {
    pub name: String,
    pub arity: NativeArity,
    pub func: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, arity: NativeArity, func: F) -> Self
    where
        F: Fn(&dyn ConsoleIO, &[Value]) -> Result<Value, NativeError> + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Box::new(func),
        }
    }

    pub fn call(&self, console: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
        (self.func)(console, arguments)
    }
}

impl std::fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
