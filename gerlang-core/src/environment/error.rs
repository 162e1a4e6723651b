use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    #[error("Variable '{name}' nicht definiert")]
    Undefined { name: String },
}

/// Failure raised inside a builtin function.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NativeError {
    #[error("Argument {position}: {expected} erwartet, {got} erhalten")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        got: &'static str,
    },
    #[error("'{value}' kann nicht zu {target} konvertiert werden")]
    Conversion {
        value: String,
        target: &'static str,
    },
    #[error("{message}")]
    Domain { message: String },
}

impl NativeError {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain { message: message.into() }
    }
}
