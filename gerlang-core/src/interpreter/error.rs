use std::path::PathBuf;

use thiserror::Error;

use crate::{
    environment::prelude::NativeError,
    parser::prelude::TypeName,
    utils::prelude::Position,
};
use super::call_stack::CallFrame;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Operator '{operator}' ist für {left} und {right} nicht definiert")]
    TypeMismatch {
        operator: String,
        left: &'static str,
        right: &'static str,
    },
    #[error("Operator '{operator}' ist für {operand} nicht definiert")]
    UnaryTypeMismatch {
        operator: String,
        operand: &'static str,
    },
    #[error("Variable '{name}' nicht definiert")]
    UndefinedVariable { name: String },
    #[error("Funktion '{name}' nicht gefunden")]
    UndefinedFunction { name: String },
    #[error("Funktion '{name}' erwartet {expected} Argumente, {given} gegeben")]
    ArgumentCount {
        name: String,
        expected: String,
        given: usize,
    },
    #[error("Division durch Null")]
    DivisionByZero,
    #[error("Modul '{module}' nicht gefunden")]
    ModuleNotFound { module: String },
    #[error("'{name}' wird von Modul '{module}' nicht exportiert")]
    ExportNotFound { name: String, module: String },
    #[error("Array-Zugriff nur auf KISTE möglich, nicht auf {got}")]
    NotAnArray { got: &'static str },
    #[error("Array-Index {index} außerhalb der Grenzen (Länge {length})")]
    IndexOutOfBounds { index: i64, length: usize },
    #[error("Array-Index muss eine Zahl sein, nicht {got}")]
    IndexNotNumeric { got: String },
    #[error("Unbekannte Eigenschaft '{name}' für {receiver}")]
    UnknownProperty { name: String, receiver: &'static str },
    #[error("Unbekannte Methode '{name}' für {receiver}")]
    UnknownMethod { name: String, receiver: &'static str },
    #[error("{got} ist nicht aufrufbar")]
    NotCallable { got: &'static str },
    #[error("Fehler in eingebauter Funktion '{name}': {error}")]
    Native { name: String, error: NativeError },
    #[error("Die Funktion 'haupt' muss den Rückgabetyp GANZ haben und darf keine Parameter erwarten (gefunden: {return_type} mit {parameters} Parametern)")]
    InvalidEntryPoint {
        return_type: TypeName,
        parameters: usize,
    },
    #[error("Zyklischer Import: {}", .chain.join(" -> "))]
    CyclicImport { chain: Vec<String> },
    #[error("Modul '{module}' enthält einen Syntaxfehler: {message}")]
    ModuleSyntax { module: String, message: String },
    #[error("Modul '{module}' exportiert '{name}', aber deklariert es nicht")]
    InvalidExport { name: String, module: String },
    #[error("Ganzzahlüberlauf bei '{operator}'")]
    IntegerOverflow { operator: String },
    #[error("{message}")]
    Raised { message: String },
    #[error("Ungültiges Zuweisungsziel")]
    InvalidAssignmentTarget,
    #[error("Modul '{module}' konnte nicht gelesen werden: {message}")]
    ModuleIo { module: String, message: String },
}

impl RuntimeErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::UnaryTypeMismatch { .. } => "GL002",
            Self::UndefinedVariable { .. } => "GL003",
            Self::UndefinedFunction { .. } => "GL004",
            Self::ArgumentCount { .. } => "GL005",
            Self::DivisionByZero => "GL006",
            Self::ModuleNotFound { .. } | Self::ModuleIo { .. } => "GL007",
            Self::ExportNotFound { .. } => "GL008",
            Self::NotAnArray { .. } => "GL009",
            Self::IndexOutOfBounds { .. } => "GL010",
            Self::IndexNotNumeric { .. } => "GL011",
            Self::UnknownProperty { .. } => "GL012",
            Self::UnknownMethod { .. } => "GL013",
            Self::NotCallable { .. } => "GL014",
            Self::Native { .. } => "GL015",
            Self::InvalidEntryPoint { .. } => "GL016",
            Self::CyclicImport { .. } => "GL017",
            Self::ModuleSyntax { .. } => "GL018",
            Self::InvalidExport { .. } => "GL019",
            Self::IntegerOverflow { .. } => "GL020",
            Self::Raised { .. } => "GL021",
            Self::InvalidAssignmentTarget => "GL022",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } | Self::UnaryTypeMismatch { .. } => "Typfehler",
            Self::UndefinedVariable { .. } => "Undefinierte Variable",
            Self::UndefinedFunction { .. } => "Undefinierte Funktion",
            Self::ArgumentCount { .. } => "Falsche Anzahl von Argumenten",
            Self::DivisionByZero => "Division durch Null",
            Self::ModuleNotFound { .. } | Self::ModuleIo { .. } => "Modul nicht gefunden",
            Self::ExportNotFound { .. } => "Export nicht gefunden",
            Self::NotAnArray { .. } => "Keine KISTE",
            Self::IndexOutOfBounds { .. } => "Index außerhalb der Grenzen",
            Self::IndexNotNumeric { .. } => "Index ist keine Zahl",
            Self::UnknownProperty { .. } => "Unbekannte Eigenschaft",
            Self::UnknownMethod { .. } => "Unbekannte Methode",
            Self::NotCallable { .. } => "Nicht aufrufbar",
            Self::Native { .. } => "Fehler in eingebauter Funktion",
            Self::InvalidEntryPoint { .. } => "Ungültiger Einstiegspunkt",
            Self::CyclicImport { .. } => "Zyklischer Import",
            Self::ModuleSyntax { .. } => "Syntaxfehler im Modul",
            Self::InvalidExport { .. } => "Ungültiger Export",
            Self::IntegerOverflow { .. } => "Ganzzahlüberlauf",
            Self::Raised { .. } => "Gemeckert",
            Self::InvalidAssignmentTarget => "Ungültige Zuweisung",
        }
    }

    pub fn hint(&self) -> Option<String> {
        let hint = match self {
            Self::TypeMismatch { .. } => "Wandle die Werte vorher passend um, z.B. mit ZU_GANZ, ZU_KOMMA oder ZU_WORT.",
            Self::UndefinedVariable { .. } => "Deklariere die Variable vor ihrer Verwendung, z.B. `GANZ x = 0;`.",
            Self::UndefinedFunction { .. } => "Prüfe die Schreibweise oder importiere die Funktion mit HOLE.",
            Self::DivisionByZero => "Prüfe den Divisor, bevor du teilst.",
            Self::ModuleNotFound { .. } => "Modulpfade werden relativ zur importierenden Datei aufgelöst.",
            Self::ExportNotFound { .. } => "Markiere die Deklaration im Modul mit GIBFREI.",
            Self::IndexOutOfBounds { .. } => "Gültige Indizes liegen zwischen 0 und LÄNGE - 1.",
            Self::UnknownProperty { .. } => "Verfügbar ist nur .LÄNGE.",
            Self::UnknownMethod { .. } => "Verfügbar sind .HINZUFÜGEN(...) und .ERWEITERN(...).",
            Self::InvalidEntryPoint { .. } => "Deklariere den Einstiegspunkt als `GANZ haupt() { ... ZURÜCK 0; }`.",
            Self::CyclicImport { .. } => "Löse die gegenseitige Abhängigkeit der Module auf.",
            Self::InvalidAssignmentTarget => "Zuweisen kannst du an Variablen und KISTE-Elemente.",
            _ => return None,
        };

        Some(hint.to_string())
    }
}

/// Language-level failure; catchable with VERSUCHE/FANGE.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind} (Zeile {}, Spalte {})", .position.line, .position.column)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub file_path: Option<PathBuf>,
    pub position: Position,
    /// Innermost frame first.
    pub call_stack: Vec<CallFrame>,
}

impl RuntimeError {
    /// Text bound to the variable of a FANGE clause.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExecError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Maximale Aufruftiefe von {limit} überschritten")]
    StackExhausted {
        limit: usize,
        file_path: Option<PathBuf>,
        position: Position,
        call_stack: Vec<CallFrame>,
    },
}

impl ExecError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Runtime(error) => error.kind.code(),
            Self::StackExhausted { .. } => "GL900",
        }
    }

    pub fn as_runtime(&self) -> Option<&RuntimeError> {
        match self {
            Self::Runtime(error) => Some(error),
            Self::StackExhausted { .. } => None,
        }
    }
}
