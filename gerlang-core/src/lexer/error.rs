use thiserror::Error;

use crate::utils::prelude::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    UnterminatedString,
    NumberOutOfRange,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{} (Zeile {}, Spalte {})", self.message(), .location.line, .location.column)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: Position,
}

impl LexicalError {
    pub fn code(&self) -> &'static str {
        match self.error {
            LexicalErrorType::UnterminatedString => "GL101",
            LexicalErrorType::UnrecognizedToken { .. } => "GL102",
            LexicalErrorType::NumberOutOfRange => "GL103",
        }
    }

    pub fn message(&self) -> String {
        match self.error {
            LexicalErrorType::UnrecognizedToken { tok } => format!("Unerwartetes Zeichen '{tok}'"),
            _ => self.details().0.to_string(),
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedToken { .. } => {
                ("Unerwartetes Zeichen", vec![])
            },
            LexicalErrorType::UnterminatedString => {
                ("Unbeendeter String", vec!["Schließe den String mit dem gleichen Anführungszeichen.".into()])
            },
            LexicalErrorType::NumberOutOfRange => {
                ("Zahl ist zu groß für GANZ", vec!["GANZ-Werte sind 64-Bit-Ganzzahlen.".into()])
            },
        }
    }
}
