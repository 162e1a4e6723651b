use thiserror::Error;

use crate::lexer::prelude::{LexicalError, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    ExpectedExpression,
    ExpectedIdent,
    ExpectedType,
    ExpectedModulePath,
    ExpectedCatch,
    ExpectedExportable,
    UnexpectedToken {
        expected: Vec<String>,
    },
    InvalidTemplate {
        reason: String,
    },
}

/// A syntax error at `token`.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{} (Zeile {}, Spalte {})", self.message(), .token.position.line, .token.position.column)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub token: Token,
}

impl ParseError {
    pub fn code(&self) -> &'static str {
        "GL001"
    }

    fn found(&self) -> String {
        match &self.token.kind {
            TokenKind::Eof => "das Dateiende".to_string(),
            TokenKind::Int(_) => format!("die Zahl `{}`", self.token.lexeme),
            TokenKind::Float(_) => format!("die Kommazahl `{}`", self.token.lexeme),
            TokenKind::Str(_) | TokenKind::Template(_) => format!("den String {}", self.token.lexeme),
            TokenKind::Ident(name) => format!("den Bezeichner `{name}`"),
            kind if kind.is_reserved_word() => format!("das Schlüsselwort `{}`", self.token.lexeme),
            _ => format!("`{}`", self.token.lexeme),
        }
    }

    /// One-line description, used for `Display` and import failures.
    pub fn message(&self) -> String {
        let (label, _) = self.details();
        format!("{label}, gefunden: {}", self.found())
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::ExpectedExpression => ("Ausdruck erwartet", vec![]),
            ParseErrorType::ExpectedIdent => ("Bezeichner erwartet", vec![]),
            ParseErrorType::ExpectedType => (
                "Typ erwartet",
                vec!["Gültige Typen: NIX, GANZ, KOMMA, WORT, JAIN, KISTE".into()]
            ),
            ParseErrorType::ExpectedModulePath => ("Moduldatei als String erwartet", vec![]),
            ParseErrorType::ExpectedCatch => ("`FANGE` nach `VERSUCHE`-Block erwartet", vec![]),
            ParseErrorType::ExpectedExportable => (
                "Funktion, Variable oder Namensliste nach `GIBFREI` erwartet",
                vec![]
            ),
            ParseErrorType::UnexpectedToken { expected } => {
                let messages = std::iter::once("Erwartet wurde eines von:".to_string())
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Unerwartetes Token", messages)
            },
            ParseErrorType::InvalidTemplate { reason } => (
                "Ungültiger Template-String",
                vec![reason.clone()]
            ),
        }
    }

    /// Hint shown below the diagnostic.
    pub fn hint(&self) -> Option<String> {
        match &self.error {
            ParseErrorType::UnexpectedToken { expected } if expected.iter().any(|e| e == "`;`") => {
                Some("Fehlt ein Semikolon am Ende der vorherigen Anweisung?".into())
            },
            ParseErrorType::UnexpectedToken { expected } if expected.iter().any(|e| e == "`)`" || e == "`}`") => {
                Some("Prüfe, ob alle Klammern geschlossen sind.".into())
            },
            ParseErrorType::InvalidTemplate { .. } => {
                Some("Ein Platzhalter hat die Form ${ausdruck} und darf nicht leer sein.".into())
            },
            _ => None,
        }
    }
}

/// Failure to turn source text into a program.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexicalError),
    #[error("{}", .0.first().map(|error| error.to_string()).unwrap_or_default())]
    Parse(Vec<ParseError>),
}

impl SyntaxError {
    pub fn code(&self) -> &'static str {
        match self {
            SyntaxError::Lex(error) => error.code(),
            SyntaxError::Parse(_) => "GL001",
        }
    }
}
