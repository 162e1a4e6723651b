use std::path::PathBuf;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    interpreter::prelude::{CallFrame, ExecError, RuntimeError},
    parser::prelude::SyntaxError,
};
use super::diagnostic::{Diagnostic, Label, Location};
use super::src_span::Position;

/// Everything that can stop a program, bundled with the source needed to
/// report it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Datei '{}' konnte nicht gelesen werden: {err}", .path.display())]
    StdIo {
        path: PathBuf,
        err: std::io::ErrorKind,
    },
    #[error("{error}")]
    Syntax {
        path: PathBuf,
        src: String,
        error: SyntaxError,
    },
    #[error("{error}")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError,
    },
    #[error("Maximale Aufruftiefe von {limit} überschritten")]
    Exhausted {
        path: PathBuf,
        src: String,
        limit: usize,
        position: Position,
        call_stack: Vec<CallFrame>,
    },
}

fn trace(call_stack: &[CallFrame]) -> Vec<String> {
    call_stack.iter().map(|frame| frame.to_string()).collect()
}

impl Error {
    /// `path` and `src` belong to the file the error happened in.
    pub fn from_exec(path: PathBuf, src: String, error: ExecError) -> Self {
        match error {
            ExecError::Runtime(error) => Self::Runtime { path, src, error },
            ExecError::StackExhausted { limit, position, call_stack, .. } => Self::Exhausted {
                path,
                src,
                limit,
                position,
                call_stack,
            },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StdIo { .. } => 1,
            Self::Syntax { .. } => 2,
            Self::Runtime { .. } | Self::Exhausted { .. } => 3,
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();
        self.pretty(&mut nocolor);
        String::from_utf8(nocolor.into_inner()).expect("Error printing produced invalid utf8")
    }

    pub fn pretty(&self, buf: &mut Buffer) {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf);
            writeln!(buf).expect("write new line diagnostic");
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::StdIo { path, err } => vec![Diagnostic {
                code: "GL000",
                title: "Ein-/Ausgabefehler".into(),
                message: format!("'{}': {err}", path.display()),
                hint: None,
                stack_trace: vec![],
                location: None,
            }],
            Error::Syntax { path, src, error: SyntaxError::Lex(error) } => {
                let (title, extra) = error.details();

                vec![Diagnostic {
                    code: error.code(),
                    title: "Lexikalischer Fehler".into(),
                    message: error.message(),
                    hint: (!extra.is_empty()).then(|| extra.join("\n")),
                    stack_trace: vec![],
                    location: Some(Location {
                        src,
                        path: path.clone(),
                        position: error.location,
                        label: Label {
                            text: Some(title.to_string()),
                            span: error.location.span,
                        },
                    }),
                }]
            },
            Error::Syntax { path, src, error: SyntaxError::Parse(errors) } => errors.iter()
                .map(|error| {
                    let (label, extra) = error.details();
                    let hint = error.hint()
                        .into_iter()
                        .chain(extra)
                        .collect::<Vec<String>>();

                    Diagnostic {
                        code: error.code(),
                        title: "Syntaxfehler".into(),
                        message: error.message(),
                        hint: (!hint.is_empty()).then(|| hint.join("\n")),
                        stack_trace: vec![],
                        location: Some(Location {
                            src,
                            path: path.clone(),
                            position: error.token.position,
                            label: Label {
                                text: Some(label.to_string()),
                                span: error.token.position.span,
                            },
                        }),
                    }
                })
                .collect(),
            Error::Runtime { path, src, error } => vec![Diagnostic {
                code: error.kind.code(),
                title: error.kind.title().into(),
                message: error.message(),
                hint: error.kind.hint(),
                stack_trace: trace(&error.call_stack),
                location: Some(Location {
                    src,
                    path: path.clone(),
                    position: error.position,
                    label: Label {
                        text: Some(error.message()),
                        span: error.position.span,
                    },
                }),
            }],
            Error::Exhausted { path, src, limit, position, call_stack } => vec![Diagnostic {
                code: "GL900",
                title: "Stapelüberlauf".into(),
                message: format!("Maximale Aufruftiefe von {limit} überschritten"),
                hint: Some("Prüfe, ob die Rekursion eine Abbruchbedingung hat.".into()),
                // the full stack is mostly one function repeating
                stack_trace: trace(&call_stack[..call_stack.len().min(10)]),
                location: Some(Location {
                    src,
                    path: path.clone(),
                    position: *position,
                    label: Label {
                        text: Some("Aufruf über der Grenze".into()),
                        span: position.span,
                    },
                }),
            }],
        }
    }
}
