use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::Value,
    interpreter::prelude::{ExecError, Interpreter, InterpreterConfig},
    lexer::prelude::{tokenize, Token},
    parser::prelude::{parse_module, Program, SyntaxError},
    utils::prelude::{ConsoleIO, Error},
};

/// Reads a source file as a UTF-8 character stream.
pub fn read_source(path: &Path) -> Result<String, Error> {
    let io_error = |err: std::io::Error| Error::StdIo { path: path.to_path_buf(), err: err.kind() };

    let file = std::fs::File::open(path).map_err(io_error)?;
    let file_size = file.metadata().map_err(io_error)?.len() as usize;

    let mut src = String::with_capacity(file_size);
    let mut reader = std::io::BufReader::new(file);

    for c in reader.chars() {
        src.push(c.map_err(io_error)?);
    }

    Ok(src)
}

pub fn lex_file(path: &Path) -> Result<(String, Vec<Token>), Error> {
    let src = read_source(path)?;

    match tokenize(&src) {
        Ok(tokens) => Ok((src, tokens)),
        Err(error) => Err(Error::Syntax {
            path: path.to_path_buf(),
            src,
            error: SyntaxError::Lex(error),
        }),
    }
}

pub fn parse_file(path: &Path) -> Result<(String, Program), Error> {
    let src = read_source(path)?;

    match parse_module(&src) {
        Ok(program) => Ok((src, program)),
        Err(error) => Err(Error::Syntax { path: path.to_path_buf(), src, error }),
    }
}

/// Attaches the source of the file `error` happened in. Errors raised inside
/// an imported module point into that module, so its text is read again.
pub fn locate(path: &Path, src: &str, error: ExecError) -> Error {
    let file = match &error {
        ExecError::Runtime(error) => error.file_path.as_deref(),
        ExecError::StackExhausted { file_path, .. } => file_path.as_deref(),
    };

    let (path, src) = match file {
        Some(file) if file != path => {
            let src = read_source(file).unwrap_or_default();
            (file.to_path_buf(), src)
        },
        _ => (path.to_path_buf(), src.to_string()),
    };

    Error::from_exec(path, src, error)
}

/// Parses and runs a program file; returns what `haupt` (or a top-level
/// `ZURÜCK`) produced.
pub fn run_file(
    path: &Path,
    max_call_depth: usize,
    console: Rc<dyn ConsoleIO>,
) -> Result<Option<Value>, Error> {
    let (src, program) = parse_file(path)?;

    tracing::debug!(path = %path.display(), statements = program.statements.len(), "parsed program");

    let config = InterpreterConfig {
        max_call_depth,
        current_file: Some(PathBuf::from(path)),
    };

    let mut interpreter = Interpreter::with_console(config, console);

    interpreter.interpret(&program)
        .map_err(|error| locate(path, &src, error))
}

/// Process exit code for a finished program: the integer `haupt` returned,
/// otherwise 0.
pub fn exit_code(result: Option<&Value>) -> i32 {
    match result {
        Some(Value::Integer(code)) => i32::try_from(*code).unwrap_or(i32::MAX),
        _ => 0,
    }
}
