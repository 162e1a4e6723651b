use std::{path::PathBuf, rc::Rc};

use crate::{
    interpreter::prelude::{Interpreter, InterpreterConfig},
    parser::prelude::parse_module,
    utils::prelude::{ConsoleIO, Error, NullConsoleIO, VectorConsoleIO},
};

fn runtime_error(src: &str) -> Error {
    let program = parse_module(src).expect("valid program");
    let mut interpreter = Interpreter::with_console(InterpreterConfig::default(), Rc::new(NullConsoleIO));

    let error = interpreter.interpret(&program).expect_err("program fails");

    Error::from_exec(PathBuf::from("test.gerl"), src.to_string(), error)
}

fn syntax_error(src: &str) -> Error {
    let error = parse_module(src).expect_err("program is invalid");

    Error::Syntax { path: PathBuf::from("test.gerl"), src: src.to_string(), error }
}

#[test]
fn test_runtime_error_record() {
    let src = "GANZ f(n: GANZ) {\n    ZURÜCK n + x;\n}\nf(1);\n";
    let error = runtime_error(src);
    let diagnostics = error.to_diagnostics();

    assert_eq!(diagnostics.len(), 1);

    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, "GL003");
    assert_eq!(diagnostic.title, "Undefinierte Variable");
    assert_eq!(diagnostic.message, "Variable 'x' nicht definiert");
    assert_eq!(diagnostic.file(), Some(PathBuf::from("test.gerl").as_path()));
    assert_eq!((diagnostic.line(), diagnostic.column()), (Some(2), Some(16)));
    assert!(diagnostic.hint.is_some());
    assert_eq!(diagnostic.stack_trace, vec!["bei f (<eingabe>:4:2)".to_string()]);
}

#[test]
fn test_pretty_runtime_error() {
    let rendered = runtime_error("GANZ x = 10 / 0;").pretty_string();

    assert!(rendered.contains("error[GL006]: Division durch Null"));
    assert!(rendered.contains("test.gerl:1:13"));
    assert!(rendered.contains("Tipp:"));
}

#[test]
fn test_parse_errors_each_get_a_record() {
    let error = syntax_error("GANZ = 1;\nDRUCKE(1)\nGANZ y = 2;");
    let diagnostics = error.to_diagnostics();

    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|diagnostic| diagnostic.code == "GL001"));
    assert_eq!(diagnostics[0].line(), Some(1));
    assert_eq!(diagnostics[1].line(), Some(3));
    assert_eq!(
        diagnostics[1].hint.as_deref().map(|hint| hint.lines().next()),
        Some(Some("Fehlt ein Semikolon am Ende der vorherigen Anweisung?"))
    );

    let rendered = error.pretty_string();
    assert!(rendered.contains("Syntaxfehler"));
}

#[test]
fn test_lexical_error_at_end_of_input() {
    let error = syntax_error("WORT s = \"offen");
    let diagnostics = error.to_diagnostics();

    assert_eq!(diagnostics[0].code, "GL101");
    assert!(error.pretty_string().contains("Unbeendeter String"));
}

#[test]
fn test_io_error_has_no_location() {
    let error = Error::StdIo {
        path: PathBuf::from("fehlt.gerl"),
        err: std::io::ErrorKind::NotFound,
    };

    let diagnostics = error.to_diagnostics();
    assert!(diagnostics[0].file().is_none());
    assert!(error.pretty_string().starts_with("Fehler[GL000]: Ein-/Ausgabefehler"));
}

#[test]
fn test_vector_console() {
    let console = VectorConsoleIO::with_input(["eins", "zwei"]);

    console.write_text("a");
    console.write_line("b");
    console.write_line("c");

    assert_eq!(console.lines(), vec!["ab", "c"]);
    assert_eq!(console.read_line().as_deref(), Some("eins"));
    assert_eq!(console.read_line().as_deref(), Some("zwei"));
    assert_eq!(console.read_line(), None);
    assert_eq!(console.take(), "ab\nc\n");
    assert!(console.lines().is_empty());
}
