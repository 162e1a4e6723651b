use std::{error::Error, fs, path::Path, rc::Rc};

use crate::{
    environment::prelude::Value,
    interpreter::prelude::{
        ExecError, ExecResult, Interpreter, InterpreterConfig, RuntimeErrorKind, DEFAULT_MAX_CALL_DEPTH,
    },
    parser::prelude::{parse_module, TypeName},
    utils::prelude::VectorConsoleIO,
};

fn interpreter(config: InterpreterConfig) -> (Interpreter, VectorConsoleIO) {
    let console = VectorConsoleIO::new();
    let interpreter = Interpreter::with_console(config, Rc::new(console.clone()));

    (interpreter, console)
}

fn run_with(config: InterpreterConfig, src: &str) -> (ExecResult<Option<Value>>, Vec<String>) {
    let (mut interpreter, console) = interpreter(config);
    let program = parse_module(src).expect("valid program");
    let result = interpreter.interpret(&program);

    (result, console.lines())
}

fn run(src: &str) -> (ExecResult<Option<Value>>, Vec<String>) {
    run_with(InterpreterConfig::default(), src)
}

fn output(src: &str) -> Vec<String> {
    let (result, lines) = run(src);

    if let Err(error) = result {
        panic!("program failed: {error}");
    }

    lines
}

fn runtime_kind(result: ExecResult<Option<Value>>) -> RuntimeErrorKind {
    match result {
        Err(ExecError::Runtime(error)) => error.kind,
        other => panic!("expected runtime error, got {other:?}"),
    }
}

fn in_file(dir: &Path, name: &str) -> InterpreterConfig {
    InterpreterConfig {
        current_file: Some(dir.join(name)),
        ..InterpreterConfig::default()
    }
}

#[test]
fn test_arithmetic_precedence() {
    let lines = output(r#"
        DRUCKE(2 + 3 * 4);
        DRUCKE((2 + 3) * 4);
        DRUCKE(7 / 2);
        DRUCKE(4 / 2);
        DRUCKE(-7 % 3);
        DRUCKE(7 % -3);
        DRUCKE(1 + 0.5);
    "#);

    assert_eq!(lines, vec!["14", "20", "3.5", "2.0", "2", "-2", "1.5"]);
}

#[test]
fn test_short_circuit() {
    let lines = output(r#"
        GANZ zähler = 0;

        JAIN merke() {
            zähler = zähler + 1;
            ZURÜCK JA;
        }

        NEIN && merke();
        JA || merke();
        DRUCKE(zähler);
        DRUCKE(JA UND merke());
        DRUCKE(zähler);
    "#);

    assert_eq!(lines, vec!["0", "JA", "1"]);
}

#[test]
fn test_division_by_zero_position() -> Result<(), Box<dyn Error>> {
    let (result, _) = run("GANZ x = 1 / 0;");

    let error = match result {
        Err(ExecError::Runtime(error)) => error,
        other => panic!("expected runtime error, got {other:?}"),
    };

    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
    assert_eq!(error.kind.code(), "GL006");
    assert_eq!((error.position.line, error.position.column), (1, 12));

    let (result, _) = run("GANZ y = 5 % 0;");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::DivisionByZero);

    Ok(())
}

#[test]
fn test_block_scoping() {
    let (result, lines) = run(r#"
        GANZ a = 1;
        {
            GANZ b = 2;
            a = 3;
        }
        DRUCKE(a);
        DRUCKE(b);
    "#);

    assert_eq!(lines, vec!["3"]);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedVariable { name: "b".into() });
}

#[test]
fn test_for_loop_shares_one_scope() {
    let (result, lines) = run(r#"
        GANZ summe = 0;
        FÜR (GANZ i = 0; i < 4; i = i + 1) {
            summe = summe + i;
        }
        DRUCKE(summe);
        DRUCKE(i);
    "#);

    assert_eq!(lines, vec!["6"]);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedVariable { name: "i".into() });
}

#[test]
fn test_while_and_if() {
    let lines = output(r#"
        GANZ n = 3;
        SOLANGE (n > 0) {
            WENN (n % 2 == 0) DRUCKE('gerade'); SONST DRUCKE('ungerade');
            n = n - 1;
        }
        DRUCKE(n IST 0);
    "#);

    assert_eq!(lines, vec!["ungerade", "gerade", "ungerade", "JA"]);
}

#[test]
fn test_array_methods() {
    let lines = output(r#"
        KISTE k = [1, 2];
        k.HINZUFÜGEN(0);
        k.ERWEITERN(3);
        DRUCKE(k);
        DRUCKE(k.LÄNGE);
        k[1] = 9;
        DRUCKE(k[1]);
        DRUCKE('straße'.LÄNGE);
    "#);

    assert_eq!(lines, vec!["[0, 1, 2, 3]", "4", "9", "6"]);
}

#[test]
fn test_arrays_are_shared() {
    let lines = output(r#"
        KISTE a = [1];
        KISTE b = a;
        b.ERWEITERN(2);
        DRUCKE(a);
        DRUCKE(a + [3]);
        DRUCKE(a);
    "#);

    assert_eq!(lines, vec!["[1, 2]", "[1, 2, 3]", "[1, 2]"]);
}

#[test]
fn test_array_containing_itself() {
    let lines = output(r#"
        KISTE a = [1];
        a.ERWEITERN(a);
        DRUCKE(a.LÄNGE);
        DRUCKE(a);
        DRUCKE("Inhalt: ${a}");
        DRUCKE(a + "!");

        KISTE b = [1];
        b.ERWEITERN(b);
        DRUCKE(a == b);
        DRUCKE(a == [1, [1]]);
    "#);

    assert_eq!(lines, vec!["2", "[1, [...]]", "Inhalt: [1, [...]]", "[1, [...]]!", "JA", "NEIN"]);
}

#[test]
fn test_index_errors() {
    let (result, _) = run("KISTE k = [1]; DRUCKE(k[1]);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::IndexOutOfBounds { index: 1, length: 1 });

    let (result, _) = run("KISTE k = [1]; DRUCKE(k[-1]);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::IndexOutOfBounds { index: -1, length: 1 });

    let (result, _) = run("KISTE k = [1]; k[1] = 2;");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::IndexOutOfBounds { index: 1, length: 1 });

    let (result, _) = run("KISTE k = [1]; DRUCKE(k[[0]]);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::IndexNotNumeric { got: "KISTE".into() });

    let (result, _) = run("GANZ x = 5; DRUCKE(x[0]);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::NotAnArray { got: "GANZ" });

    let lines = output("KISTE k = [4, 5]; DRUCKE(k['1']); DRUCKE(k[1.9]); DRUCKE(k[NEIN]);");
    assert_eq!(lines, vec!["5", "5", "4"]);
}

#[test]
fn test_unknown_property_and_method() {
    let (result, _) = run("KISTE k = []; DRUCKE(k.GRÖSSE);");
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::UnknownProperty { name: "GRÖSSE".into(), receiver: "KISTE" }
    );

    let (result, _) = run("GANZ x = 1; x.ERWEITERN(2);");
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::UnknownMethod { name: "ERWEITERN".into(), receiver: "GANZ" }
    );
}

#[test]
fn test_type_errors() {
    let (result, _) = run("JA - 1;");
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::TypeMismatch { operator: "-".into(), left: "JAIN", right: "GANZ" }
    );

    let (result, _) = run("GANZ x = 9223372036854775807 + 1;");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::IntegerOverflow { operator: "+".into() });

    let (result, _) = run("DRUCKE(-'a');");
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::UnaryTypeMismatch { operator: "-".into(), operand: "WORT" }
    );
}

#[test]
fn test_string_concatenation_and_comparison() {
    let lines = output(r#"
        DRUCKE('a' + 1 + JA);
        DRUCKE(1 + 2 + 'c');
        DRUCKE('apfel' < 'birne');
        DRUCKE(2 >= 2.0);
        DRUCKE(1 == 1.0);
        DRUCKE([1, 2] == [1, 2]);
    "#);

    assert_eq!(lines, vec!["a1JA", "3c", "JA", "JA", "JA", "JA"]);
}

#[test]
fn test_functions_and_recursion() {
    let lines = output(r#"
        GANZ fib(n: GANZ) {
            WENN (n < 2) ZURÜCK n;
            ZURÜCK fib(n - 1) + fib(n - 2);
        }

        NIX nichts() {}

        DRUCKE(fib(15));
        DRUCKE(nichts());
        DRUCKE(fib);
        DRUCKE(ZU_WORT);
    "#);

    assert_eq!(lines, vec!["610", "NIX", "<funktion fib>", "<eingebaut ZU_WORT>"]);
}

#[test]
fn test_functions_see_globals_not_callers() {
    let (result, lines) = run(r#"
        GANZ global = 1;

        GANZ lies() {
            ZURÜCK global + lokal;
        }

        GANZ rufe() {
            GANZ lokal = 2;
            ZURÜCK lies();
        }

        DRUCKE(global);
        rufe();
    "#);

    assert_eq!(lines, vec!["1"]);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedVariable { name: "lokal".into() });
}

#[test]
fn test_arity_mismatch_keeps_stack_balanced() -> Result<(), Box<dyn Error>> {
    let (mut interpreter, _) = interpreter(InterpreterConfig::default());

    let program = parse_module(r#"
        GANZ f(a: GANZ) { ZURÜCK a; }
        GANZ g(a: GANZ) { ZURÜCK f(a, a); }
        g(1);
    "#)?;

    let error = match interpreter.interpret(&program) {
        Err(ExecError::Runtime(error)) => error,
        other => panic!("expected runtime error, got {other:?}"),
    };

    assert_eq!(error.kind, RuntimeErrorKind::ArgumentCount {
        name: "f".into(),
        expected: "1".into(),
        given: 2,
    });
    assert_eq!(error.call_stack.len(), 1);
    assert_eq!(error.call_stack[0].function_name, "g");
    assert_eq!(interpreter.call_depth(), 0);

    let (result, _) = run("ZU_GANZ(1, 2);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::ArgumentCount {
        name: "ZU_GANZ".into(),
        expected: "1".into(),
        given: 2,
    });

    Ok(())
}

#[test]
fn test_stack_trace_is_innermost_first() -> Result<(), Box<dyn Error>> {
    let (mut interpreter, _) = interpreter(InterpreterConfig::default());

    let program = parse_module(r#"
        GANZ innen() { ZURÜCK 1 / 0; }
        GANZ außen() { ZURÜCK innen(); }
        GANZ haupt() { ZURÜCK außen(); }
    "#)?;

    let error = match interpreter.interpret(&program) {
        Err(ExecError::Runtime(error)) => error,
        other => panic!("expected runtime error, got {other:?}"),
    };

    let names = error.call_stack.iter()
        .map(|frame| frame.function_name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(names, vec!["innen", "außen", "haupt"]);
    assert_eq!(error.call_stack[0].line, 3);
    assert_eq!(interpreter.call_depth(), 0);

    Ok(())
}

#[test]
fn test_recursion_up_to_default_limit() {
    let program = r#"
        GANZ tiefe(n: GANZ) {
            WENN (n == 0) {
                ZURÜCK 0;
            }
            ZURÜCK 1 + tiefe(n - 1);
        }
    "#;

    let lines = output(&format!("{program}\nDRUCKE(tiefe(1990));"));
    assert_eq!(lines, vec!["1990"]);

    let (result, _) = run(&format!("{program}\nDRUCKE(tiefe(2500));"));
    match result {
        Err(ExecError::StackExhausted { limit, .. }) => assert_eq!(limit, DEFAULT_MAX_CALL_DEPTH),
        other => panic!("expected stack exhaustion, got {other:?}"),
    }
}

#[test]
fn test_stack_exhaustion_is_not_catchable() {
    let config = InterpreterConfig {
        max_call_depth: 64,
        ..InterpreterConfig::default()
    };

    let (result, lines) = run_with(config, r#"
        GANZ endlos(n: GANZ) { ZURÜCK endlos(n + 1); }

        VERSUCHE() {
            endlos(0);
        } FANGE {
            DRUCKE('gefangen');
        }
    "#);

    assert!(lines.is_empty());
    match result {
        Err(ExecError::StackExhausted { limit, call_stack, .. }) => {
            assert_eq!(limit, 64);
            assert_eq!(call_stack.len(), 64);
        },
        other => panic!("expected stack exhaustion, got {other:?}"),
    }
}

#[test]
fn test_try_catch() {
    let lines = output(r#"
        VERSUCHE() {
            MECKER('kaputt');
        } FANGE fehler {
            DRUCKE(fehler);
        }

        VERSUCHE() {
            GANZ x = 1 / 0;
        } FANGE e {
            DRUCKE(e);
        }

        VERSUCHE() MECKER([1, 'a']); FANGE {
            DRUCKE('ohne Namen');
        }

        DRUCKE('weiter');
    "#);

    assert_eq!(lines, vec!["kaputt", "Division durch Null", "ohne Namen", "weiter"]);
}

#[test]
fn test_catch_variable_is_scoped() {
    let (result, lines) = run(r#"
        VERSUCHE() { MECKER('x'); } FANGE fehler { DRUCKE(fehler); }
        DRUCKE(fehler);
    "#);

    assert_eq!(lines, vec!["x"]);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedVariable { name: "fehler".into() });
}

#[test]
fn test_return_passes_through_try() {
    let lines = output(r#"
        GANZ f() {
            VERSUCHE() {
                ZURÜCK 1;
            } FANGE {
                ZURÜCK 2;
            }
            ZURÜCK 3;
        }

        DRUCKE(f());
    "#);

    assert_eq!(lines, vec!["1"]);
}

#[test]
fn test_uncaught_raise() {
    let (result, _) = run("MECKER('Oh nein');");

    assert_eq!(runtime_kind(result), RuntimeErrorKind::Raised { message: "Oh nein".into() });
}

#[test]
fn test_templates() {
    let lines = output(r#"
        GANZ x = 41;
        DRUCKE("Wert: ${1+1}");
        DRUCKE("${JA} ${VIELLEICHT} ${[1, 'a']}");
        DRUCKE("x ist ${x + 1}!");
    "#);

    assert_eq!(lines, vec!["Wert: 2", "JA NIX [1, \"a\"]", "x ist 42!"]);
}

#[test]
fn test_entry_point() -> Result<(), Box<dyn Error>> {
    let (result, lines) = run(r#"
        DRUCKE('zuerst');

        GANZ haupt() {
            DRUCKE('haupt');
            ZURÜCK 0;
        }
    "#);

    assert_eq!(result?, Some(Value::Integer(0)));
    assert_eq!(lines, vec!["zuerst", "haupt"]);

    let (result, _) = run("DRUCKE(1);");
    assert_eq!(result?, None);

    Ok(())
}

#[test]
fn test_invalid_entry_point_rejected_before_execution() {
    let (result, lines) = run(r#"
        DRUCKE('nie');
        WORT haupt() { ZURÜCK 'x'; }
    "#);

    assert!(lines.is_empty());
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::InvalidEntryPoint { return_type: TypeName::String, parameters: 0 }
    );

    let (result, _) = run("GANZ haupt(a: GANZ) { ZURÜCK a; }");
    assert_eq!(
        runtime_kind(result),
        RuntimeErrorKind::InvalidEntryPoint { return_type: TypeName::Int, parameters: 1 }
    );
}

#[test]
fn test_top_level_return_skips_entry_point() -> Result<(), Box<dyn Error>> {
    let (result, lines) = run(r#"
        ZURÜCK 7;
        DRUCKE('nie');
        GANZ haupt() { DRUCKE('nie'); ZURÜCK 0; }
    "#);

    assert_eq!(result?, Some(Value::Integer(7)));
    assert!(lines.is_empty());

    Ok(())
}

#[test]
fn test_undefined_function() {
    let (result, _) = run("fehlt(1);");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedFunction { name: "fehlt".into() });

    let (result, _) = run("GANZ x = 1; x();");
    assert_eq!(runtime_kind(result), RuntimeErrorKind::NotCallable { got: "GANZ" });
}

#[test]
fn test_nested_function_registered_when_executed() {
    let lines = output(r#"
        GANZ außen() {
            GANZ innen() { ZURÜCK 5; }
            ZURÜCK innen();
        }

        DRUCKE(außen());
        DRUCKE(innen());
    "#);

    assert_eq!(lines, vec!["5", "5"]);
}

#[test]
fn test_evaluate_line_keeps_globals() -> Result<(), Box<dyn Error>> {
    let (mut interpreter, console) = interpreter(InterpreterConfig::default());

    assert_eq!(interpreter.evaluate_line(&parse_module("GANZ x = 2;")?)?, None);
    assert_eq!(interpreter.evaluate_line(&parse_module("x * 21;")?)?, Some(Value::Integer(42)));

    let program = parse_module("GANZ f() { ZURÜCK 1 / 0; } f();")?;
    assert!(interpreter.evaluate_line(&program).is_err());
    assert_eq!(interpreter.call_depth(), 0);

    let program = parse_module("GANZ haupt() { DRUCKE('nie'); ZURÜCK 0; } f;")?;
    assert!(matches!(interpreter.evaluate_line(&program)?, Some(Value::Function(_))));
    assert!(console.lines().is_empty());

    Ok(())
}

const MATHE: &str = r#"
GIBFREI GANZ verdopple(x: GANZ) { ZURÜCK x * 2; }
GIBFREI KOMMA E = 2.5;
GANZ geheim() { ZURÜCK 1; }
GANZ hilfe = 3;
GIBFREI hilfe;
"#;

#[test]
fn test_import_binds_exported_names() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("mathe.gerl"), MATHE)?;

    let (result, lines) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE verdopple, E, hilfe VON "mathe.gerl";
        DRUCKE(verdopple(4));
        DRUCKE(E);
        DRUCKE(hilfe);
    "#);

    result?;
    assert_eq!(lines, vec!["8", "2.5", "3"]);

    let (result, lines) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE verdopple VON "mathe";
        DRUCKE(verdopple(5));
    "#);

    result?;
    assert_eq!(lines, vec!["10"]);

    Ok(())
}

#[test]
fn test_imported_function_uses_its_module() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("zaehler.gerl"), r#"
        GANZ basis = 10;
        GANZ aufrufe = 0;
        GANZ hilfe(x: GANZ) { ZURÜCK ZU_GANZ(x) + basis; }
        GIBFREI GANZ oeffentlich(x: GANZ) {
            aufrufe = aufrufe + 1;
            ZURÜCK hilfe(x) * aufrufe;
        }
    "#)?;

    let (result, lines) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE oeffentlich VON "zaehler.gerl";
        GANZ basis = 1000;
        DRUCKE(oeffentlich(1));
        DRUCKE(oeffentlich(2));
    "#);

    result?;
    assert_eq!(lines, vec!["11", "24"]);

    let (result, _) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE oeffentlich VON "zaehler.gerl";
        hilfe(1);
    "#);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedFunction { name: "hilfe".into() });

    let (result, _) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE oeffentlich VON "zaehler.gerl";
        DRUCKE(aufrufe);
    "#);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::UndefinedVariable { name: "aufrufe".into() });

    Ok(())
}

#[test]
fn test_import_of_private_name_fails() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("mathe.gerl"), MATHE)?;

    let (result, _) = run_with(in_file(dir.path(), "main.gerl"), r#"HOLE geheim VON "mathe.gerl";"#);

    let error = match result {
        Err(ExecError::Runtime(error)) => error,
        other => panic!("expected runtime error, got {other:?}"),
    };

    assert_eq!(error.kind, RuntimeErrorKind::ExportNotFound {
        name: "geheim".into(),
        module: "mathe.gerl".into(),
    });
    assert_eq!((error.position.line, error.position.column), (1, 6));
    assert_eq!(error.file_path, Some(dir.path().join("main.gerl")));

    Ok(())
}

#[test]
fn test_import_module_errors() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("leer.gerl"), "GIBFREI nichts;")?;
    fs::write(dir.path().join("kaputt.gerl"), "GANZ = ;")?;

    let config = || in_file(dir.path(), "main.gerl");

    let (result, _) = run_with(config(), r#"HOLE x VON "fehlt.gerl";"#);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::ModuleNotFound { module: "fehlt.gerl".into() });

    let (result, _) = run_with(config(), r#"HOLE nichts VON "leer.gerl";"#);
    assert_eq!(runtime_kind(result), RuntimeErrorKind::InvalidExport {
        name: "nichts".into(),
        module: "leer.gerl".into(),
    });

    let (result, _) = run_with(config(), r#"HOLE x VON "kaputt.gerl";"#);
    assert!(matches!(runtime_kind(result), RuntimeErrorKind::ModuleSyntax { module, .. } if module == "kaputt.gerl"));

    Ok(())
}

#[test]
fn test_module_runs_its_own_imports() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("mathe.gerl"), MATHE)?;
    fs::write(dir.path().join("mehr.gerl"), r#"
        HOLE verdopple VON "mathe.gerl";
        GIBFREI GANZ vervierfache(x: GANZ) { ZURÜCK verdopple(verdopple(x)); }
    "#)?;

    let (result, lines) = run_with(in_file(dir.path(), "main.gerl"), r#"
        HOLE vervierfache VON "mehr.gerl";
        DRUCKE(vervierfache(2));
    "#);

    result?;
    assert_eq!(lines, vec!["8"]);

    Ok(())
}

#[test]
fn test_cyclic_import_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let a = r#"
        HOLE f VON "b.gerl";
        GIBFREI GANZ g() { ZURÜCK 1; }
    "#;
    fs::write(dir.path().join("a.gerl"), a)?;
    fs::write(dir.path().join("b.gerl"), r#"
        HOLE g VON "a.gerl";
        GIBFREI GANZ f() { ZURÜCK 2; }
    "#)?;

    let (result, _) = run_with(in_file(dir.path(), "a.gerl"), a);

    match runtime_kind(result) {
        RuntimeErrorKind::CyclicImport { chain } => {
            assert_eq!(chain.len(), 3);
            assert!(chain[0].ends_with("a.gerl"));
            assert!(chain[1].ends_with("b.gerl"));
            assert!(chain[2].ends_with("a.gerl"));
        },
        other => panic!("expected cyclic import, got {other:?}"),
    }

    Ok(())
}
