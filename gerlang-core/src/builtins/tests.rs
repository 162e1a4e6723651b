use std::rc::Rc;

use crate::{
    builtins::{catalog, conversion, io, math},
    environment::prelude::{NativeError, Value},
    interpreter::prelude::{Interpreter, InterpreterConfig},
    parser::prelude::parse_module,
    utils::prelude::{NullConsoleIO, VectorConsoleIO},
};

#[test]
fn test_catalog_names_are_unique() {
    let natives = catalog();
    let mut names = natives.iter().map(|native| native.name.as_str()).collect::<Vec<_>>();
    let count = names.len();

    names.sort();
    names.dedup();

    assert_eq!(names.len(), count);
    assert!(names.contains(&"ZUFALLSBEREICH"));
}

#[test]
fn test_print_joins_arguments() -> Result<(), NativeError> {
    let console = VectorConsoleIO::new();

    io::print(&console, &[Value::from("a"), Value::Integer(1), Value::Null])?;
    io::print(&console, &[Value::array(vec![Value::from("x"), Value::Boolean(false)])])?;
    io::print(&console, &[])?;

    assert_eq!(console.take(), "a 1 NIX\n[\"x\", NEIN]\n\n");

    Ok(())
}

#[test]
fn test_read_line() -> Result<(), NativeError> {
    let console = VectorConsoleIO::with_input(["Ada"]);

    assert_eq!(io::read(&console, &[Value::from("Name? ")])?, Value::from("Ada"));
    assert_eq!(io::read(&console, &[])?, Value::from(""));
    assert_eq!(console.take(), "Name? ");

    Ok(())
}

#[test]
fn test_to_integer() -> Result<(), NativeError> {
    let convert = |value: Value| conversion::to_integer(&NullConsoleIO, &[value]);

    assert_eq!(convert(Value::Integer(7))?, Value::Integer(7));
    assert_eq!(convert(Value::Float(-3.9))?, Value::Integer(-3));
    assert_eq!(convert(Value::from(" 42 "))?, Value::Integer(42));
    assert_eq!(convert(Value::from("2.75"))?, Value::Integer(2));
    assert_eq!(convert(Value::Boolean(true))?, Value::Integer(1));
    assert_eq!(convert(Value::Null)?, Value::Integer(0));

    assert_eq!(
        convert(Value::from("zwölf")),
        Err(NativeError::Conversion { value: "zwölf".into(), target: "GANZ" })
    );
    assert!(convert(Value::Float(f64::NAN)).is_err());
    assert!(convert(Value::array(vec![])).is_err());

    Ok(())
}

#[test]
fn test_to_float_and_string() -> Result<(), NativeError> {
    let console = NullConsoleIO;

    assert_eq!(conversion::to_float(&console, &[Value::Integer(2)])?, Value::Float(2.0));
    assert_eq!(conversion::to_float(&console, &[Value::from("1.5")])?, Value::Float(1.5));
    assert_eq!(conversion::to_float(&console, &[Value::Boolean(false)])?, Value::Float(0.0));
    assert!(conversion::to_float(&console, &[Value::from("abc")]).is_err());

    let nested = Value::array(vec![Value::from("a"), Value::Float(1.0), Value::Null]);
    assert_eq!(conversion::to_string(&console, &[nested])?, Value::from("[a, 1.0, NIX]"));
    assert_eq!(conversion::to_string(&console, &[Value::Boolean(true)])?, Value::from("JA"));

    Ok(())
}

#[test]
fn test_math() -> Result<(), NativeError> {
    let console = NullConsoleIO;

    assert_eq!(math::sqrt(&console, &[Value::Integer(9)])?, Value::Float(3.0));
    assert!(matches!(math::sqrt(&console, &[Value::Integer(-1)]), Err(NativeError::Domain { .. })));
    assert_eq!(math::pow(&console, &[Value::Integer(2), Value::Integer(10)])?, Value::Float(1024.0));
    assert_eq!(math::abs(&console, &[Value::Float(-2.5)])?, Value::Float(2.5));
    assert_eq!(
        math::abs(&console, &[Value::array(vec![])]),
        Err(NativeError::ArgumentType { position: 1, expected: "Zahl", got: "KISTE" })
    );

    Ok(())
}

#[test]
fn test_round_half_away_from_zero() -> Result<(), NativeError> {
    let console = NullConsoleIO;

    assert_eq!(math::round(&console, &[Value::Float(2.5)])?, Value::Float(3.0));
    assert_eq!(math::round(&console, &[Value::Float(-2.5)])?, Value::Float(-3.0));
    assert_eq!(math::round(&console, &[Value::Float(1.2345), Value::Integer(2)])?, Value::Float(1.23));
    assert_eq!(math::round(&console, &[Value::Integer(1234), Value::Integer(-2)])?, Value::Float(1200.0));

    Ok(())
}

#[test]
fn test_random() -> Result<(), NativeError> {
    let console = NullConsoleIO;

    for _ in 0..100 {
        match math::random(&console, &[])? {
            Value::Float(number) => assert!((0.0..1.0).contains(&number)),
            other => panic!("expected KOMMA, got {other}"),
        }

        match math::random_range(&console, &[Value::Integer(-2), Value::Integer(2)])? {
            Value::Integer(number) => assert!((-2..=2).contains(&number)),
            other => panic!("expected GANZ, got {other}"),
        }
    }

    assert_eq!(math::random_range(&console, &[Value::Integer(5), Value::Integer(5)])?, Value::Integer(5));
    assert!(math::random_range(&console, &[Value::Integer(3), Value::Integer(1)]).is_err());

    Ok(())
}

#[test]
fn test_builtins_from_programs() {
    let console = VectorConsoleIO::with_input(["21"]);
    let mut interpreter = Interpreter::with_console(InterpreterConfig::default(), Rc::new(console.clone()));

    let program = parse_module(r#"
        GANZ x = ZU_GANZ(LESE('Zahl: '));
        ZEIGE('Doppelt:', x * 2, WURZEL(16));
        DRUCKE(RUNDEN(2.345, 1));
    "#).expect("valid program");

    interpreter.interpret(&program).expect("program runs");

    assert_eq!(console.take(), "Zahl: Doppelt: 42 4.0\n2.3\n");
}
