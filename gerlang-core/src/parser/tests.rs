use crate::{
    lexer::prelude::tokenize,
    parser::prelude::{
        parse_module, parse_tokens, BinaryOperator, Expression, LiteralValue, ParseErrorType,
        Statement, SyntaxError, TypeName,
    },
};

fn single_expression(input: &str) -> Expression {
    let program = parse_module(input).expect("valid program");

    match program.statements.into_iter().next() {
        Some(Statement::Expression(statement)) => statement.expression,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn parse_errors(input: &str) -> Vec<ParseErrorType> {
    match parse_module(input) {
        Err(SyntaxError::Parse(errors)) => errors.into_iter().map(|e| e.error).collect(),
        other => panic!("expected parse errors, got {other:?}"),
    }
}

#[test]
fn test_declarations() -> Result<(), SyntaxError> {
    let input = r#"
        GANZ a = 5;
        KOMMA b;
        WORT c = 'hallo';
        KISTE d = [1, 2, 3];
        NIX e;
    "#;

    let program = parse_module(input)?;

    let types = program.statements.iter()
        .map(|statement| match statement {
            Statement::Variable(declaration) => declaration.type_name,
            other => panic!("unexpected statement {other}"),
        })
        .collect::<Vec<_>>();

    assert_eq!(types, vec![TypeName::Int, TypeName::Float, TypeName::String, TypeName::Array, TypeName::Void]);

    Ok(())
}

#[test]
fn test_function_declaration() -> Result<(), SyntaxError> {
    let input = r#"
        GANZ addiere(a: GANZ, KOMMA b) {
            ZURÜCK a + b;
        }
    "#;

    let program = parse_module(input)?;

    let function = match &program.statements[0] {
        Statement::Function(function) => function.clone(),
        other => panic!("expected function, got {other}"),
    };

    assert_eq!(function.name.name, "addiere");
    assert_eq!(function.return_type, TypeName::Int);
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(function.parameters[0].type_name, TypeName::Int);
    assert_eq!(function.parameters[1].type_name, TypeName::Float);
    assert_eq!(function.parameters[1].name.name, "b");
    assert_eq!((function.position.line, function.position.column), (2, 9));

    Ok(())
}

#[test]
fn test_precedence() {
    let expression = single_expression("1 + 2 * 3 - 4 / 2;");
    assert_eq!(expression.to_string(), "((1 + (2 * 3)) - (4 / 2))");

    let expression = single_expression("a ODER b UND NICHT c IST d;");
    assert_eq!(expression.to_string(), "(a || (b && ((!c) == d)))");

    let expression = single_expression("-x.LÄNGE < 3 != JA;");
    assert_eq!(expression.to_string(), "(((-x.LÄNGE) < 3) != JA)");

    let expression = single_expression("(1 + 2) * 3;");
    assert_eq!(expression.to_string(), "((1 + 2) * 3)");
}

#[test]
fn test_postfix_chains() {
    let expression = single_expression("liste[0].HINZUFÜGEN(f(1)(2), [x]);");

    match expression {
        Expression::MethodCall(call) => {
            assert_eq!(call.method, "HINZUFÜGEN");
            assert_eq!(call.arguments.len(), 2);
            assert!(matches!(*call.object, Expression::Index(_)));
            assert!(matches!(&call.arguments[0], Expression::Call(inner) if matches!(*inner.callee, Expression::Call(_))));
        },
        other => panic!("expected method call, got {other}"),
    }
}

#[test]
fn test_node_positions() {
    let expression = single_expression("a\n  + f(b);");

    match expression {
        Expression::Binary(binary) => {
            assert_eq!(binary.operator, BinaryOperator::Add);
            assert_eq!((binary.position.line, binary.position.column), (2, 3));

            match *binary.right {
                Expression::Call(call) => assert_eq!((call.position.line, call.position.column), (2, 6)),
                other => panic!("expected call, got {other}"),
            }
        },
        other => panic!("expected binary, got {other}"),
    }
}

#[test]
fn test_assignment_forms() -> Result<(), SyntaxError> {
    let program = parse_module("x = 1; liste[2] WIRD x + 1;")?;

    match &program.statements[0] {
        Statement::Assignment(assignment) => assert_eq!(assignment.name.name, "x"),
        other => panic!("expected assignment, got {other}"),
    }

    match &program.statements[1] {
        Statement::Expression(statement) => match &statement.expression {
            Expression::Set(set) => {
                assert!(matches!(*set.target, Expression::Index(_)));
                assert_eq!(set.position.column, 17);
            },
            other => panic!("expected set, got {other}"),
        },
        other => panic!("expected expression statement, got {other}"),
    }

    Ok(())
}

#[test]
fn test_control_flow() -> Result<(), SyntaxError> {
    let input = r#"
        WENN (a > 1) DRUCKE(a); SONST { DRUCKE(0); }
        SOLANGE (a < 10) a = a + 1;
        FÜR (GANZ i = 0; i < 3; i = i + 1) { DRUCKE(i); }
        FÜR (;;) {}
        VERSUCHE() { MECKER('kaputt'); } FANGE fehler { DRUCKE(fehler); }
        VERSUCHE() x = 1; FANGE {}
    "#;

    let program = parse_module(input)?;

    assert!(matches!(&program.statements[0], Statement::If(statement) if statement.else_branch.is_some()));
    assert!(matches!(&program.statements[1], Statement::While(_)));

    match &program.statements[2] {
        Statement::For(statement) => {
            assert!(matches!(statement.initializer.as_deref(), Some(Statement::Variable(_))));
            assert!(statement.condition.is_some());
            assert!(matches!(statement.update.as_deref(), Some(Statement::Assignment(_))));
        },
        other => panic!("expected for, got {other}"),
    }

    match &program.statements[3] {
        Statement::For(statement) => {
            assert!(statement.initializer.is_none());
            assert!(statement.condition.is_none());
            assert!(statement.update.is_none());
        },
        other => panic!("expected for, got {other}"),
    }

    match &program.statements[4] {
        Statement::TryCatch(statement) => {
            assert_eq!(statement.catch_name.as_ref().map(|n| n.name.as_str()), Some("fehler"));
        },
        other => panic!("expected try, got {other}"),
    }

    assert!(matches!(&program.statements[5], Statement::TryCatch(statement) if statement.catch_name.is_none()));

    Ok(())
}

#[test]
fn test_imports_and_exports() -> Result<(), SyntaxError> {
    let input = r#"
        HOLE addiere, PI VON "mathe.gerl";
        GIBFREI GANZ verdopple(x: GANZ) { ZURÜCK x * 2; }
        GIBFREI KOMMA E = 2.71;
        GIBFREI verdopple, E
    "#;

    let program = parse_module(input)?;

    match &program.statements[0] {
        Statement::Import(import) => {
            assert_eq!(import.module, "mathe.gerl");
            assert_eq!(import.names.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), vec!["addiere", "PI"]);
        },
        other => panic!("expected import, got {other}"),
    }

    assert!(matches!(&program.statements[1], Statement::Export(export) if export.name() == Some("verdopple")));
    assert!(matches!(&program.statements[2], Statement::Export(export) if export.name() == Some("E")));
    assert!(matches!(&program.statements[3], Statement::ExportList(list) if list.names.len() == 2));

    Ok(())
}

#[test]
fn test_literals() {
    let expression = single_expression("[JA, NEIN, VIELLEICHT, 1.5, 'x'];");

    match expression {
        Expression::Array(array) => {
            let values = array.elements.iter()
                .map(|element| match element {
                    Expression::Literal(literal) => literal.value.clone(),
                    other => panic!("expected literal, got {other}"),
                })
                .collect::<Vec<_>>();

            assert_eq!(values, vec![
                LiteralValue::Boolean(true),
                LiteralValue::Boolean(false),
                LiteralValue::Null,
                LiteralValue::Float(1.5),
                LiteralValue::String("x".into()),
            ]);
        },
        other => panic!("expected array, got {other}"),
    }
}

#[test]
fn test_template_strings() {
    let expression = single_expression("\"Hallo ${name}, du bist ${alter + 1} Jahre alt\";");

    match expression {
        Expression::Template(template) => {
            assert_eq!(template.parts, vec!["Hallo ", ", du bist ", " Jahre alt"]);
            assert_eq!(template.expressions.len(), 2);
            assert_eq!(template.expressions[1].to_string(), "(alter + 1)");
            assert_eq!(template.expressions[0].position().column, 10);
        },
        other => panic!("expected template, got {other}"),
    }
}

#[test]
fn test_invalid_templates() {
    for input in ["'${}';", "'${ a';", "'${a ${b}}';"] {
        let errors = parse_errors(input);
        assert!(
            matches!(errors[0], ParseErrorType::InvalidTemplate { .. }),
            "{input}: {errors:?}"
        );
    }

    let errors = parse_errors("'${a b}';");
    assert!(matches!(errors[0], ParseErrorType::UnexpectedToken { .. }));
}

#[test]
fn test_error_recovery_collects_all_errors() {
    let input = r#"
        GANZ a = ;
        DRUCKE(a)
        GANZ b = 2;
        WENN (b > ) { }
    "#;

    let errors = parse_errors(input);

    assert_eq!(errors.len(), 3, "{errors:?}");
    assert_eq!(errors[0], ParseErrorType::ExpectedExpression);
}

#[test]
fn test_missing_semicolon_position() {
    let err = match parse_module("GANZ a = 1\nGANZ b = 2;") {
        Err(SyntaxError::Parse(errors)) => errors[0].clone(),
        other => panic!("expected parse error, got {other:?}"),
    };

    assert!(matches!(err.error, ParseErrorType::UnexpectedToken { .. }));
    assert_eq!((err.token.position.line, err.token.position.column), (2, 1));
    assert!(err.hint().is_some());
}

#[test]
fn test_lexical_error_is_reported() {
    assert!(matches!(parse_module("GANZ a = 'offen;"), Err(SyntaxError::Lex(_))));
}

#[test]
fn test_parse_tokens_matches_parse_module() -> Result<(), SyntaxError> {
    let input = "GANZ haupt() { DRUCKE(1 + 2); ZURÜCK 0; }";

    let tokens = tokenize(input)?;

    assert_eq!(parse_tokens(tokens)?, parse_module(input)?);

    Ok(())
}

#[test]
fn test_display_round_trip() -> Result<(), SyntaxError> {
    let input = "GANZ f(x: GANZ) { WENN (x > 0) { ZURÜCK x; } SONST ZURÜCK -x; }";

    let program = parse_module(input)?;
    let reparsed = parse_module(&program.to_string())?;

    assert_eq!(program.to_string(), reparsed.to_string());

    Ok(())
}
