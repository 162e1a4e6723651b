use std::rc::Rc;

use crate::lexer::prelude::{LexResult, TokenKind};
use super::ast::{
    Assignment, Block, Export, ExportList, Expression, ExpressionStatement, ForStatement,
    FunctionDeclaration, Identifier, IfStatement, Import, Parameter, PrintStatement, Program,
    ReturnStatement, Set, Statement, ThrowStatement, TryCatch, VariableDeclaration,
    WhileStatement,
};
use super::error::{ParseError, ParseErrorType};
use super::parser::{parse_error, Parse, Parser, Precedence};

impl<T: Iterator<Item = LexResult>> Parse<T> for Program {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut statements = vec![];

        while !parser.is_at_end() {
            match Statement::parse(parser, None) {
                Ok(statement) => statements.push(statement),
                Err(error) => {
                    parser.errors.push(error);
                    parser.synchronize();
                }
            }
        }

        Ok(Self { statements })
    }
}

// declaration -> <export> | <import> | <function_declaration> | <variable_declaration> | <statement>
impl<T: Iterator<Item = LexResult>> Parse<T> for Statement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let statement = match &parser.current_token.kind {
            TokenKind::Export => match parser.next_token.kind {
                TokenKind::Ident(_) => Self::ExportList(ExportList::parse(parser, None)?),
                _ => Self::Export(Export::parse(parser, None)?),
            },
            TokenKind::Import => Self::Import(Import::parse(parser, None)?),
            kind if kind.is_type() => parse_typed_declaration(parser)?,
            TokenKind::If => Self::If(IfStatement::parse(parser, None)?),
            TokenKind::While => Self::While(WhileStatement::parse(parser, None)?),
            TokenKind::For => Self::For(ForStatement::parse(parser, None)?),
            TokenKind::Return => Self::Return(ReturnStatement::parse(parser, None)?),
            TokenKind::LBrace => Self::Block(Block::parse(parser, None)?),
            TokenKind::Print => Self::Print(PrintStatement::parse(parser, None)?),
            TokenKind::Throw => Self::Throw(ThrowStatement::parse(parser, None)?),
            TokenKind::Try => Self::TryCatch(TryCatch::parse(parser, None)?),
            _ => {
                let statement = parse_simple_statement(parser)?;
                parser.expect_one(TokenKind::Semicolon)?;
                statement
            }
        };

        Ok(statement)
    }
}

fn parse_typed_declaration<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<Statement, ParseError> {
    if parser.at_function_declaration() {
        Ok(Statement::Function(Rc::new(FunctionDeclaration::parse(parser, None)?)))
    } else {
        Ok(Statement::Variable(VariableDeclaration::parse(parser, None)?))
    }
}

/// Expression statement or assignment, without the trailing `;`.
/// `name = value` becomes an [`Assignment`], any other `target = value` a [`Set`].
fn parse_simple_statement<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<Statement, ParseError> {
    let expression = Expression::parse(parser, None)?;

    let assign = match parser.eat(&TokenKind::Assign) {
        Some(assign) => assign,
        None => return Ok(Statement::Expression(ExpressionStatement {
            position: expression.position(),
            expression,
        })),
    };

    let value = Expression::parse(parser, None)?;

    Ok(match expression {
        Expression::Identifier(name) => Statement::Assignment(Assignment {
            position: name.position,
            name,
            value,
        }),
        target => Statement::Expression(ExpressionStatement {
            position: target.position(),
            expression: Expression::Set(Set {
                target: Box::new(target),
                value: Box::new(value),
                position: assign.position,
            }),
        }),
    })
}

impl<T: Iterator<Item = LexResult>> Parse<T> for VariableDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.current_token.position;
        let type_name = parser.expect_type()?;
        let name = parser.expect_ident()?;

        let initializer = match parser.eat(&TokenKind::Assign) {
            Some(_) => Some(Expression::parse(parser, None)?),
            None => None,
        };

        parser.expect_one(TokenKind::Semicolon)?;

        Ok(Self { type_name, name, initializer, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Parameter {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        if parser.current_token.kind.is_type() {
            let type_name = parser.expect_type()?;
            let name = parser.expect_ident()?;

            return Ok(Self { type_name, name });
        }

        let name = parser.expect_ident()?;
        parser.expect_one(TokenKind::Colon)?;
        let type_name = parser.expect_type()?;

        Ok(Self { type_name, name })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for FunctionDeclaration {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.current_token.position;
        let return_type = parser.expect_type()?;
        let name = parser.expect_ident()?;

        parser.expect_one(TokenKind::LParen)?;

        let mut parameters = vec![];

        if !parser.check(&TokenKind::RParen) {
            loop {
                parameters.push(Parameter::parse(parser, None)?);

                if parser.eat(&TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        parser.expect_one(TokenKind::RParen)?;

        let body = Block::parse(parser, None)?;

        Ok(Self { return_type, name, parameters, body, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Block {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::LBrace)?.position;
        let mut statements = vec![];

        while !parser.check(&TokenKind::RBrace) && !parser.is_at_end() {
            statements.push(Statement::parse(parser, None)?);
        }

        parser.expect_one(TokenKind::RBrace)?;

        Ok(Self { statements, position })
    }
}

fn parse_condition<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<Expression, ParseError> {
    parser.expect_one(TokenKind::LParen)?;
    let condition = Expression::parse(parser, None)?;
    parser.expect_one(TokenKind::RParen)?;

    Ok(condition)
}

impl<T: Iterator<Item = LexResult>> Parse<T> for IfStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::If)?.position;
        let condition = parse_condition(parser)?;
        let then_branch = Box::new(Statement::parse(parser, None)?);

        let else_branch = match parser.eat(&TokenKind::Else) {
            Some(_) => Some(Box::new(Statement::parse(parser, None)?)),
            None => None,
        };

        Ok(Self { condition, then_branch, else_branch, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for WhileStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::While)?.position;
        let condition = parse_condition(parser)?;
        let body = Box::new(Statement::parse(parser, None)?);

        Ok(Self { condition, body, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ForStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::For)?.position;
        parser.expect_one(TokenKind::LParen)?;

        let initializer = if parser.eat(&TokenKind::Semicolon).is_some() {
            None
        } else if parser.current_token.kind.is_type() {
            Some(Box::new(Statement::Variable(VariableDeclaration::parse(parser, None)?)))
        } else {
            let initializer = parse_simple_statement(parser)?;
            parser.expect_one(TokenKind::Semicolon)?;
            Some(Box::new(initializer))
        };

        let condition = match parser.check(&TokenKind::Semicolon) {
            true => None,
            false => Some(Expression::parse(parser, None)?),
        };
        parser.expect_one(TokenKind::Semicolon)?;

        let update = match parser.check(&TokenKind::RParen) {
            true => None,
            false => Some(Box::new(parse_simple_statement(parser)?)),
        };
        parser.expect_one(TokenKind::RParen)?;

        let body = Box::new(Statement::parse(parser, None)?);

        Ok(Self { initializer, condition, update, body, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ReturnStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Return)?.position;

        let value = match parser.check(&TokenKind::Semicolon) {
            true => None,
            false => Some(Expression::parse(parser, None)?),
        };
        parser.expect_one(TokenKind::Semicolon)?;

        Ok(Self { value, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for PrintStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Print)?.position;
        let expression = parse_condition(parser)?;
        parser.expect_one(TokenKind::Semicolon)?;

        Ok(Self { expression, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ThrowStatement {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Throw)?.position;
        let expression = parse_condition(parser)?;
        parser.expect_one(TokenKind::Semicolon)?;

        Ok(Self { expression, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for TryCatch {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Try)?.position;
        parser.expect_one(TokenKind::LParen)?;
        parser.expect_one(TokenKind::RParen)?;

        let body = Box::new(Statement::parse(parser, None)?);

        if parser.eat(&TokenKind::Catch).is_none() {
            return parse_error(ParseErrorType::ExpectedCatch, parser.current_token.clone());
        }

        let catch_name = match parser.current_token.kind {
            TokenKind::Ident(_) => Some(parser.expect_ident()?),
            _ => None,
        };

        let handler = Block::parse(parser, None)?;

        Ok(Self { body, catch_name, handler, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Export {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Export)?.position;

        if !parser.current_token.kind.is_type() {
            return parse_error(ParseErrorType::ExpectedExportable, parser.current_token.clone());
        }

        let declaration = Box::new(parse_typed_declaration(parser)?);

        Ok(Self { declaration, position })
    }
}

fn parse_name_list<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<Vec<Identifier>, ParseError> {
    let mut names = vec![parser.expect_ident()?];

    while parser.eat(&TokenKind::Comma).is_some() {
        names.push(parser.expect_ident()?);
    }

    Ok(names)
}

impl<T: Iterator<Item = LexResult>> Parse<T> for ExportList {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Export)?.position;
        let names = parse_name_list(parser)?;
        parser.expect_terminator()?;

        Ok(Self { names, position })
    }
}

impl<T: Iterator<Item = LexResult>> Parse<T> for Import {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::Import)?.position;
        let names = parse_name_list(parser)?;

        parser.expect_one(TokenKind::From)?;

        let module = match &parser.current_token.kind {
            TokenKind::Str(module) => module.clone(),
            _ => return parse_error(ParseErrorType::ExpectedModulePath, parser.current_token.clone()),
        };
        parser.step();
        parser.expect_terminator()?;

        Ok(Self { names, module, position })
    }
}
