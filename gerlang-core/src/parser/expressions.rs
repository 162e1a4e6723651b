use crate::lexer::prelude::{LexResult, TokenKind};
use super::ast::{
    ArrayLiteral, Binary, BinaryOperator, Call, Expression, Identifier, Index, Literal,
    LiteralValue, MethodCall, Property, Unary, UnaryOperator,
};
use super::error::{ParseError, ParseErrorType};
use super::parser::{parse_error, InfixParse, Parse, Parser, Precedence};
use super::template::parse_template;

impl<T: Iterator<Item = LexResult>> Parse<T> for Expression {
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let mut expr = parse_prefix(parser)?;
        let precedence = precedence.unwrap_or(Precedence::Lowest);

        while precedence < parser.current_precedence() {
            expr = match parser.current_token.kind {
                TokenKind::LParen => Self::Call(Call::parse(parser, expr, None)?),
                TokenKind::LBracket => Self::Index(Index::parse(parser, expr, None)?),
                TokenKind::Dot => parse_member(parser, expr)?,
                _ => Self::Binary(Binary::parse(parser, expr, None)?),
            };
        }

        Ok(expr)
    }
}

fn parse_prefix<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>
) -> Result<Expression, ParseError> {
    let position = parser.current_token.position;

    let literal = |value: LiteralValue| -> Result<Expression, ParseError> {
        Ok(Expression::Literal(Literal { value, position }))
    };

    match &parser.current_token.kind {
        TokenKind::Int(value) => {
            let value = LiteralValue::Integer(*value);
            parser.step();
            literal(value)
        },
        TokenKind::Float(value) => {
            let value = LiteralValue::Float(*value);
            parser.step();
            literal(value)
        },
        TokenKind::Str(value) => {
            let value = LiteralValue::String(value.clone());
            parser.step();
            literal(value)
        },
        TokenKind::True => {
            parser.step();
            literal(LiteralValue::Boolean(true))
        },
        TokenKind::False => {
            parser.step();
            literal(LiteralValue::Boolean(false))
        },
        TokenKind::Null => {
            parser.step();
            literal(LiteralValue::Null)
        },
        TokenKind::Template(_) => {
            let token = parser.next_token();
            Ok(Expression::Template(parse_template(&token)?))
        },
        TokenKind::Ident(name) => {
            let identifier = Identifier { name: name.clone(), position };
            parser.step();
            Ok(Expression::Identifier(identifier))
        },
        TokenKind::LParen => {
            parser.step();
            let expression = Expression::parse(parser, None)?;
            parser.expect_one(TokenKind::RParen)?;
            Ok(expression)
        },
        TokenKind::LBracket => Ok(Expression::Array(ArrayLiteral::parse(parser, None)?)),
        TokenKind::Minus | TokenKind::Not => Ok(Expression::Unary(Unary::parse(parser, None)?)),
        _ => parse_error(ParseErrorType::ExpectedExpression, parser.current_token.clone())
    }
}

/// Comma separated expressions up to `closing`, which is consumed.
fn parse_arguments<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>,
    closing: TokenKind,
) -> Result<Vec<Expression>, ParseError> {
    let mut arguments = vec![];

    if !parser.check(&closing) {
        loop {
            arguments.push(Expression::parse(parser, None)?);

            if parser.eat(&TokenKind::Comma).is_none() {
                break;
            }
        }
    }

    parser.expect_one(closing)?;

    Ok(arguments)
}

// unary -> ( - | ! ) <unary>
impl<T: Iterator<Item = LexResult>> Parse<T> for Unary {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let token = parser.next_token();

        let operator = match token.kind {
            TokenKind::Minus => UnaryOperator::Negate,
            TokenKind::Not => UnaryOperator::Not,
            _ => return parse_error(ParseErrorType::ExpectedExpression, token),
        };

        let operand = Expression::parse(parser, Some(Precedence::Prefix))?;

        Ok(Self {
            operator,
            operand: Box::new(operand),
            position: token.position,
        })
    }
}

// array -> [ [ <expression> { , <expression> } ] ]
impl<T: Iterator<Item = LexResult>> Parse<T> for ArrayLiteral {
    fn parse(
        parser: &mut Parser<T>,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::LBracket)?.position;
        let elements = parse_arguments(parser, TokenKind::RBracket)?;

        Ok(Self { elements, position })
    }
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Binary {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let precedence = parser.current_precedence();
        let token = parser.next_token();

        let operator = match BinaryOperator::from_token(&token.kind) {
            Some(operator) => operator,
            None => return parse_error(
                ParseErrorType::UnexpectedToken { expected: vec!["ein Operator".into()] },
                token
            ),
        };

        let right = Expression::parse(parser, Some(precedence))?;

        Ok(Self {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            position: token.position,
        })
    }
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Call {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::LParen)?.position;
        let arguments = parse_arguments(parser, TokenKind::RParen)?;

        Ok(Self {
            callee: Box::new(left),
            arguments,
            position,
        })
    }
}

impl<T: Iterator<Item = LexResult>> InfixParse<T> for Index {
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        _precedence: Option<Precedence>
    ) -> Result<Self, ParseError> {
        let position = parser.expect_one(TokenKind::LBracket)?.position;
        let index = Expression::parse(parser, None)?;
        parser.expect_one(TokenKind::RBracket)?;

        Ok(Self {
            array: Box::new(left),
            index: Box::new(index),
            position,
        })
    }
}

/// `object.NAME` or `object.NAME(args)`.
fn parse_member<T: Iterator<Item = LexResult>>(
    parser: &mut Parser<T>,
    object: Expression,
) -> Result<Expression, ParseError> {
    let position = parser.expect_one(TokenKind::Dot)?.position;
    let name = parser.expect_ident()?.name;

    if parser.eat(&TokenKind::LParen).is_some() {
        let arguments = parse_arguments(parser, TokenKind::RParen)?;

        return Ok(Expression::MethodCall(MethodCall {
            object: Box::new(object),
            method: name,
            arguments,
            position,
        }));
    }

    Ok(Expression::Property(Property {
        object: Box::new(object),
        name,
        position,
    }))
}
