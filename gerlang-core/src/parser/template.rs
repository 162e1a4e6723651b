use crate::lexer::prelude::{Lexer, Token, TokenKind};
use crate::utils::prelude::{Position, SrcSpan};
use super::ast::{Expression, Template};
use super::error::{ParseError, ParseErrorType};
use super::parser::{parse_error, Parse, Parser};

const OPEN: &str = "${";
const CLOSE: char = '}';

fn invalid<T>(token: &Token, reason: impl Into<String>) -> Result<T, ParseError> {
    parse_error(
        ParseErrorType::InvalidTemplate { reason: reason.into() },
        token.clone()
    )
}

/// Position of byte `offset` of the decoded template text, assuming the text
/// follows the opening quote of `token` verbatim.
fn origin_of(token: &Token, text: &str, offset: usize) -> Position {
    let before = &text[..offset];
    let start = token.position.span.start + 1 + offset as u32;

    match before.rfind('\n') {
        Some(newline) => Position::new(
            token.position.line + before.matches('\n').count() as u32,
            before[newline + 1..].chars().count() as u32 + 1,
            SrcSpan::from(start, start),
        ),
        None => Position::new(
            token.position.line,
            token.position.column + 1 + before.chars().count() as u32,
            SrcSpan::from(start, start),
        ),
    }
}

/// Parses one `${...}` span. The span must hold exactly one expression.
fn parse_interpolation(token: &Token, source: &str, origin: Position) -> Result<Expression, ParseError> {
    let lexer = Lexer::with_origin(
        source.char_indices().map(|(i, c)| (i as u32, c)),
        origin,
    );
    let mut parser = Parser::new(lexer);

    let expression = Expression::parse(&mut parser, None);

    if let Some(error) = parser.lex_errors.first() {
        return invalid(token, error.to_string());
    }

    let expression = expression?;

    if !parser.is_at_end() {
        return parse_error(
            ParseErrorType::UnexpectedToken { expected: vec![format!("`{CLOSE}`")] },
            parser.current_token.clone()
        );
    }

    Ok(expression)
}

/// Splits a template string token into literal parts and parsed expressions.
pub fn parse_template(token: &Token) -> Result<Template, ParseError> {
    let text = match &token.kind {
        TokenKind::Template(text) => text.as_str(),
        _ => return invalid(token, "kein Template-String"),
    };

    let mut parts = vec![];
    let mut expressions = vec![];
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find(OPEN) {
        let open = cursor + found;
        let inner_start = open + OPEN.len();

        let close = match text[inner_start..].find(CLOSE) {
            Some(close) => inner_start + close,
            None => return invalid(token, "Platzhalter ohne schließende `}`"),
        };

        let inner = &text[inner_start..close];

        if inner.contains(OPEN) {
            return invalid(token, "verschachtelte Platzhalter sind nicht erlaubt");
        }
        if inner.trim().is_empty() {
            return invalid(token, "leerer Platzhalter `${}`");
        }

        parts.push(text[cursor..open].to_string());
        expressions.push(parse_interpolation(token, inner, origin_of(token, text, inner_start))?);

        cursor = close + CLOSE.len_utf8();
    }

    parts.push(text[cursor..].to_string());

    Ok(Template {
        parts,
        expressions,
        position: token.position,
    })
}
