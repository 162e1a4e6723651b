use crate::lexer::prelude::{lex_str, LexResult, LexicalError, Lexer, Token, TokenKind};
use crate::utils::prelude::Position;
use super::error::{ParseError, ParseErrorType, SyntaxError};
use super::ast::{Expression, Identifier, Program, TypeName};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

pub trait InfixParse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(
        parser: &mut Parser<T>,
        left: Expression,
        precedence: Option<Precedence>
    ) -> Result<Self, ParseError>;
}

/// Recursive-descent parser over a token stream with two tokens of lookahead
/// past the current one.
///
/// Errors are collected: after a failed declaration the parser skips to the
/// next statement boundary and keeps going, so one run reports every syntax
/// error. A program is only returned when no error was recorded.
pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Token,
    pub next_token: Token,
    pub peek_token: Token,
    pub lex_errors: Vec<LexicalError>,
    pub errors: Vec<ParseError>,

    previous_kind: Option<TokenKind>,
    last_position: Position,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let placeholder = Token::new(TokenKind::Eof, "", Position::default());

        let mut parser = Self {
            current_token: placeholder.clone(),
            next_token: placeholder.clone(),
            peek_token: placeholder,
            lex_errors: vec![],
            errors: vec![],

            previous_kind: None,
            last_position: Position::new(1, 1, Default::default()),
            tokens: input,
        };

        parser.step();
        parser.step();
        parser.step();

        parser.previous_kind = None;
        parser
    }

    fn pull(&mut self) -> Token {
        match self.tokens.next() {
            Some(Ok(token)) => {
                self.last_position = token.position;
                token
            },
            Some(Err(err)) => {
                self.lex_errors.push(err);
                Token::new(TokenKind::Eof, "", self.last_position)
            },
            None => Token::new(TokenKind::Eof, "", self.last_position),
        }
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    /// Consumes the current token and returns it.
    pub fn next_token(&mut self) -> Token {
        let pulled = self.pull();
        let peek = std::mem::replace(&mut self.peek_token, pulled);
        let next = std::mem::replace(&mut self.next_token, peek);
        let current = std::mem::replace(&mut self.current_token, next);

        self.previous_kind = Some(current.kind.clone());
        current
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        &self.current_token.kind == kind
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token.is_eof()
    }

    /// Consumes the current token if it is `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.next_token())
        } else {
            None
        }
    }

    pub fn current_precedence(&self) -> Precedence {
        Precedence::from(&self.current_token.kind)
    }

    pub fn parse(&mut self) -> Result<Program, SyntaxError> {
        let program = Program::parse(self, None);

        if let Some(error) = self.lex_errors.first() {
            return Err(SyntaxError::Lex(*error));
        }

        match program {
            Ok(program) if self.errors.is_empty() => Ok(program),
            Ok(_) => Err(SyntaxError::Parse(std::mem::take(&mut self.errors))),
            Err(error) => {
                self.errors.push(error);
                Err(SyntaxError::Parse(std::mem::take(&mut self.errors)))
            }
        }
    }

    /// Skips tokens until just after a `;` or `}`, or just before a token
    /// that starts a statement.
    pub fn synchronize(&mut self) {
        if !self.is_at_end() {
            self.step();
        }

        while !self.is_at_end() {
            if matches!(self.previous_kind, Some(TokenKind::Semicolon) | Some(TokenKind::RBrace)) {
                return;
            }

            match self.current_token.kind {
                TokenKind::If
                | TokenKind::For
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Print
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Export
                | TokenKind::Import
                | TokenKind::Void
                | TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::StringType
                | TokenKind::BoolType
                | TokenKind::ArrayType => return,
                _ => self.step()
            }
        }
    }

    pub fn expect_one(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(&kind) {
            return Ok(self.next_token());
        }

        parse_error(
            ParseErrorType::UnexpectedToken {
                expected: vec![format!("`{}`", kind.as_literal())],
            },
            self.current_token.clone()
        )
    }

    pub fn expect_ident(&mut self) -> Result<Identifier, ParseError> {
        match &self.current_token.kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let token = self.next_token();

                Ok(Identifier { name, position: token.position })
            },
            _ => parse_error(ParseErrorType::ExpectedIdent, self.current_token.clone())
        }
    }

    pub fn expect_type(&mut self) -> Result<TypeName, ParseError> {
        match TypeName::from_token(&self.current_token.kind) {
            Some(type_name) => {
                self.step();
                Ok(type_name)
            },
            None => parse_error(ParseErrorType::ExpectedType, self.current_token.clone())
        }
    }

    /// `;` terminating an export or import; may be omitted at end of input.
    pub fn expect_terminator(&mut self) -> Result<(), ParseError> {
        if self.eat(&TokenKind::Semicolon).is_some() || self.is_at_end() {
            return Ok(());
        }

        self.expect_one(TokenKind::Semicolon).map(|_| ())
    }

    /// Whether the upcoming tokens read `<type> <identifier> (`.
    pub fn at_function_declaration(&self) -> bool {
        self.current_token.kind.is_type()
            && matches!(self.next_token.kind, TokenKind::Ident(_))
            && self.peek_token.kind == TokenKind::LParen
    }
}

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    Or,
    And,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl From<&TokenKind> for Precedence {
    fn from(value: &TokenKind) -> Self {
        match value {
            TokenKind::Or => Self::Or,
            TokenKind::And => Self::And,
            TokenKind::Equal | TokenKind::NotEqual => Self::Equals,
            TokenKind::Less | TokenKind::Greater |
            TokenKind::LessEqual | TokenKind::GreaterEqual => Self::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Self::Sum,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Self::Product,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::Dot => Self::Call,
            _ => Self::Lowest,
        }
    }
}

/// Parses an already lexed token sequence.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(tokens.into_iter().map(Ok));
    parser.parse()
}

pub fn parse_module(src: &str) -> Result<Program, SyntaxError> {
    let mut parser = Parser::new(lex_str(src));
    parser.parse()
}

pub fn parse_module_from_stream(stream: impl Iterator<Item = char>) -> Result<Program, SyntaxError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);
    parser.parse()
}

pub fn parse_error<T>(error: ParseErrorType, token: Token) -> Result<T, ParseError> {
    Err(ParseError { error, token })
}
