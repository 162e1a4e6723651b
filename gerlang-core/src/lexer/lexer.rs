use super::error::{LexicalError, LexicalErrorType};
use super::token::{Token, TokenKind};
use std::fmt::Display;
use crate::utils::prelude::{Position, SrcSpan};

pub type LexResult = std::result::Result<Token, LexicalError>;

/// Every reserved word of the language, in the order `gerlang info` lists them.
pub const KEYWORDS: [&str; 29] = [
	"NIX", "GANZ", "KOMMA", "WORT", "JAIN", "KISTE", "DING",
	"WENN", "SONST", "SOLANGE", "FÜR", "DRUCKE", "ZURÜCK", "MECKER",
	"ORDNUNG", "SCHAFFE", "VERSUCHE", "FANGE", "GIBFREI", "HOLE", "VON",
	"JA", "NEIN", "VIELLEICHT",
	"UND", "ODER", "NICHT", "IST", "WIRD",
];

const COMMENT_KEYWORD: &str = "HINWEIS";

pub fn str_to_keyword(word: &str) -> Option<TokenKind> {
	Some(match word {
		"NIX" => TokenKind::Void,
		"GANZ" => TokenKind::IntType,
		"KOMMA" => TokenKind::FloatType,
		"WORT" => TokenKind::StringType,
		"JAIN" => TokenKind::BoolType,
		"KISTE" => TokenKind::ArrayType,
		"DING" => TokenKind::Object,
		"WENN" => TokenKind::If,
		"SONST" => TokenKind::Else,
		"SOLANGE" => TokenKind::While,
		"FÜR" => TokenKind::For,
		"DRUCKE" => TokenKind::Print,
		"ZURÜCK" => TokenKind::Return,
		"MECKER" => TokenKind::Throw,
		"ORDNUNG" => TokenKind::Struct,
		"SCHAFFE" => TokenKind::Constructor,
		"VERSUCHE" => TokenKind::Try,
		"FANGE" => TokenKind::Catch,
		"GIBFREI" => TokenKind::Export,
		"HOLE" => TokenKind::Import,
		"VON" => TokenKind::From,

		"JA" => TokenKind::True,
		"NEIN" => TokenKind::False,
		"VIELLEICHT" => TokenKind::Null,

		"UND" => TokenKind::And,
		"ODER" => TokenKind::Or,
		"NICHT" => TokenKind::Not,
		"IST" => TokenKind::Equal,
		"WIRD" => TokenKind::Assign,

		_ => return None
	})
}

fn is_ident_start(ch: char) -> bool {
	ch.is_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_'
}

/// Start of the token being lexed: line, column and relative byte offset.
#[derive(Debug, Clone, Copy)]
struct Mark {
	line: u32,
	column: u32,
	offset: u32,
}

#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,

	line: u32,
	column: u32,
	// Byte offset added to every span; non-zero when lexing inside a template string.
	base: u32,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tline: {}, column: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.line, self.column, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
		Self::with_origin(input, Position::new(1, 1, SrcSpan::default()))
	}

	/// Lexer whose first character sits at `origin` in some enclosing source.
	pub fn with_origin(input: T, origin: Position) -> Self {
		let mut lexer = Self {
			position: 0,
			next_position: 0,
			ch: None,
			next_ch: None,
			input,

			line: origin.line,
			column: origin.column,
			base: origin.span.start,
			finished: false,
		};

		lexer.next_char();
		lexer.next_char();

		lexer
	}

	pub fn next_token(&mut self) -> LexResult {
		loop {
			self.skip_trivia();

			let ch = match self.ch {
				Some(ch) => ch,
				None => {
					let start = self.mark();
					return Ok(self.token(start, TokenKind::Eof, ""));
				}
			};

			let token = match ch {
				'(' => self.eat_one_char(TokenKind::LParen),
				')' => self.eat_one_char(TokenKind::RParen),
				'{' => self.eat_one_char(TokenKind::LBrace),
				'}' => self.eat_one_char(TokenKind::RBrace),
				'[' => self.eat_one_char(TokenKind::LBracket),
				']' => self.eat_one_char(TokenKind::RBracket),
				';' => self.eat_one_char(TokenKind::Semicolon),
				',' => self.eat_one_char(TokenKind::Comma),
				'.' => self.eat_one_char(TokenKind::Dot),
				':' => self.eat_one_char(TokenKind::Colon),
				'-' => self.eat_one_char(TokenKind::Minus),
				'*' => self.eat_one_char(TokenKind::Star),
				'/' => self.eat_one_char(TokenKind::Slash),
				'%' => self.eat_one_char(TokenKind::Percent),
				'+' => self.eat_one_or_two('+', TokenKind::Plus, TokenKind::Increment),
				'=' => self.eat_one_or_two('=', TokenKind::Assign, TokenKind::Equal),
				'!' => self.eat_one_or_two('=', TokenKind::Not, TokenKind::NotEqual),
				'<' => self.eat_one_or_two('=', TokenKind::Less, TokenKind::LessEqual),
				'>' => self.eat_one_or_two('=', TokenKind::Greater, TokenKind::GreaterEqual),
				'&' if self.next_ch == Some('&') => self.eat_two_chars(TokenKind::And),
				'|' if self.next_ch == Some('|') => self.eat_two_chars(TokenKind::Or),
				'"' | '\'' => return self.lex_string(ch),
				c if c.is_ascii_digit() => return self.lex_number(),
				c if is_ident_start(c) => match self.lex_ident() {
					Some(token) => token,
					None => continue,
				},
				c => {
					let start = self.mark();
					let position = self.position_from(start, self.position + c.len_utf8() as u32);

					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: position,
					});
				}
			};

			return Ok(token);
		}
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += self.next_ch.map_or(0, |c| c.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		match ch {
			Some('\n') => {
				self.line += 1;
				self.column = 1;
			},
			Some(_) => self.column += 1,
			None => {}
		}

		ch
	}

	fn skip_trivia(&mut self) {
		loop {
			match (self.ch, self.next_ch) {
				(Some(ch), _) if ch.is_whitespace() => {
					self.next_char();
				},
				(Some('/'), Some('/')) => self.skip_line(),
				_ => break
			}
		}
	}

	fn skip_line(&mut self) {
		while let Some(ch) = self.ch {
			if ch == '\n' {
				break;
			}
			self.next_char();
		}
	}

	fn mark(&self) -> Mark {
		Mark { line: self.line, column: self.column, offset: self.position }
	}

	fn position_from(&self, start: Mark, end: u32) -> Position {
		Position::new(
			start.line,
			start.column,
			SrcSpan::from(start.offset + self.base, end + self.base),
		)
	}

	fn token(&self, start: Mark, kind: TokenKind, lexeme: impl Into<String>) -> Token {
		Token::new(kind, lexeme, self.position_from(start, self.position))
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Token {
		let start = self.mark();
		let lexeme = self.next_char().map(String::from).unwrap_or_default();

		self.token(start, kind, lexeme)
	}

	fn eat_two_chars(&mut self, kind: TokenKind) -> Token {
		let start = self.mark();
		let mut lexeme = String::with_capacity(2);
		lexeme.extend(self.next_char());
		lexeme.extend(self.next_char());

		self.token(start, kind, lexeme)
	}

	fn eat_one_or_two(&mut self, second: char, single: TokenKind, double: TokenKind) -> Token {
		if self.next_ch == Some(second) {
			self.eat_two_chars(double)
		} else {
			self.eat_one_char(single)
		}
	}

	/// Lexes a word. Returns `None` when the word opens a `HINWEIS:` comment.
	fn lex_ident(&mut self) -> Option<Token> {
		let start = self.mark();
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !is_ident_continue(ch) {
				break;
			}
			ident.push(ch);
			self.next_char();
		}

		if ident == COMMENT_KEYWORD && self.ch == Some(':') {
			self.skip_line();
			return None;
		}

		let kind = match str_to_keyword(&ident) {
			Some(kind) => kind,
			None => TokenKind::Ident(ident.clone()),
		};

		Some(self.token(start, kind, ident))
	}

	fn lex_string(&mut self, quote: char) -> LexResult {
		let start = self.mark();
		let mut lexeme = String::from(quote);
		let mut value = String::new();

		self.next_char(); // skip opening quote

		let unterminated = |lexer: &Self| LexicalError {
			error: LexicalErrorType::UnterminatedString,
			location: lexer.position_from(start, start.offset + quote.len_utf8() as u32),
		};

		loop {
			match self.next_char() {
				None => return Err(unterminated(self)),
				Some(ch) if ch == quote => {
					lexeme.push(ch);
					break;
				},
				Some('\\') => {
					lexeme.push('\\');

					let escaped = match self.next_char() {
						Some(escaped) => escaped,
						None => return Err(unterminated(self)),
					};

					lexeme.push(escaped);
					value.push(match escaped {
						'n' => '\n',
						't' => '\t',
						other => other,
					});
				},
				Some(ch) => {
					lexeme.push(ch);
					value.push(ch);
				}
			}
		}

		let kind = if value.contains("${") {
			TokenKind::Template(value)
		} else {
			TokenKind::Str(value)
		};

		Ok(self.token(start, kind, lexeme))
	}

	fn lex_number(&mut self) -> LexResult {
		let start = self.mark();
		let mut value = String::new();
		let mut has_period = false;

		loop {
			match self.ch {
				Some(ch) if ch.is_ascii_digit() => {
					value.push(ch);
					self.next_char();
				},
				// `1.` is a float; `1.2.3` stops before the second period.
				Some('.') if !has_period => {
					has_period = true;
					value.push('.');
					self.next_char();
				},
				_ => break
			}
		}

		let kind = if has_period {
			match value.parse::<f64>() {
				Ok(number) => TokenKind::Float(number),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberOutOfRange,
					location: self.position_from(start, self.position),
				})
			}
		} else {
			match value.parse::<i64>() {
				Ok(number) => TokenKind::Int(number),
				Err(_) => return Err(LexicalError {
					error: LexicalErrorType::NumberOutOfRange,
					location: self.position_from(start, self.position),
				})
			}
		};

		Ok(self.token(start, kind, value))
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	/// Yields tokens up to and including `Eof`, or up to the first error.
	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let result = self.next_token();

		if matches!(&result, Ok(token) if token.is_eof()) || result.is_err() {
			self.finished = true;
		}

		Some(result)
	}
}

pub fn lex_str(src: &str) -> Lexer<impl Iterator<Item = (u32, char)> + '_> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
}

/// Lexes the whole source. The last token is always `Eof`.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexicalError> {
	lex_str(src).collect()
}
