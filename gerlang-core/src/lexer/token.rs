use std::fmt::Display;

use crate::utils::prelude::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // <buchstabe>{<buchstabe>|<ziffer>|_}
    Ident(String),
    Int(i64),
    Float(f64),
    // '...' oder "..." ohne `${`
    Str(String),
    // '...' oder "..." mit mindestens einem `${`
    Template(String),

    // Literale
    True, // JA
    False, // NEIN
    Null, // VIELLEICHT

    // Typen
    Void, // NIX
    IntType, // GANZ
    FloatType, // KOMMA
    StringType, // WORT
    BoolType, // JAIN
    ArrayType, // KISTE

    // Reserviert, ohne Grammatik
    Object, // DING
    Struct, // ORDNUNG
    Constructor, // SCHAFFE

    // Schlüsselwörter
    If, // WENN
    Else, // SONST
    While, // SOLANGE
    For, // FÜR
    Print, // DRUCKE
    Return, // ZURÜCK
    Throw, // MECKER
    Try, // VERSUCHE
    Catch, // FANGE
    Export, // GIBFREI
    Import, // HOLE
    From, // VON

    // Operatoren
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign, // = | WIRD
    Equal, // == | IST
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And, // && | UND
    Or, // || | ODER
    Not, // ! | NICHT
    Increment, // ++

    // Trennzeichen
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,

    Eof,
}

impl TokenKind {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Throw
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Export
                | TokenKind::Import
                | TokenKind::From
                | TokenKind::Object
                | TokenKind::Struct
                | TokenKind::Constructor
        ) || self.is_type()
    }

    /// Type keywords that may start a declaration.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Void
                | TokenKind::IntType
                | TokenKind::FloatType
                | TokenKind::StringType
                | TokenKind::BoolType
                | TokenKind::ArrayType
        )
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Assign
                | TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Increment
        )
    }

    /// Upper-case category name, as shown by `gerlang lex`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "IDENTIFIER",
            TokenKind::Int(_) => "INTEGER_LITERAL",
            TokenKind::Float(_) => "FLOAT_LITERAL",
            TokenKind::Str(_) => "STRING_LITERAL",
            TokenKind::Template(_) => "TEMPLATE_STRING_LITERAL",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Null => "NULL",
            TokenKind::Void => "VOID",
            TokenKind::IntType => "INT",
            TokenKind::FloatType => "FLOAT",
            TokenKind::StringType => "STRING",
            TokenKind::BoolType => "BOOL",
            TokenKind::ArrayType => "ARRAY",
            TokenKind::Object => "OBJECT",
            TokenKind::Struct => "STRUCT",
            TokenKind::Constructor => "CONSTRUCTOR",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Print => "PRINT",
            TokenKind::Return => "RETURN",
            TokenKind::Throw => "THROW",
            TokenKind::Try => "TRY",
            TokenKind::Catch => "CATCH",
            TokenKind::Export => "EXPORT",
            TokenKind::Import => "IMPORT",
            TokenKind::From => "FROM",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULTIPLY",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Percent => "MODULO",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Equal => "EQUAL",
            TokenKind::NotEqual => "NOT_EQUAL",
            TokenKind::Less => "LESS",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Greater => "GREATER",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Increment => "INCREMENT",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::Colon => "COLON",
            TokenKind::Eof => "EOF",
        }
    }

    pub fn as_literal(&self) -> String {
        match self {
            TokenKind::Ident(value) => value.clone(),
            TokenKind::Int(value) => value.to_string(),
            TokenKind::Float(value) => value.to_string(),
            TokenKind::Str(value) | TokenKind::Template(value) => format!("{value:?}"),

            TokenKind::True => "JA".to_string(),
            TokenKind::False => "NEIN".to_string(),
            TokenKind::Null => "VIELLEICHT".to_string(),
            TokenKind::Void => "NIX".to_string(),
            TokenKind::IntType => "GANZ".to_string(),
            TokenKind::FloatType => "KOMMA".to_string(),
            TokenKind::StringType => "WORT".to_string(),
            TokenKind::BoolType => "JAIN".to_string(),
            TokenKind::ArrayType => "KISTE".to_string(),
            TokenKind::Object => "DING".to_string(),
            TokenKind::Struct => "ORDNUNG".to_string(),
            TokenKind::Constructor => "SCHAFFE".to_string(),
            TokenKind::If => "WENN".to_string(),
            TokenKind::Else => "SONST".to_string(),
            TokenKind::While => "SOLANGE".to_string(),
            TokenKind::For => "FÜR".to_string(),
            TokenKind::Print => "DRUCKE".to_string(),
            TokenKind::Return => "ZURÜCK".to_string(),
            TokenKind::Throw => "MECKER".to_string(),
            TokenKind::Try => "VERSUCHE".to_string(),
            TokenKind::Catch => "FANGE".to_string(),
            TokenKind::Export => "GIBFREI".to_string(),
            TokenKind::Import => "HOLE".to_string(),
            TokenKind::From => "VON".to_string(),

            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::Assign => "=".to_string(),
            TokenKind::Equal => "==".to_string(),
            TokenKind::NotEqual => "!=".to_string(),
            TokenKind::Less => "<".to_string(),
            TokenKind::LessEqual => "<=".to_string(),
            TokenKind::Greater => ">".to_string(),
            TokenKind::GreaterEqual => ">=".to_string(),
            TokenKind::And => "&&".to_string(),
            TokenKind::Or => "||".to_string(),
            TokenKind::Not => "!".to_string(),
            TokenKind::Increment => "++".to_string(),

            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::LBrace => "{".to_string(),
            TokenKind::RBrace => "}".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::Semicolon => ";".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::Colon => ":".to_string(),

            TokenKind::Eof => "\0".to_string(),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token as written (quotes included for strings).
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self { kind, lexeme: lexeme.into(), position }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({:?}) at {}", self.kind.name(), self.lexeme, self.position)
    }
}
