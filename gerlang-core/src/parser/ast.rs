use std::{fmt::Display, rc::Rc};

use crate::{lexer::prelude::TokenKind, utils::prelude::Position};

fn join<T: Display>(items: &[T], separator: &str) -> String {
    items.iter()
        .map(|item| item.to_string())
        .collect::<Vec<String>>()
        .join(separator)
}

// program -> { <declaration> } EOF
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", join(&self.statements, "\n"))
    }
}

// type -> NIX | GANZ | KOMMA | WORT | JAIN | KISTE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Void,
    Int,
    Float,
    String,
    Bool,
    Array,
}

impl TypeName {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Void => Self::Void,
            TokenKind::IntType => Self::Int,
            TokenKind::FloatType => Self::Float,
            TokenKind::StringType => Self::String,
            TokenKind::BoolType => Self::Bool,
            TokenKind::ArrayType => Self::Array,
            _ => return None,
        })
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Void => "NIX",
            Self::Int => "GANZ",
            Self::Float => "KOMMA",
            Self::String => "WORT",
            Self::Bool => "JAIN",
            Self::Array => "KISTE",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(ExpressionStatement),
    Variable(VariableDeclaration),
    Function(Rc<FunctionDeclaration>),
    Assignment(Assignment),
    Block(Block),
    If(IfStatement),
    While(WhileStatement),
    For(ForStatement),
    Return(ReturnStatement),
    Print(PrintStatement),
    Throw(ThrowStatement),
    TryCatch(TryCatch),
    Export(Export),
    ExportList(ExportList),
    Import(Import),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Self::Expression(statement) => statement.position,
            Self::Variable(declaration) => declaration.position,
            Self::Function(declaration) => declaration.position,
            Self::Assignment(assignment) => assignment.position,
            Self::Block(block) => block.position,
            Self::If(statement) => statement.position,
            Self::While(statement) => statement.position,
            Self::For(statement) => statement.position,
            Self::Return(statement) => statement.position,
            Self::Print(statement) => statement.position,
            Self::Throw(statement) => statement.position,
            Self::TryCatch(statement) => statement.position,
            Self::Export(export) => export.position,
            Self::ExportList(export) => export.position,
            Self::Import(import) => import.position,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression(statement) => write!(f, "{};", statement.expression),
            Self::Variable(declaration) => write!(f, "{declaration}"),
            Self::Function(declaration) => write!(f, "{declaration}"),
            Self::Assignment(assignment) => write!(f, "{} = {};", assignment.name, assignment.value),
            Self::Block(block) => write!(f, "{block}"),
            Self::If(statement) => {
                write!(f, "WENN ({}) {}", statement.condition, statement.then_branch)?;
                match &statement.else_branch {
                    Some(else_branch) => write!(f, " SONST {else_branch}"),
                    None => Ok(())
                }
            },
            Self::While(statement) => write!(f, "SOLANGE ({}) {}", statement.condition, statement.body),
            Self::For(statement) => write!(f, "{statement}"),
            Self::Return(statement) => match &statement.value {
                Some(value) => write!(f, "ZURÜCK {value};"),
                None => write!(f, "ZURÜCK;"),
            },
            Self::Print(statement) => write!(f, "DRUCKE({});", statement.expression),
            Self::Throw(statement) => write!(f, "MECKER({});", statement.expression),
            Self::TryCatch(statement) => {
                write!(f, "VERSUCHE() {} FANGE ", statement.body)?;
                if let Some(name) = &statement.catch_name {
                    write!(f, "{name} ")?;
                }
                write!(f, "{}", statement.handler)
            },
            Self::Export(export) => write!(f, "GIBFREI {}", export.declaration),
            Self::ExportList(export) => write!(f, "GIBFREI {};", join(&export.names, ", ")),
            Self::Import(import) => write!(f, "HOLE {} VON {:?};", join(&import.names, ", "), import.module),
        }
    }
}

// expression_statement -> <expression> ;
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub position: Position,
}

// variable_declaration -> <type> <identifier> [ = <expression> ] ;
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub type_name: TypeName,
    pub name: Identifier,
    pub initializer: Option<Expression>,
    pub position: Position,
}

impl Display for VariableDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.initializer {
            Some(initializer) => write!(f, "{} {} = {};", self.type_name, self.name, initializer),
            None => write!(f, "{} {};", self.type_name, self.name),
        }
    }
}

// parameter -> <identifier> : <type> | <type> <identifier>
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_name: TypeName,
    pub name: Identifier,
}

impl Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)
    }
}

// function_declaration -> <type> <identifier> ( [ <parameter> { , <parameter> } ] ) <block>
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub return_type: TypeName,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub position: Position,
}

impl Display for FunctionDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}({}) {}", self.return_type, self.name, join(&self.parameters, ", "), self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: Identifier,
    pub value: Expression,
    pub position: Position,
}

// block -> { { <declaration> } }
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub position: Position,
}

impl Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.statements.is_empty() {
            return write!(f, "{{}}");
        }

        write!(f, "{{ {} }}", join(&self.statements, " "))
    }
}

// if -> WENN ( <expression> ) <statement> [ SONST <statement> ]
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Box<Statement>,
    pub else_branch: Option<Box<Statement>>,
    pub position: Position,
}

// while -> SOLANGE ( <expression> ) <statement>
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub position: Position,
}

// for -> FÜR ( [<init>] ; [<expression>] ; [<update>] ) <statement>
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    pub initializer: Option<Box<Statement>>,
    pub condition: Option<Expression>,
    pub update: Option<Box<Statement>>,
    pub body: Box<Statement>,
    pub position: Position,
}

impl Display for ForStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let initializer = match &self.initializer {
            Some(initializer) => initializer.to_string(),
            None => ";".to_string(),
        };
        let condition = self.condition.as_ref().map(|c| c.to_string()).unwrap_or_default();
        let update = match self.update.as_deref() {
            Some(update) => update.to_string().trim_end_matches(';').to_string(),
            None => String::new(),
        };

        write!(f, "FÜR ({initializer} {condition}; {update}) {}", self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintStatement {
    pub expression: Expression,
    pub position: Position,
}

// throw -> MECKER ( <expression> ) ;
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    pub expression: Expression,
    pub position: Position,
}

// try -> VERSUCHE ( ) <statement> FANGE [ <identifier> ] <block>
#[derive(Debug, Clone, PartialEq)]
pub struct TryCatch {
    pub body: Box<Statement>,
    pub catch_name: Option<Identifier>,
    pub handler: Block,
    pub position: Position,
}

// export -> GIBFREI ( <declaration> | <identifier> { , <identifier> } ; )
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub declaration: Box<Statement>,
    pub position: Position,
}

impl Export {
    /// Name of the wrapped function or variable declaration.
    pub fn name(&self) -> Option<&str> {
        match self.declaration.as_ref() {
            Statement::Function(function) => Some(&function.name.name),
            Statement::Variable(variable) => Some(&variable.name.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportList {
    pub names: Vec<Identifier>,
    pub position: Position,
}

// import -> HOLE <identifier> { , <identifier> } VON <string> ;
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub names: Vec<Identifier>,
    pub module: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Identifier(Identifier),
    Binary(Binary),
    Unary(Unary),
    Call(Call),
    Array(ArrayLiteral),
    Index(Index),
    Property(Property),
    MethodCall(MethodCall),
    Set(Set),
    Template(Template),
}

impl Expression {
    pub fn position(&self) -> Position {
        match self {
            Self::Literal(literal) => literal.position,
            Self::Identifier(identifier) => identifier.position,
            Self::Binary(binary) => binary.position,
            Self::Unary(unary) => unary.position,
            Self::Call(call) => call.position,
            Self::Array(array) => array.position,
            Self::Index(index) => index.position,
            Self::Property(property) => property.position,
            Self::MethodCall(call) => call.position,
            Self::Set(set) => set.position,
            Self::Template(template) => template.position,
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{}", literal.value),
            Self::Identifier(identifier) => write!(f, "{identifier}"),
            Self::Binary(binary) => write!(f, "({} {} {})", binary.left, binary.operator, binary.right),
            Self::Unary(unary) => write!(f, "({}{})", unary.operator, unary.operand),
            Self::Call(call) => write!(f, "{}({})", call.callee, join(&call.arguments, ", ")),
            Self::Array(array) => write!(f, "[{}]", join(&array.elements, ", ")),
            Self::Index(index) => write!(f, "{}[{}]", index.array, index.index),
            Self::Property(property) => write!(f, "{}.{}", property.object, property.name),
            Self::MethodCall(call) => {
                write!(f, "{}.{}({})", call.object, call.method, join(&call.arguments, ", "))
            },
            Self::Set(set) => write!(f, "{} = {}", set.target, set.value),
            Self::Template(template) => {
                write!(f, "\"")?;
                for (idx, part) in template.parts.iter().enumerate() {
                    write!(f, "{}", part.escape_debug())?;
                    if let Some(expression) = template.expressions.get(idx) {
                        write!(f, "${{{expression}}}")?;
                    }
                }
                write!(f, "\"")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value:?}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Boolean(true) => write!(f, "JA"),
            Self::Boolean(false) => write!(f, "NEIN"),
            Self::Null => write!(f, "VIELLEICHT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: LiteralValue,
    pub position: Position,
}

// identifier -> <letter> { <letter> | <digit> | _ }
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub position: Position,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::Plus => Self::Add,
            TokenKind::Minus => Self::Subtract,
            TokenKind::Star => Self::Multiply,
            TokenKind::Slash => Self::Divide,
            TokenKind::Percent => Self::Modulo,
            TokenKind::Equal => Self::Equal,
            TokenKind::NotEqual => Self::NotEqual,
            TokenKind::Less => Self::Less,
            TokenKind::LessEqual => Self::LessEqual,
            TokenKind::Greater => Self::Greater,
            TokenKind::GreaterEqual => Self::GreaterEqual,
            TokenKind::And => Self::And,
            TokenKind::Or => Self::Or,
            _ => return None,
        })
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };

        write!(f, "{symbol}")
    }
}

// binary -> <expression> <operator> <expression>
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: BinaryOperator,
    pub right: Box<Expression>,
    /// Position of the operator token.
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Negate => write!(f, "-"),
            Self::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub operand: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    /// Position of the opening parenthesis.
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub object: Box<Expression>,
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub object: Box<Expression>,
    pub method: String,
    pub arguments: Vec<Expression>,
    pub position: Position,
}

/// Assignment to an arbitrary target expression, e.g. `liste[0] = 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub target: Box<Expression>,
    pub value: Box<Expression>,
    /// Position of the `=` token.
    pub position: Position,
}

/// `parts.len()` is always `expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub parts: Vec<String>,
    pub expressions: Vec<Expression>,
    pub position: Position,
}
