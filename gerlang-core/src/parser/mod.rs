pub mod error;
pub mod parser;
pub mod ast;
pub mod statements;
pub mod expressions;
pub mod template;

pub mod prelude {
    pub use super::{
        error::*,
        parser::*,
        ast::*,
        template::parse_template,
    };
}

#[cfg(test)]
mod tests;
