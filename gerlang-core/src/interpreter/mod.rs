pub mod call_stack;
pub mod error;
pub mod interpreter;
pub mod expression;
pub mod statement;
pub mod module;

pub mod prelude {
    pub use super::{
        call_stack::*,
        error::*,
        interpreter::*,
        expression::binary_operation,
        module::MODULE_EXTENSION,
    };
}

#[cfg(test)]
mod tests;
