pub mod io;
pub mod conversion;
pub mod math;

use crate::environment::prelude::{NativeArity, NativeFunction};

/// Every builtin, ready to be bound in the global scope.
pub fn catalog() -> Vec<NativeFunction> {
    vec![
        NativeFunction::new("DRUCKE", NativeArity::Range { min: 0, max: None }, io::print),
        NativeFunction::new("ZEIGE", NativeArity::Range { min: 0, max: None }, io::print),
        NativeFunction::new("LESE", NativeArity::Range { min: 0, max: Some(1) }, io::read),
        NativeFunction::new("ZU_WORT", NativeArity::Exact(1), conversion::to_string),
        NativeFunction::new("ZU_GANZ", NativeArity::Exact(1), conversion::to_integer),
        NativeFunction::new("ZU_KOMMA", NativeArity::Exact(1), conversion::to_float),
        NativeFunction::new("WURZEL", NativeArity::Exact(1), math::sqrt),
        NativeFunction::new("POTENZ", NativeArity::Exact(2), math::pow),
        NativeFunction::new("ABS", NativeArity::Exact(1), math::abs),
        NativeFunction::new("RUNDEN", NativeArity::Range { min: 1, max: Some(2) }, math::round),
        NativeFunction::new("ZUFALLSZAHL", NativeArity::Exact(0), math::random),
        NativeFunction::new("ZUFALLSBEREICH", NativeArity::Exact(2), math::random_range),
    ]
}

pub mod prelude {
    pub use super::catalog;
}

#[cfg(test)]
mod tests;
