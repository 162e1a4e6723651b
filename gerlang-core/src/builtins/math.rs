use rand::Rng;

use crate::{
    environment::prelude::{NativeError, Value},
    utils::prelude::ConsoleIO,
};

/// Numeric argument at `position` (1-based); booleans and numeric strings are accepted.
fn number(arguments: &[Value], position: usize) -> Result<f64, NativeError> {
    let value = &arguments[position - 1];

    let number = match value {
        Value::Integer(number) => Some(*number as f64),
        Value::Float(number) => Some(*number),
        Value::Boolean(flag) => Some(f64::from(u8::from(*flag))),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.ok_or(NativeError::ArgumentType {
        position,
        expected: "Zahl",
        got: value.type_name(),
    })
}

fn integer(arguments: &[Value], position: usize) -> Result<i64, NativeError> {
    if let Value::Integer(number) = &arguments[position - 1] {
        return Ok(*number);
    }

    let number = number(arguments, position)?.trunc();

    if number.is_finite() && number >= i64::MIN as f64 && number < i64::MAX as f64 {
        Ok(number as i64)
    } else {
        Err(NativeError::domain(format!("{number} ist keine gültige Ganzzahl")))
    }
}

pub fn sqrt(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let value = number(arguments, 1)?;

    if value < 0.0 {
        return Err(NativeError::domain("Quadratwurzel aus negativer Zahl nicht möglich"));
    }

    Ok(Value::Float(value.sqrt()))
}

pub fn pow(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let base = number(arguments, 1)?;
    let exponent = number(arguments, 2)?;

    Ok(Value::Float(base.powf(exponent)))
}

pub fn abs(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    Ok(Value::Float(number(arguments, 1)?.abs()))
}

/// Rounds half away from zero to the given number of digits (default 0).
pub fn round(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let value = number(arguments, 1)?;
    let digits = match arguments.get(1) {
        Some(_) => integer(arguments, 2)?,
        None => 0,
    };

    let digits = digits.clamp(-308, 308) as i32;
    let factor = 10f64.powi(digits.abs());

    let rounded = if digits >= 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    };

    // overflowed: nothing left to round
    Ok(Value::Float(if rounded.is_finite() { rounded } else { value }))
}

/// Uniform in `[0, 1)`.
pub fn random(_: &dyn ConsoleIO, _: &[Value]) -> Result<Value, NativeError> {
    Ok(Value::Float(rand::thread_rng().gen::<f64>()))
}

/// Uniform integer in `[min, max]`.
pub fn random_range(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let min = integer(arguments, 1)?;
    let max = integer(arguments, 2)?;

    if min > max {
        return Err(NativeError::domain("min darf nicht größer als max sein"));
    }

    Ok(Value::Integer(rand::thread_rng().gen_range(min..=max)))
}
