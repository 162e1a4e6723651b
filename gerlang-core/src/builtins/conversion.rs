use crate::{
    environment::prelude::{NativeError, Value},
    utils::prelude::ConsoleIO,
};

fn conversion_error(value: &Value, target: &'static str) -> NativeError {
    NativeError::Conversion { value: value.to_plain_string(), target }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

pub fn to_string(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    Ok(Value::String(arguments[0].to_plain_string()))
}

/// Truncates floats and numeric strings; `JA`/`NEIN` become 1/0, `NIX` 0.
pub fn to_integer(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let value = &arguments[0];

    let truncate = |number: f64| {
        let number = number.trunc();

        // the cast saturates, so range has to be checked first
        if number.is_finite() && number >= i64::MIN as f64 && number < i64::MAX as f64 {
            Ok(Value::Integer(number as i64))
        } else {
            Err(conversion_error(value, "GANZ"))
        }
    };

    match value {
        Value::Integer(number) => Ok(Value::Integer(*number)),
        Value::Float(number) => truncate(*number),
        Value::String(text) => match text.trim().parse::<i64>() {
            Ok(number) => Ok(Value::Integer(number)),
            Err(_) => parse_number(text)
                .ok_or_else(|| conversion_error(value, "GANZ"))
                .and_then(truncate),
        },
        Value::Boolean(flag) => Ok(Value::Integer(i64::from(*flag))),
        Value::Null => Ok(Value::Integer(0)),
        _ => Err(conversion_error(value, "GANZ")),
    }
}

pub fn to_float(_: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let value = &arguments[0];

    let number = match value {
        Value::Integer(number) => *number as f64,
        Value::Float(number) => *number,
        Value::String(text) => parse_number(text).ok_or_else(|| conversion_error(value, "KOMMA"))?,
        Value::Boolean(flag) => f64::from(u8::from(*flag)),
        Value::Null => 0.0,
        _ => return Err(conversion_error(value, "KOMMA")),
    };

    Ok(Value::Float(number))
}
