use crate::{
    environment::prelude::{NativeError, Value},
    utils::prelude::ConsoleIO,
};

/// `DRUCKE(...)` and `ZEIGE(...)`: arguments joined by a space.
pub fn print(console: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    let line = arguments.iter()
        .map(|argument| argument.to_string())
        .collect::<Vec<String>>()
        .join(" ");

    console.write_line(&line);
    Ok(Value::Null)
}

/// `LESE([prompt])`: one line of input, empty at end of input.
pub fn read(console: &dyn ConsoleIO, arguments: &[Value]) -> Result<Value, NativeError> {
    if let Some(prompt) = arguments.first() {
        console.write_text(&prompt.to_plain_string());
    }

    Ok(Value::String(console.read_line().unwrap_or_default()))
}
