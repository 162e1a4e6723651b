use std::{
    io::Write,
    path::{Path, PathBuf},
};

use gerlang_core::{
    driver::locate,
    environment::prelude::Value,
    interpreter::prelude::{Interpreter, InterpreterConfig},
    parser::prelude::{parse_module, Program, SyntaxError},
    utils::prelude::Error,
};

use crate::cli::print_error;

const PROMPT: &str = "gerlang> ";
const INPUT_NAME: &str = "<eingabe>";
const EXIT_WORDS: [&str; 4] = ["ENDE", "EXIT", "QUIT", ".exit"];
pub const GOODBYE: &str = "Auf Wiedersehen! 👋";

pub fn start(max_call_depth: usize) -> std::io::Result<()> {
	if let Err(error) = ctrlc::set_handler(|| {
		println!("\n{GOODBYE}");
		std::process::exit(0);
	}) {
		tracing::warn!(%error, "could not install interrupt handler");
	}

	println!("GerLang REPL (Read-Eval-Print-Loop)");
	println!("Gib 'ENDE' ein zum Beenden\n");

	let mut interpreter = Interpreter::new(InterpreterConfig {
		max_call_depth,
		current_file: None,
	});
	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			println!("\n{GOODBYE}");
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.trim() {
			"" => {},
			word if EXIT_WORDS.contains(&word) => {
				println!("{GOODBYE}");
				return Ok(());
			},
			_ => evaluate(&mut interpreter, &input),
		}
	}
}

/// A line like `1 + 2` is accepted as if it ended with `;`.
fn parse_line(input: &str) -> Result<Program, SyntaxError> {
	let error = match parse_module(input) {
		Ok(program) => return Ok(program),
		Err(error) => error,
	};

	let trimmed = input.trim_end();
	if trimmed.ends_with([';', '}']) {
		return Err(error);
	}

	parse_module(&format!("{trimmed};")).map_err(|_| error)
}

fn evaluate(interpreter: &mut Interpreter, input: &str) {
	let program = match parse_line(input) {
		Ok(program) => program,
		Err(error) => {
			print_error(&Error::Syntax {
				path: PathBuf::from(INPUT_NAME),
				src: input.to_string(),
				error,
			});
			return;
		}
	};

	match interpreter.evaluate_line(&program) {
		Ok(Some(Value::Null)) | Ok(None) => {},
		Ok(Some(value)) => println!("{value}"),
		Err(error) => print_error(&locate(Path::new(INPUT_NAME), input, error)),
	}
}
