mod cli;
mod repl;

use std::{path::PathBuf, rc::Rc, time::Instant};

use clap::Parser;
use cli::{print_error, print_finished, print_lexing, print_parsing, print_running};
use gerlang_core::{
    driver::{exit_code, lex_file, parse_file, run_file},
    interpreter::prelude::{DEFAULT_MAX_CALL_DEPTH, MODULE_EXTENSION},
    lexer::prelude::{str_to_keyword, KEYWORDS},
    utils::prelude::StdConsoleIO,
};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "GERLANG_LOG";

/// Parsing deeply nested source recurses on the native stack.
const WORKER_STACK_SIZE: usize = 64 * 1024 * 1024;

#[derive(Parser)]
#[command(name = "gerlang", version, about = "GerLang - Die deutsche Programmiersprache")]
enum Command {
    /// Runs a program file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Maximum number of nested function calls
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,
        /// Do not print status lines
        #[arg(short, long, default_value_t = false)]
        quiet: bool,
    },
    /// Prints the tokens of a source file
    Lex {
        /// Path of source file
        path: PathBuf,
        /// Print the source code before the tokens
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Parses a source file and prints the program
    Parse {
        /// Path of source file
        path: PathBuf,
        /// Print ast instead of parsed source code
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
    /// Runs Read Eval Print Loop
    Repl {
        /// Maximum number of nested function calls
        #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,
    },
    /// Shows keywords and version
    Info,
}

fn main() {
    init_tracing();

    let code = match Command::parse() {
        Command::Run { path, max_depth, quiet } => on_worker(move || run(path, max_depth, quiet)),
        Command::Lex { path, verbose } => lex(path, verbose),
        Command::Parse { path, print_ast } => on_worker(move || parse(path, print_ast)),
        Command::Repl { max_depth } => on_worker(move || match repl::start(max_depth) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("{error}");
                1
            },
        }),
        Command::Info => {
            info();
            0
        },
    };

    std::process::exit(code);
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs `task` on a thread with a large stack and returns its exit code.
fn on_worker(task: impl FnOnce() -> i32 + Send + 'static) -> i32 {
    let worker = std::thread::Builder::new()
        .name("gerlang".into())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(task);

    match worker.map(|handle| handle.join()) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => 101,
        Err(error) => {
            eprintln!("{error}");
            1
        },
    }
}

fn run(path: PathBuf, max_depth: usize, quiet: bool) -> i32 {
    if !quiet {
        print_running(&path.display().to_string());
    }
    let start = Instant::now();

    match run_file(&path, max_depth, Rc::new(StdConsoleIO)) {
        Ok(result) => {
            if !quiet {
                print_finished(Instant::now() - start);
            }

            exit_code(result.as_ref())
        },
        Err(error) => {
            print_error(&error);
            error.exit_code()
        },
    }
}

fn lex(path: PathBuf, verbose: bool) -> i32 {
    print_lexing(&path.display().to_string());

    let (src, tokens) = match lex_file(&path) {
        Ok(lexed) => lexed,
        Err(error) => {
            print_error(&error);
            return error.exit_code();
        },
    };

    if verbose {
        println!("{src}");
        println!("{}", "-".repeat(50));
    }

    for token in &tokens {
        let text = if token.is_eof() { "<ende>" } else { token.lexeme.as_str() };

        println!(
            "{:<24} | {:<20} | Zeile {:>2}, Spalte {:>2}",
            token.kind.name(),
            text,
            token.position.line,
            token.position.column,
        );
    }

    println!("\n{} Tokens erkannt.", tokens.len());
    0
}

fn parse(path: PathBuf, print_ast: bool) -> i32 {
    print_parsing(&path.display().to_string());

    match parse_file(&path) {
        Ok((_, program)) => {
            if print_ast {
                println!("{program:#?}");
            } else {
                println!("{program}");
            }
            0
        },
        Err(error) => {
            print_error(&error);
            error.exit_code()
        },
    }
}

fn info() {
    println!("GerLang - Die deutsche Programmiersprache");
    println!("\nUnterstützte Keywords:");

    for word in KEYWORDS {
        let kind = str_to_keyword(word).map(|kind| kind.name()).unwrap_or_default();
        println!("  {word:<12} -> {kind}");
    }

    println!("\nDateierweiterung: .{MODULE_EXTENSION}");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
