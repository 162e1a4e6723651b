use std::{
    collections::VecDeque,
    io::{BufRead, Write},
    sync::{Arc, RwLock},
};

/// Where a running program writes its output and reads its input from.
pub trait ConsoleIO {
    fn write_text(&self, text: &str);

    /// One line of input without the line terminator, `None` at end of input.
    fn read_line(&self) -> Option<String>;

    fn write_line(&self, text: &str) {
        self.write_text(text);
        self.write_text("\n");
    }
}

/// Process stdout and stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsoleIO;

impl ConsoleIO for StdConsoleIO {
    fn write_text(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // a closed stdout is not an error of the running program
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn read_line(&self) -> Option<String> {
        let mut line = String::new();

        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NullConsoleIO;

impl ConsoleIO for NullConsoleIO {
    fn write_text(&self, _text: &str) {}

    fn read_line(&self) -> Option<String> {
        None
    }
}

/// Records everything written and answers reads from a queue; used by tests
/// and by embedders that want to capture program output.
#[derive(Debug, Default, Clone)]
pub struct VectorConsoleIO {
    pub output: Arc<RwLock<Vec<String>>>,
    pub input: Arc<RwLock<VecDeque<String>>>,
}

impl VectorConsoleIO {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        console.input_lock().extend(lines.into_iter().map(Into::into));
        console
    }

    /// Everything written so far, concatenated. Clears the record.
    pub fn take(&self) -> String {
        let mut output = self.output_lock();
        std::mem::take(&mut *output).concat()
    }

    /// Written text split into lines. Does not clear the record.
    pub fn lines(&self) -> Vec<String> {
        let output = self.output.read().expect("Vector lock poisoned");

        output.concat()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn reset(&self) {
        self.output_lock().clear();
    }

    fn output_lock(&self) -> std::sync::RwLockWriteGuard<'_, Vec<String>> {
        self.output.write().expect("Vector lock poisoned")
    }

    fn input_lock(&self) -> std::sync::RwLockWriteGuard<'_, VecDeque<String>> {
        self.input.write().expect("Vector lock poisoned")
    }
}

impl ConsoleIO for VectorConsoleIO {
    fn write_text(&self, text: &str) {
        self.output_lock().push(text.to_string());
    }

    fn read_line(&self) -> Option<String> {
        self.input_lock().pop_front()
    }
}
