use std::path::{Path, PathBuf};

use codespan_reporting::{
    diagnostic::{Label as CodespanLabel, LabelStyle, Severity},
    files::SimpleFiles,
};
use termcolor::Buffer;

use super::src_span::{Position, SrcSpan};

pub struct Label {
    pub text: Option<String>,
    pub span: SrcSpan,
}

impl Label {
    /// Spans are clamped to `len`, the source may end before a span recorded elsewhere.
    pub fn to_codespan_label(&self, file_id: usize, len: usize) -> CodespanLabel<usize> {
        let start = (self.span.start as usize).min(len);
        let end = (self.span.end as usize).clamp(start, len);

        let label = CodespanLabel::new(LabelStyle::Primary, file_id, start..end);

        match &self.text {
            None => label,
            Some(text) => label.with_message(text.clone()),
        }
    }
}

pub struct Location<'a> {
    pub src: &'a str,
    pub path: PathBuf,
    pub position: Position,
    pub label: Label,
}

/// Structured error record. `to_diagnostics` produces these, `write` renders
/// one of them.
pub struct Diagnostic<'a> {
    pub code: &'static str,
    pub title: String,
    pub message: String,
    pub hint: Option<String>,
    /// Innermost call first.
    pub stack_trace: Vec<String>,
    pub location: Option<Location<'a>>,
}

impl<'a> Diagnostic<'a> {
    pub fn file(&self) -> Option<&Path> {
        self.location.as_ref().map(|location| location.path.as_path())
    }

    pub fn line(&self) -> Option<u32> {
        self.location.as_ref().map(|location| location.position.line)
    }

    pub fn column(&self) -> Option<u32> {
        self.location.as_ref().map(|location| location.position.column)
    }

    fn notes(&self) -> Vec<String> {
        let mut notes = vec![];

        if let Some(hint) = &self.hint {
            notes.push(format!("Tipp: {hint}"));
        }

        if !self.stack_trace.is_empty() {
            let trace = std::iter::once("Aufrufstapel:".to_string())
                .chain(self.stack_trace.iter().map(|frame| format!("  {frame}")))
                .collect::<Vec<String>>()
                .join("\n");

            notes.push(trace);
        }

        notes
    }

    pub fn write(&self, buf: &mut Buffer) {
        use std::io::Write;

        match &self.location {
            Some(location) => self.write_span(location, buf),
            None => {
                self.write_title(buf);

                if !self.message.is_empty() {
                    writeln!(buf, "{}", self.message).expect("text write");
                }

                for note in self.notes() {
                    writeln!(buf, "= {note}").expect("note write");
                }
            },
        }
    }

    pub fn write_span(&self, location: &Location, buf: &mut Buffer) {
        let mut files = SimpleFiles::new();

        let location_path = location.path.to_string_lossy();
        let file_id = files.add(location_path, location.src);

        let label = location.label.to_codespan_label(file_id, location.src.len());

        let diagnostic = codespan_reporting::diagnostic::Diagnostic::new(Severity::Error)
            .with_code(self.code)
            .with_message(&self.title)
            .with_labels(vec![label])
            .with_notes(self.notes());

        let config = codespan_reporting::term::Config::default();
        codespan_reporting::term::emit(buf, &config, &files, &diagnostic)
            .expect("write_diagnostic");
    }

    pub fn write_title(&self, buf: &mut Buffer) {
        use std::io::Write;
        use termcolor::{Color, ColorSpec, WriteColor};

        buf.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Red)))
            .expect("write_title_color1");
        write!(buf, "Fehler[{}]", self.code).expect("write_title_kind");

        buf.set_color(ColorSpec::new().set_bold(true))
            .expect("write_title_color2");
        write!(buf, ": {}\n\n", self.title).expect("write_title_title");

        buf.set_color(&ColorSpec::new())
            .expect("write_title_reset");
    }
}
