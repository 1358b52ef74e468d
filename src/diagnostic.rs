// Copyright 2026 Cornell University
// released under MIT License

use std::io::Write;

use clap::ColorChoice;
use codespan_reporting::diagnostic::{
    Diagnostic as CodespanDiagnostic, Label as CodespanLabel, LabelStyle, Severity,
};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::errors::MalformedRecordError;
use crate::scoreboard::Mismatch;

/// Severity of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
}

/// A label representing a line of a trace file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub message: Option<String>,
    pub range: (usize, usize),
}

impl Label {
    fn to_codespan_label(&self, fileid: usize) -> CodespanLabel<usize> {
        CodespanLabel::new(LabelStyle::Primary, fileid, self.range.0..self.range.1)
            .with_message(self.message.clone().unwrap_or_default())
    }
}

/// Diagnostic about a trace file, optionally pointing at a line in it
pub struct Diagnostic {
    title: String,
    message: String,
    level: Level,
    location: Option<(usize, Label)>,
}

impl Diagnostic {
    pub fn emit(&self, buffer: &mut Buffer, files: &SimpleFiles<String, String>) {
        if let Some((fileid, label)) = &self.location {
            let severity = match self.level {
                Level::Error => Severity::Error,
                Level::Warning => Severity::Warning,
            };

            let diagnostic = CodespanDiagnostic::new(severity)
                .with_message(&self.title)
                .with_labels(vec![label.to_codespan_label(*fileid)])
                .with_notes(vec![self.message.clone()]);

            let config = term::Config::default();
            term::emit(buffer, &config, files, &diagnostic).expect("Failed to write diagnostic");
        } else {
            let color = match self.level {
                Level::Error => Color::Red,
                Level::Warning => Color::Yellow,
            };

            buffer
                .set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))
                .expect("Failed to set color");
            write!(buffer, "{}", self.title).expect("Failed to write title");
            buffer
                .set_color(&ColorSpec::new())
                .expect("Failed to reset color");
            writeln!(buffer, ": {}", self.message).expect("Failed to write message");
        }
    }
}

/// Renders diagnostics about stimulus and response traces.
/// Everything emitted is printed to stdout and also kept for `error_string`.
pub struct DiagnosticHandler {
    files: SimpleFiles<String, String>,
    color_choice: ColorChoice,
    /// whether warnings (e.g. skipped lines) are shown at all
    emit_warnings: bool,
    output: String,
}

impl Default for DiagnosticHandler {
    fn default() -> Self {
        Self::new(ColorChoice::Auto, true)
    }
}

impl DiagnosticHandler {
    pub fn new(color_choice: ColorChoice, emit_warnings: bool) -> Self {
        Self {
            files: SimpleFiles::new(),
            color_choice,
            emit_warnings,
            output: String::new(),
        }
    }

    pub fn add_file(&mut self, name: String, content: String) -> usize {
        self.files.add(name, content)
    }

    /// Everything emitted so far
    pub fn error_string(&self) -> &str {
        &self.output
    }

    fn buffer(&self) -> Buffer {
        match self.color_choice {
            ColorChoice::Never => Buffer::no_color(),
            _ => Buffer::ansi(),
        }
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level == Level::Warning && !self.emit_warnings {
            return;
        }
        let buffer = &mut self.buffer();
        diagnostic.emit(buffer, &self.files);
        let rendered = String::from_utf8_lossy(buffer.as_slice()).to_string();
        print!("{}", rendered);
        self.output.push_str(&rendered);
    }

    /// Warns about a line that was skipped while parsing the trace `fileid`
    pub fn emit_malformed(&mut self, fileid: usize, err: &MalformedRecordError) {
        let label = Label {
            message: Some(format!("found {} field(s)", err.found)),
            range: err.span,
        };
        self.emit(Diagnostic {
            title: "malformed record skipped".to_string(),
            message: format!("expected at least {} fields", err.expected),
            level: Level::Warning,
            location: Some((fileid, label)),
        });
    }

    /// Reports the first mismatch; value mismatches point at the response
    /// line in `response_fileid`
    pub fn emit_mismatch(&mut self, response_fileid: usize, mismatch: &Mismatch) {
        let diagnostic = match mismatch {
            Mismatch::Value {
                index,
                expected,
                actual,
            } => Diagnostic {
                title: format!("first mismatch at read #{}", index),
                message: format!("the golden model expected {}", expected),
                level: Level::Error,
                location: Some((
                    response_fileid,
                    Label {
                        message: Some(format!("DUT returned {}", actual.value)),
                        range: actual.span,
                    },
                )),
            },
            Mismatch::Count { expected, actual } => Diagnostic {
                title: "read count mismatch".to_string(),
                message: format!("expected {} reads, got {}", expected, actual),
                level: Level::Error,
                location: None,
            },
        };
        self.emit(diagnostic);
    }
}
