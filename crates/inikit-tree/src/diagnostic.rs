//! Diagnostic rendering for load errors.

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use inikit_parse::{ParseError, ParseErrorKind};

use crate::Error;

impl Error {
    /// Render this error with ariadne.
    ///
    /// Returns a string containing the formatted error message with source context.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        if self.write_report(filename, source, &mut output).is_err() {
            return self.to_string();
        }
        String::from_utf8(output).unwrap_or_else(|_| self.to_string())
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(
        &self,
        filename: &str,
        source: &str,
        writer: W,
    ) -> std::io::Result<()> {
        let report = match self {
            Error::Parse(err) => build_parse_report(err, filename),
            _ => Report::build(ReportKind::Error, (filename, 0..0)).with_message(self.to_string()),
        };
        report
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .finish()
            .write((filename, Source::from(source)), writer)
    }
}

fn build_parse_report<'a>(
    err: &ParseError,
    filename: &'a str,
) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
    let range: std::ops::Range<usize> = err.span.into();

    let (label, help): (&str, Option<String>) = match &err.kind {
        ParseErrorKind::UnterminatedSection => (
            "section header opened here",
            Some("close the section name with ']'".into()),
        ),
        ParseErrorKind::MissingAssignment => (
            "expected an assignment delimiter in this line",
            Some("separate the key from its value, as in `key = value`".into()),
        ),
        ParseErrorKind::UnterminatedQuote => (
            "quote opened here",
            Some("add the closing quote on the same line".into()),
        ),
        ParseErrorKind::PrematureEndOfFile => (
            "this continues onto a line that does not exist",
            Some("remove the trailing '\\' or add the continued line".into()),
        ),
        ParseErrorKind::DuplicateSection(_) => (
            "section declared again here",
            Some("merge both sections into one".into()),
        ),
        ParseErrorKind::DialectMismatch { marker } => (
            "not a comment in this dialect",
            Some(format!(
                "'{marker}' starts a comment in other dialects; load the file with the dialect it was written in"
            )),
        ),
        ParseErrorKind::UnexpectedContent => (
            "unexpected",
            Some("only a comment may follow here".into()),
        ),
        ParseErrorKind::KeyOutsideSection => (
            "key before the first section",
            Some("add a `[section]` header above this key".into()),
        ),
        ParseErrorKind::Io { .. } => ("read failed here", None),
    };

    let report = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_message(err.kind.to_string())
        .with_label(
            Label::new((filename, range))
                .with_message(label)
                .with_color(Color::Red),
        );
    match help {
        Some(help) => report.with_help(help),
        None => report,
    }
}
