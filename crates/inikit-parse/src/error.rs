//! Parse errors.

use crate::{Position, Span};

/// Parse error kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// `[` without a matching `]` on the same line.
    UnterminatedSection,
    /// Key line without an assignment delimiter.
    MissingAssignment,
    /// Opening quote without a closing quote before end of line.
    UnterminatedQuote,
    /// Input ended while a line continuation was pending.
    PrematureEndOfFile,
    /// A section header repeated where the dialect forbids it.
    DuplicateSection(String),
    /// The line starts with a comment marker of another dialect.
    DialectMismatch { marker: char },
    /// Text after a closing `]` or closing quote that is neither whitespace
    /// nor a comment.
    UnexpectedContent,
    /// A key appeared before any section header.
    KeyOutsideSection,
    /// The underlying stream failed (including invalid UTF-8).
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl ParseErrorKind {
    /// Stable name of the kind, without payload.
    pub fn name(&self) -> &'static str {
        match self {
            ParseErrorKind::UnterminatedSection => "UnterminatedSection",
            ParseErrorKind::MissingAssignment => "MissingAssignment",
            ParseErrorKind::UnterminatedQuote => "UnterminatedQuote",
            ParseErrorKind::PrematureEndOfFile => "PrematureEndOfFile",
            ParseErrorKind::DuplicateSection(_) => "DuplicateSection",
            ParseErrorKind::DialectMismatch { .. } => "DialectMismatch",
            ParseErrorKind::UnexpectedContent => "UnexpectedContent",
            ParseErrorKind::KeyOutsideSection => "KeyOutsideSection",
            ParseErrorKind::Io { .. } => "Io",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::UnterminatedSection => write!(f, "unterminated section header"),
            ParseErrorKind::MissingAssignment => write!(f, "expected an assignment delimiter"),
            ParseErrorKind::UnterminatedQuote => write!(f, "unterminated quoted value"),
            ParseErrorKind::PrematureEndOfFile => {
                write!(f, "unexpected end of input in a continued line")
            }
            ParseErrorKind::DuplicateSection(name) => write!(f, "duplicate section `{name}`"),
            ParseErrorKind::DialectMismatch { marker } => {
                write!(f, "`{marker}` is not a comment marker in this dialect")
            }
            ParseErrorKind::UnexpectedContent => write!(f, "unexpected content"),
            ParseErrorKind::KeyOutsideSection => write!(f, "key outside of any section"),
            ParseErrorKind::Io { message, .. } => write!(f, "read failed: {message}"),
        }
    }
}

/// A parse error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, position: Position, span: Span) -> Self {
        Self {
            kind,
            position,
            span,
        }
    }

    /// 1-based line of the error.
    pub fn line_number(&self) -> u32 {
        self.position.line
    }

    /// 1-based column of the error.
    pub fn line_position(&self) -> u32 {
        self.position.column
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.position)
    }
}

impl std::error::Error for ParseError {}
