//! Event types produced by the reader.

use crate::{Position, Span};

/// One lexical event, produced per logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A blank line (`comment: None`) or a comment-only line.
    ///
    /// A bare comment marker yields `Some("")`.
    Empty {
        comment: Option<String>,
    },
    /// A `[name]` header, with the trailing comment if there was one.
    Section {
        name: String,
        comment: Option<String>,
    },
    /// A key, its value (possibly joined across continuation lines) and the
    /// trailing comment if the dialect split one off.
    Key {
        name: String,
        value: String,
        comment: Option<String>,
    },
}

/// Discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Empty,
    Section,
    Key,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Empty { .. } => EventKind::Empty,
            Event::Section { .. } => EventKind::Section,
            Event::Key { .. } => EventKind::Key,
        }
    }

    /// Section or key name; empty for [`Event::Empty`].
    pub fn name(&self) -> &str {
        match self {
            Event::Empty { .. } => "",
            Event::Section { name, .. } | Event::Key { name, .. } => name,
        }
    }

    /// Key value; empty for sections and empty lines.
    pub fn value(&self) -> &str {
        match self {
            Event::Key { value, .. } => value,
            _ => "",
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Event::Empty { comment }
            | Event::Section { comment, .. }
            | Event::Key { comment, .. } => comment.as_deref(),
        }
    }

    pub(crate) fn clear_comment(&mut self) {
        match self {
            Event::Empty { comment }
            | Event::Section { comment, .. }
            | Event::Key { comment, .. } => *comment = None,
        }
    }
}

/// An event together with where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub event: Event,
    /// Line and column of the first non-blank character (column 1 for blank lines).
    pub position: Position,
    /// Bytes covered, from the start of the first line to the end of the last
    /// line consumed (continuations included), excluding the line terminator.
    pub span: Span,
}

/// Lifecycle of a [`Reader`](crate::Reader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadState {
    /// Nothing read yet.
    #[default]
    Initial,
    /// At least one event has been read and more may follow.
    Interactive,
    /// The input is exhausted.
    EndOfInput,
    /// A parse error was returned; the reader produces nothing further.
    Error,
}
