#![doc = include_str!("../README.md")]

mod span;
pub use span::{Position, Span};

mod dialect;
pub use dialect::{Dialect, DialectKind};

mod event;
pub use event::{Event, EventKind, Lexeme, ReadState};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod reader;
pub use reader::Reader;
