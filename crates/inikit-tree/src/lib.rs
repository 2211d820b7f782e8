#![doc = include_str!("../README.md")]

mod builder;
mod diagnostic;
mod document;
mod error;
mod section;

pub use builder::DocumentBuilder;
pub use document::Document;
pub use error::Error;
pub use inikit_parse::{Dialect, DialectKind, ParseError, ParseErrorKind};
pub use section::{Item, Section};

/// Parse a standard-dialect INI document.
pub fn parse(source: &str) -> Result<Document, Error> {
    Document::parse(source)
}
