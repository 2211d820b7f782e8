//! Line-by-line INI output.

use std::io::{self, Write};

use inikit_tree::{Item, Section};
use tracing::debug;

use crate::options::WriteOptions;
use crate::value::{ValueStyle, value_style};

/// Writes INI lines in the delimiters of a dialect.
pub struct IniWriter<W> {
    out: W,
    options: WriteOptions,
}

impl<W: Write> IniWriter<W> {
    pub fn new(out: W, options: WriteOptions) -> Self {
        Self { out, options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// A comment line: the primary comment marker, then `text`.
    pub fn write_comment(&mut self, text: &str) -> io::Result<()> {
        self.write_comment_text(Some(text))?;
        self.end_line()
    }

    pub fn write_blank(&mut self) -> io::Result<()> {
        self.end_line()
    }

    /// A `[name]` header with an optional trailing comment.
    pub fn write_section(&mut self, name: &str, comment: Option<&str>) -> io::Result<()> {
        reject_line_break("section name", name)?;
        if name.contains(']') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("section name `{name}` contains ']'"),
            ));
        }
        write!(self.out, "[{name}]")?;
        self.write_trailing_comment(comment)?;
        self.end_line()
    }

    /// A `key = value` line with an optional trailing comment.
    ///
    /// Keys and values that would read back differently are `InvalidInput`.
    /// A comment the dialect cannot carry after this value is left off.
    pub fn write_key(&mut self, key: &str, value: &str, comment: Option<&str>) -> io::Result<()> {
        reject_line_break("key", key)?;
        reject_line_break("value", value)?;
        self.check_key(key)?;
        let dialect = &self.options.dialect;

        let assign = dialect.primary_assign();
        let written = match value_style(value, dialect, comment.is_some()) {
            ValueStyle::Bare => value.to_string(),
            ValueStyle::Quoted(quote) => format!("{quote}{value}{quote}"),
            ValueStyle::BareWithoutComment => {
                if let Some(comment) = comment {
                    debug!("Dropping comment {comment:?} on {key:?}: not representable in this dialect");
                }
                return self.write_assignment(key, assign, value, None);
            }
            ValueStyle::Unrepresentable => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("value {value:?} of key `{key}` cannot be written in this dialect"),
                ));
            }
        };
        self.write_assignment(key, assign, &written, comment)
    }

    pub fn write_item(&mut self, item: &Item) -> io::Result<()> {
        match item {
            Item::Comment(text) => self.write_comment(text),
            Item::Blank => self.write_blank(),
            Item::KeyValue {
                key,
                value,
                comment,
            } => self.write_key(key, value, comment.as_deref()),
        }
    }

    /// A section header followed by all of its items.
    pub fn write_section_with_items(&mut self, section: &Section) -> io::Result<()> {
        self.write_section(section.name(), section.comment())?;
        for item in section.items() {
            self.write_item(item)?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_assignment(
        &mut self,
        key: &str,
        assign: char,
        written: &str,
        comment: Option<&str>,
    ) -> io::Result<()> {
        if self.options.pad_assign {
            write!(self.out, "{key} {assign} ")?;
        } else {
            write!(self.out, "{key}{assign}")?;
        }
        self.out.write_all(written.as_bytes())?;
        // `key = ` already ends in a space.
        if written.is_empty() && self.options.pad_assign {
            self.write_comment_text(comment)?;
        } else {
            self.write_trailing_comment(comment)?;
        }
        self.end_line()
    }

    /// A key must come back from the reader as itself.
    fn check_key(&self, key: &str) -> io::Result<()> {
        let dialect = &self.options.dialect;
        let problem = if key.trim().is_empty() {
            Some("is empty")
        } else if key.trim() != key {
            Some("has surrounding whitespace")
        } else if key.starts_with('[') {
            Some("starts with '['")
        } else if key.chars().any(|c| dialect.is_assign(c)) {
            Some("contains an assignment delimiter")
        } else if key.starts_with(|c| dialect.is_comment(c)) {
            Some("starts with a comment delimiter")
        } else if dialect.accept_comment_after_key() && key.chars().any(|c| dialect.is_comment(c))
        {
            Some("contains a comment delimiter")
        } else {
            None
        };
        match problem {
            Some(problem) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("key {key:?} {problem}"),
            )),
            None => Ok(()),
        }
    }

    fn write_trailing_comment(&mut self, comment: Option<&str>) -> io::Result<()> {
        if comment.is_some() {
            self.out.write_all(b" ")?;
        }
        self.write_comment_text(comment)
    }

    fn write_comment_text(&mut self, comment: Option<&str>) -> io::Result<()> {
        let Some(comment) = comment else {
            return Ok(());
        };
        reject_line_break("comment", comment)?;
        let comment = comment.trim();
        let marker = self.options.dialect.primary_comment();
        if comment.is_empty() {
            write!(self.out, "{marker}")
        } else {
            write!(self.out, "{marker} {comment}")
        }
    }

    fn end_line(&mut self) -> io::Result<()> {
        self.out
            .write_all(self.options.line_ending.as_str().as_bytes())
    }
}

fn reject_line_break(what: &str, text: &str) -> io::Result<()> {
    if text.contains(['\n', '\r']) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{what} {text:?} contains a line break"),
        ));
    }
    Ok(())
}
