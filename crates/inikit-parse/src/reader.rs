//! Cursor reader for INI-family sources.

use std::collections::HashSet;
use std::io::BufRead;

use tracing::trace;

use crate::{
    Dialect, Event, EventKind, Lexeme, ParseError, ParseErrorKind, Position, ReadState, Span,
};

/// Comment markers used by at least one preset. A key line starting with one
/// of these that the active dialect does not treat as a comment was most
/// likely written in another dialect.
const KNOWN_COMMENT_MARKERS: [char; 2] = [';', '#'];

/// A pull parser producing one [`Lexeme`] per logical line.
///
/// Drive it with [`advance`](Reader::advance) and inspect the current event
/// through the accessors, or use it as an iterator of
/// `Result<Lexeme, ParseError>`. After an error the reader is fused.
///
/// ```
/// use inikit_parse::{Dialect, EventKind, Reader};
///
/// let mut reader = Reader::from_str("[web]\nprotocol = http\n", Dialect::standard());
/// assert!(reader.advance().unwrap());
/// assert_eq!(reader.event_kind(), Some(EventKind::Section));
/// assert!(reader.advance().unwrap());
/// assert_eq!((reader.name(), reader.value()), ("protocol", "http"));
/// assert!(!reader.advance().unwrap());
/// ```
pub struct Reader<R> {
    source: R,
    dialect: Dialect,
    ignore_comments: bool,

    /// The physical line most recently read, without its terminator.
    line: String,
    /// 1-based number of `line`; 0 before the first read.
    line_number: u32,
    /// Byte offset of `line` in the input.
    line_start: u32,
    /// Byte offset just past the content of `line`.
    line_end: u32,
    /// Byte offset of the next line.
    next_offset: u32,

    state: ReadState,
    current: Option<Lexeme>,
    seen_sections: HashSet<String>,
}

impl<'a> Reader<&'a [u8]> {
    /// Create a reader over in-memory text.
    pub fn from_str(source: &'a str, dialect: Dialect) -> Self {
        Reader::new(source.as_bytes(), dialect)
    }
}

impl<R: BufRead> Reader<R> {
    /// Create a reader over a buffered stream.
    pub fn new(source: R, dialect: Dialect) -> Self {
        Self {
            source,
            dialect,
            ignore_comments: false,
            line: String::new(),
            line_number: 0,
            line_start: 0,
            line_end: 0,
            next_offset: 0,
            state: ReadState::Initial,
            current: None,
            seen_sections: HashSet::new(),
        }
    }

    /// Read the next event and make it current.
    ///
    /// Returns `Ok(false)` once the input is exhausted, and after an error.
    pub fn advance(&mut self) -> Result<bool, ParseError> {
        self.current = self.next_lexeme()?;
        Ok(self.current.is_some())
    }

    /// Skip events until a section header is current.
    pub fn advance_to_next_section(&mut self) -> Result<bool, ParseError> {
        while self.advance()? {
            if self.event_kind() == Some(EventKind::Section) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Skip events until a key is current.
    ///
    /// Stops with `Ok(false)` at the next section header (which is left as the
    /// current event) so that a scan never crosses into another section.
    pub fn advance_to_next_key(&mut self) -> Result<bool, ParseError> {
        while self.advance()? {
            match self.event_kind() {
                Some(EventKind::Key) => return Ok(true),
                Some(EventKind::Section) => return Ok(false),
                _ => {}
            }
        }
        Ok(false)
    }

    /// Read the next lexeme and hand it out without making it current.
    pub fn next_lexeme(&mut self) -> Result<Option<Lexeme>, ParseError> {
        if matches!(self.state, ReadState::EndOfInput | ReadState::Error) {
            return Ok(None);
        }

        match self.read_lexeme() {
            Ok(Some(mut lexeme)) => {
                if self.ignore_comments {
                    lexeme.event.clear_comment();
                }
                trace!(
                    "Lexeme {:?} at {}: {:?}",
                    lexeme.event.kind(),
                    lexeme.position,
                    lexeme.event
                );
                self.state = ReadState::Interactive;
                Ok(Some(lexeme))
            }
            Ok(None) => {
                self.state = ReadState::EndOfInput;
                Ok(None)
            }
            Err(err) => {
                trace!("Parse error: {}", err);
                self.state = ReadState::Error;
                Err(err)
            }
        }
    }

    pub fn read_state(&self) -> ReadState {
        self.state
    }

    /// The current lexeme, if the last [`advance`](Reader::advance) produced one.
    pub fn current(&self) -> Option<&Lexeme> {
        self.current.as_ref()
    }

    pub fn event_kind(&self) -> Option<EventKind> {
        self.current.as_ref().map(|l| l.event.kind())
    }

    /// Name of the current section or key; empty otherwise.
    pub fn name(&self) -> &str {
        self.current.as_ref().map_or("", |l| l.event.name())
    }

    /// Value of the current key; empty otherwise.
    pub fn value(&self) -> &str {
        self.current.as_ref().map_or("", |l| l.event.value())
    }

    pub fn comment(&self) -> Option<&str> {
        self.current.as_ref().and_then(|l| l.event.comment())
    }

    /// Line of the current event, or the number of lines read so far.
    pub fn line_number(&self) -> u32 {
        self.current
            .as_ref()
            .map_or(self.line_number, |l| l.position.line)
    }

    /// Column of the current event, or 1.
    pub fn line_position(&self) -> u32 {
        self.current.as_ref().map_or(1, |l| l.position.column)
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    pub fn ignore_comments(&self) -> bool {
        self.ignore_comments
    }

    /// Report every comment as `None`.
    pub fn set_ignore_comments(&mut self, ignore: bool) {
        self.ignore_comments = ignore;
    }

    pub fn comment_delimiters(&self) -> &[char] {
        self.dialect.comment_delimiters()
    }

    pub fn set_comment_delimiters(&mut self, delimiters: impl IntoIterator<Item = char>) {
        self.dialect.set_comment_delimiters(delimiters);
    }

    pub fn assign_delimiters(&self) -> &[char] {
        self.dialect.assign_delimiters()
    }

    pub fn set_assign_delimiters(&mut self, delimiters: impl IntoIterator<Item = char>) {
        self.dialect.set_assign_delimiters(delimiters);
    }

    pub fn quote_chars(&self) -> &[char] {
        self.dialect.quote_chars()
    }

    pub fn set_quote_chars(&mut self, quotes: impl IntoIterator<Item = char>) {
        self.dialect.set_quote_chars(quotes);
    }

    pub fn line_continuation(&self) -> bool {
        self.dialect.line_continuation()
    }

    pub fn set_line_continuation(&mut self, enabled: bool) {
        self.dialect.set_line_continuation(enabled);
    }

    pub fn accept_no_assignment(&self) -> bool {
        self.dialect.accept_no_assignment()
    }

    pub fn set_accept_no_assignment(&mut self, enabled: bool) {
        self.dialect.set_accept_no_assignment(enabled);
    }

    pub fn accept_comment_after_key(&self) -> bool {
        self.dialect.accept_comment_after_key()
    }

    pub fn set_accept_comment_after_key(&mut self, enabled: bool) {
        self.dialect.set_accept_comment_after_key(enabled);
    }

    pub fn consume_all_key_text(&self) -> bool {
        self.dialect.consume_all_key_text()
    }

    pub fn set_consume_all_key_text(&mut self, enabled: bool) {
        self.dialect.set_consume_all_key_text(enabled);
    }

    pub fn allow_duplicate_sections(&self) -> bool {
        self.dialect.allow_duplicate_sections()
    }

    pub fn set_allow_duplicate_sections(&mut self, enabled: bool) {
        self.dialect.set_allow_duplicate_sections(enabled);
    }

    /// Pull the next physical line into `self.line`. Returns `false` at end of input.
    fn next_line(&mut self) -> Result<bool, ParseError> {
        self.line.clear();
        self.line_start = self.next_offset;

        let read = self.source.read_line(&mut self.line).map_err(|e| {
            ParseError::new(
                ParseErrorKind::Io {
                    kind: e.kind(),
                    message: e.to_string(),
                },
                Position::new(self.line_number + 1, 1),
                Span::empty(self.line_start),
            )
        })?;
        if read == 0 {
            self.line_end = self.line_start;
            return Ok(false);
        }

        self.next_offset += read as u32;
        self.line_number += 1;

        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        if self.line_number == 1 && self.line.starts_with('\u{feff}') {
            self.line.drain(..'\u{feff}'.len_utf8());
            self.line_start += '\u{feff}'.len_utf8() as u32;
        }
        self.line_end = self.line_start + self.line.len() as u32;
        Ok(true)
    }

    fn read_lexeme(&mut self) -> Result<Option<Lexeme>, ParseError> {
        if !self.next_line()? {
            return Ok(None);
        }

        // Continuations refill `self.line`, so lex from a detached copy.
        let line = std::mem::take(&mut self.line);
        self.lex_line(&line).map(Some)
    }

    fn lex_line(&mut self, line: &str) -> Result<Lexeme, ParseError> {
        let line_start = self.line_start;
        let mut cursor = LineCursor::new(line);
        cursor.skip_whitespace();

        let Some(c) = cursor.peek() else {
            return Ok(Lexeme {
                event: Event::Empty { comment: None },
                position: Position::new(self.line_number, 1),
                span: Span::new(line_start, self.line_end),
            });
        };

        let position = Position::new(self.line_number, cursor.column());
        let start = line_start + cursor.pos() as u32;

        let event = if self.dialect.is_comment(c) {
            cursor.bump();
            Event::Empty {
                comment: Some(cursor.rest().trim().to_string()),
            }
        } else if c == '[' {
            self.lex_section(&mut cursor, position)?
        } else {
            self.lex_key(&mut cursor, position, line)?
        };

        Ok(Lexeme {
            event,
            position,
            span: Span::new(start, self.line_end),
        })
    }

    fn lex_section(
        &mut self,
        cursor: &mut LineCursor<'_>,
        position: Position,
    ) -> Result<Event, ParseError> {
        let open = cursor.pos();
        cursor.bump(); // `[`

        let name_start = cursor.pos();
        loop {
            match cursor.peek() {
                None => {
                    return Err(self.error(ParseErrorKind::UnterminatedSection, position, open));
                }
                Some(']') => break,
                Some(_) => {
                    cursor.bump();
                }
            }
        }
        let name = cursor.slice(name_start, cursor.pos()).trim().to_string();
        cursor.bump(); // `]`

        let comment = self.trailing_comment(cursor)?;

        if !self.seen_sections.insert(name.clone()) && !self.dialect.allow_duplicate_sections() {
            return Err(self.error(ParseErrorKind::DuplicateSection(name), position, open));
        }

        Ok(Event::Section { name, comment })
    }

    fn lex_key(
        &mut self,
        cursor: &mut LineCursor<'_>,
        position: Position,
        line: &str,
    ) -> Result<Event, ParseError> {
        let key_start = cursor.pos();
        let first = cursor.peek();

        let mut found_assign = false;
        while let Some(c) = cursor.peek() {
            if self.dialect.is_assign(c) {
                found_assign = true;
                break;
            }
            if self.dialect.accept_comment_after_key() && self.dialect.is_comment(c) {
                break;
            }
            cursor.bump();
        }
        let name = cursor.slice(key_start, cursor.pos()).trim().to_string();

        if !found_assign {
            if self.dialect.accept_no_assignment() {
                let comment = match cursor.bump() {
                    Some(_) => Some(cursor.rest().trim().to_string()),
                    None => None,
                };
                return Ok(Event::Key {
                    name,
                    value: String::new(),
                    comment,
                });
            }

            let kind = match first {
                Some(marker)
                    if KNOWN_COMMENT_MARKERS.contains(&marker)
                        && !self.dialect.is_comment(marker) =>
                {
                    ParseErrorKind::DialectMismatch { marker }
                }
                _ => ParseErrorKind::MissingAssignment,
            };
            return Err(self.error(kind, position, key_start));
        }

        cursor.bump(); // assignment delimiter
        cursor.skip_whitespace();

        if self.dialect.consume_all_key_text() {
            let value = cursor.rest().trim_end().to_string();
            let value = self.continue_value(value, line)?;
            return Ok(Event::Key {
                name,
                value,
                comment: None,
            });
        }

        if let Some(quote) = cursor.peek().filter(|c| self.dialect.is_quote(*c)) {
            let (value, comment) = self.lex_quoted(cursor, position, quote)?;
            return Ok(Event::Key {
                name,
                value,
                comment,
            });
        }

        let value_start = cursor.pos();
        while let Some(c) = cursor.peek() {
            if self.dialect.accept_comment_after_key() && self.dialect.is_comment(c) {
                break;
            }
            cursor.bump();
        }
        let value = cursor.slice(value_start, cursor.pos()).trim().to_string();

        let comment = match cursor.bump() {
            Some(_) => Some(cursor.rest().trim().to_string()),
            None => None,
        };
        let value = if comment.is_none() {
            self.continue_value(value, line)?
        } else {
            value
        };

        Ok(Event::Key {
            name,
            value,
            comment,
        })
    }

    /// Quoted value: everything up to the matching quote, verbatim.
    fn lex_quoted(
        &mut self,
        cursor: &mut LineCursor<'_>,
        position: Position,
        quote: char,
    ) -> Result<(String, Option<String>), ParseError> {
        let open = cursor.pos();
        let open_position = Position::new(position.line, cursor.column());
        cursor.bump();

        let value_start = cursor.pos();
        loop {
            match cursor.peek() {
                None => {
                    return Err(self.error(
                        ParseErrorKind::UnterminatedQuote,
                        open_position,
                        open,
                    ));
                }
                Some(c) if c == quote => break,
                Some(_) => {
                    cursor.bump();
                }
            }
        }
        let value = cursor.slice(value_start, cursor.pos()).to_string();
        cursor.bump(); // closing quote

        let comment = self.trailing_comment(cursor)?;
        Ok((value, comment))
    }

    /// After a closing `]` or quote: nothing, or a comment.
    fn trailing_comment(&self, cursor: &mut LineCursor<'_>) -> Result<Option<String>, ParseError> {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => Ok(None),
            Some(c) if self.dialect.is_comment(c) => {
                cursor.bump();
                Ok(Some(cursor.rest().trim().to_string()))
            }
            Some(_) => {
                let position = Position::new(self.line_number, cursor.column());
                Err(self.error(ParseErrorKind::UnexpectedContent, position, cursor.pos()))
            }
        }
    }

    /// Join continuation lines onto `value` while it ends in `\`.
    ///
    /// `line` is the physical line `value` came from; later lines are read
    /// into `self.line`.
    fn continue_value(&mut self, mut value: String, line: &str) -> Result<String, ParseError> {
        if !self.dialect.line_continuation() {
            return Ok(value);
        }

        let mut marker_column = line.trim_end().chars().count() as u32;
        let mut marker_offset = self.line_start + line.trim_end().len() as u32;

        while value.ends_with('\\') {
            value.pop();
            let marker_line = self.line_number;
            if !self.next_line()? {
                return Err(ParseError::new(
                    ParseErrorKind::PrematureEndOfFile,
                    Position::new(marker_line, marker_column),
                    Span::new(marker_offset.saturating_sub(1), marker_offset),
                ));
            }
            let continued = self.line.trim_end();
            trace!("Continuation line {}: {:?}", self.line_number, continued);
            value.push_str(continued);
            marker_column = continued.chars().count() as u32;
            marker_offset = self.line_start + continued.len() as u32;
        }

        Ok(value)
    }

    /// Error located at byte `from` of the current line, spanning to its end.
    fn error(&self, kind: ParseErrorKind, position: Position, from: usize) -> ParseError {
        let start = self.line_start + from as u32;
        ParseError::new(kind, position, Span::new(start, self.line_end.max(start)))
    }
}

impl<R: BufRead> Iterator for Reader<R> {
    type Item = Result<Lexeme, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_lexeme().transpose()
    }
}

/// Character cursor over one physical line.
struct LineCursor<'a> {
    text: &'a str,
    /// Byte offset of the next character.
    pos: usize,
    /// 1-based column of the next character.
    column: u32,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            column: 1,
        }
    }

    #[inline]
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    #[inline]
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    #[inline]
    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn column(&self) -> u32 {
        self.column
    }
}
