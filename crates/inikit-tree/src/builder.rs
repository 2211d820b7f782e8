//! Document construction from reader lexemes.

use inikit_parse::{Dialect, Event, Lexeme, ParseError, ParseErrorKind};
use tracing::trace;

use crate::{Document, Item, Section};

/// Builds a [`Document`] from a stream of lexemes.
///
/// Repeated section headers continue the existing section; repeated keys
/// overwrite the earlier value where it stands.
pub struct DocumentBuilder {
    document: Document,
    /// Index of the section receiving items.
    current: Option<usize>,
}

impl DocumentBuilder {
    /// A builder whose document will use `file_type` for writing.
    pub fn new(file_type: Dialect) -> Self {
        Self {
            document: Document::with_file_type(file_type),
            current: None,
        }
    }

    /// Feed one lexeme.
    pub fn lexeme(&mut self, lexeme: Lexeme) -> Result<(), ParseError> {
        match lexeme.event {
            Event::Section { name, comment } => {
                let sections = &mut self.document.sections;
                let index = match sections.get_index_of(&name) {
                    Some(index) => {
                        trace!("Section [{}] continued at {}", name, lexeme.position);
                        index
                    }
                    None => sections.insert_full(name.clone(), Section::new(name)).0,
                };
                if let Some((_, section)) = sections.get_index_mut(index)
                    && section.comment().is_none()
                {
                    section.set_comment(comment);
                }
                self.current = Some(index);
            }
            Event::Key {
                name,
                value,
                comment,
            } => {
                let section = self
                    .current
                    .and_then(|index| self.document.sections.get_index_mut(index))
                    .map(|(_, section)| section);
                match section {
                    Some(section) => section.upsert(name, value, comment),
                    None => {
                        return Err(ParseError::new(
                            ParseErrorKind::KeyOutsideSection,
                            lexeme.position,
                            lexeme.span,
                        ));
                    }
                }
            }
            Event::Empty { comment } => {
                let item = match comment {
                    Some(text) => Item::Comment(text),
                    None => Item::Blank,
                };
                match self
                    .current
                    .and_then(|index| self.document.sections.get_index_mut(index))
                {
                    Some((_, section)) => section.push(item),
                    None => self.document.preamble.push(item),
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Document {
        self.document
    }
}
