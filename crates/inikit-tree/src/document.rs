//! The document: an ordered map of sections.

use std::io::BufRead;

use indexmap::IndexMap;
use indexmap::map::Entry;
use inikit_expand::{Expander, Lookup};
use inikit_parse::{Dialect, Reader};
use tracing::trace;

use crate::section::trim_comment;
use crate::{DocumentBuilder, Error, Item, Section};

/// An INI document.
///
/// Sections keep the order in which they first appeared. Names are unique:
/// adding a section whose name exists merges into the existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    /// Comments and blank lines before the first section header.
    pub(crate) preamble: Vec<Item>,
    pub(crate) sections: IndexMap<String, Section>,
    file_type: Dialect,
}

impl Document {
    /// An empty document written in the standard dialect.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_type(file_type: Dialect) -> Self {
        Self {
            file_type,
            ..Self::default()
        }
    }

    /// Parse `source` in the standard dialect.
    pub fn parse(source: &str) -> Result<Self, Error> {
        Self::parse_with(source, Dialect::standard())
    }

    /// Parse `source` in `dialect`, which also becomes the file type.
    pub fn parse_with(source: &str, dialect: Dialect) -> Result<Self, Error> {
        Self::from_reader(source.as_bytes(), dialect)
    }

    /// Parse a buffered stream in `dialect`, which also becomes the file type.
    pub fn from_reader<R: BufRead>(source: R, dialect: Dialect) -> Result<Self, Error> {
        let mut reader = Reader::new(source, dialect.clone());
        let mut builder = DocumentBuilder::new(dialect);
        while let Some(lexeme) = reader.next_lexeme()? {
            builder.lexeme(lexeme)?;
        }
        Ok(builder.finish())
    }

    /// Replace the content with `source`, parsed in this document's file type.
    ///
    /// On error the document is left unchanged.
    pub fn load<R: BufRead>(&mut self, source: R) -> Result<(), Error> {
        let loaded = Self::from_reader(source, self.file_type.clone())?;
        self.preamble = loaded.preamble;
        self.sections = loaded.sections;
        Ok(())
    }

    /// The dialect used when writing.
    pub fn file_type(&self) -> &Dialect {
        &self.file_type
    }

    pub fn set_file_type(&mut self, file_type: Dialect) {
        self.file_type = file_type;
    }

    pub fn preamble(&self) -> &[Item] {
        &self.preamble
    }

    pub fn preamble_mut(&mut self) -> &mut Vec<Item> {
        &mut self.preamble
    }

    /// Append a trimmed comment line to the preamble.
    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.preamble
            .push(Item::Comment(trim_comment(text.into())));
    }

    /// Append a blank line to the preamble.
    pub fn add_blank(&mut self) {
        self.preamble.push(Item::Blank);
    }

    /// Add `section`, merging into an existing section of the same name.
    pub fn add_section(&mut self, section: Section) -> &mut Section {
        match self.sections.entry(section.name.clone()) {
            Entry::Occupied(entry) => {
                trace!("Merging into existing section [{}]", section.name);
                let existing = entry.into_mut();
                existing.merge(section);
                existing
            }
            Entry::Vacant(entry) => entry.insert(section),
        }
    }

    /// The section called `name`, created empty if missing.
    pub fn get_or_add_section(&mut self, name: &str) -> &mut Section {
        self.sections
            .entry(name.to_string())
            .or_insert_with(|| Section::new(name))
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.get_mut(name)
    }

    /// The section at ordinal position `index`.
    pub fn section_at(&self, index: usize) -> Option<&Section> {
        self.sections.get_index(index).map(|(_, s)| s)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.values()
    }

    pub fn section_names(&self) -> Vec<String> {
        self.sections.keys().cloned().collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Remove a section, keeping the order of the others.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.sections.shift_remove(name)
    }

    /// Rename a section, keeping its position and items.
    pub fn rename_section(&mut self, old: &str, new: &str) -> Result<(), Error> {
        let Some(index) = self.sections.get_index_of(old) else {
            return Err(Error::SectionNotFound(old.to_string()));
        };
        if old == new {
            return Ok(());
        }
        if self.sections.contains_key(new) {
            return Err(Error::SectionExists(new.to_string()));
        }

        if let Some(mut section) = self.sections.shift_remove(old) {
            section.name = new.to_string();
            self.sections.shift_insert(index, new.to_string(), section);
        }
        Ok(())
    }

    /// Raw value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections.get(section)?.get(key)
    }

    /// Set `key` in `section`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl Into<String>) {
        self.get_or_add_section(section).set(key, value);
    }

    pub fn remove_key(&mut self, section: &str, key: &str) -> Option<String> {
        self.sections.get_mut(section)?.remove(key)
    }

    /// Key names of `section`; empty if there is no such section.
    pub fn keys(&self, section: &str) -> Vec<String> {
        self.sections.get(section).map(Section::keys).unwrap_or_default()
    }

    /// Values of `section`; empty if there is no such section.
    pub fn values(&self, section: &str) -> Vec<String> {
        self.sections
            .get(section)
            .map(Section::values)
            .unwrap_or_default()
    }

    /// Value of `key` in `section` with `${...}` placeholders resolved.
    pub fn get_expanded(&self, section: &str, key: &str) -> Result<Option<String>, Error> {
        Ok(Expander::new(self).expand_key(section, key)?)
    }
}

impl Lookup for Document {
    fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)
    }
}
