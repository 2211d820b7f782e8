//! Sections and their items.

use tracing::trace;

/// One line of a section body, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// A comment-only line; the text excludes the marker.
    Comment(String),
    /// A blank line.
    Blank,
    KeyValue {
        key: String,
        value: String,
        /// Trailing comment, when the dialect split one off the value.
        comment: Option<String>,
    },
}

impl Item {
    pub fn key(&self) -> Option<&str> {
        match self {
            Item::KeyValue { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Item::KeyValue { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// A named, ordered group of items.
///
/// Key names are unique within a section: [`set`](Section::set) on an
/// existing key changes its value where it stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
    pub(crate) name: String,
    comment: Option<String>,
    items: Vec<Item>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            items: Vec::new(),
        }
    }

    /// A section whose header carries a trailing comment.
    pub fn with_comment(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            comment: Some(trim_comment(comment.into())),
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename a section that is not yet part of a document.
    ///
    /// Sections inside a document are renamed with
    /// [`Document::rename_section`](crate::Document::rename_section).
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The header comment.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the header comment. Surrounding whitespace is not kept, as a
    /// reader would not return it.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment.map(trim_comment);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items, comments and blank lines included.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn key_count(&self) -> usize {
        self.items.iter().filter(|i| i.key().is_some()).count()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).and_then(|i| self.items[i].value())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Set `key` to `value`, in place if the key exists, appended otherwise.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.find(&key) {
            Some(index) => {
                if let Item::KeyValue { value: old, .. } = &mut self.items[index] {
                    *old = value;
                }
            }
            None => self.items.push(Item::KeyValue {
                key,
                value,
                comment: None,
            }),
        }
    }

    /// Like [`set`](Section::set), also replacing the key's trailing comment.
    pub(crate) fn upsert(&mut self, key: String, value: String, comment: Option<String>) {
        match self.find(&key) {
            Some(index) => {
                trace!("Key {:?} in [{}] overwritten", key, self.name);
                self.items[index] = Item::KeyValue {
                    key,
                    value,
                    comment,
                };
            }
            None => self.items.push(Item::KeyValue {
                key,
                value,
                comment,
            }),
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.find(key)?;
        match self.items.remove(index) {
            Item::KeyValue { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn key_comment(&self, key: &str) -> Option<&str> {
        match &self.items[self.find(key)?] {
            Item::KeyValue { comment, .. } => comment.as_deref(),
            _ => None,
        }
    }

    /// Replace the trailing comment of `key`. Returns `false` if there is no such key.
    pub fn set_key_comment(&mut self, key: &str, comment: Option<String>) -> bool {
        let Some(index) = self.find(key) else {
            return false;
        };
        if let Item::KeyValue { comment: old, .. } = &mut self.items[index] {
            *old = comment.map(trim_comment);
        }
        true
    }

    /// Append a comment line, trimmed.
    pub fn add_comment(&mut self, text: impl Into<String>) {
        self.items.push(Item::Comment(trim_comment(text.into())));
    }

    pub fn add_blank(&mut self) {
        self.items.push(Item::Blank);
    }

    /// Key names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.entries().map(|(k, _)| k.to_string()).collect()
    }

    /// Values in key insertion order.
    pub fn values(&self) -> Vec<String> {
        self.entries().map(|(_, v)| v.to_string()).collect()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().filter_map(|item| match item {
            Item::KeyValue { key, value, .. } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Fold `other` into this section: keys are upserted, comments and blank
    /// lines appended, and the header comment kept unless this one has none.
    pub(crate) fn merge(&mut self, other: Section) {
        if self.comment.is_none() {
            self.comment = other.comment;
        }
        for item in other.items {
            match item {
                Item::KeyValue {
                    key,
                    value,
                    comment,
                } => self.upsert(key, value, comment),
                other => self.items.push(other),
            }
        }
    }

    pub(crate) fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|i| i.key() == Some(key))
    }
}

/// Comment text as the reader hands it back.
pub(crate) fn trim_comment(text: String) -> String {
    let trimmed = text.trim();
    if trimmed.len() == text.len() {
        text
    } else {
        trimmed.to_string()
    }
}
