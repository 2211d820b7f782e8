//! Lexical rules for the supported INI dialects.

/// The named dialect presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialectKind {
    /// `;` comments, `=` assignment, `"` quotes, trailing comments after values.
    #[default]
    Standard,
    /// Everything after the delimiter is the value, comment markers included.
    Windows,
    /// `#` and `;` comments, backslash line continuation, value-less keys.
    Samba,
    /// `:` as the primary assignment delimiter, `#` comments.
    Python,
    /// `#` comments, `=` or `:` assignment, value-less keys.
    Mysql,
}

impl DialectKind {
    /// All presets, in declaration order.
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Standard,
        DialectKind::Windows,
        DialectKind::Samba,
        DialectKind::Python,
        DialectKind::Mysql,
    ];

    /// Human-readable preset name.
    pub fn name(self) -> &'static str {
        match self {
            DialectKind::Standard => "standard",
            DialectKind::Windows => "windows",
            DialectKind::Samba => "samba",
            DialectKind::Python => "python",
            DialectKind::Mysql => "mysql",
        }
    }
}

/// An immutable bundle of lexical rules consumed by the [`Reader`](crate::Reader)
/// and by writers.
///
/// The first entry of each delimiter set is the *primary* delimiter, the one
/// a writer emits. Modified copies are made with the `with_*` methods:
///
/// ```
/// use inikit_parse::Dialect;
///
/// let dialect = Dialect::standard()
///     .with_comment_delimiters(['#', ';'])
///     .with_line_continuation(true);
/// assert_eq!(dialect.primary_comment(), '#');
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    comment_delimiters: Vec<char>,
    assign_delimiters: Vec<char>,
    quote_chars: Vec<char>,
    line_continuation: bool,
    accept_no_assignment: bool,
    accept_comment_after_key: bool,
    consume_all_key_text: bool,
    allow_duplicate_sections: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<DialectKind> for Dialect {
    fn from(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Standard => Self::standard(),
            DialectKind::Windows => Self::windows(),
            DialectKind::Samba => Self::samba(),
            DialectKind::Python => Self::python(),
            DialectKind::Mysql => Self::mysql(),
        }
    }
}

impl Dialect {
    /// `;` comments, `=` assignment, `"` quotes. Comments may follow a value.
    pub fn standard() -> Self {
        Self {
            comment_delimiters: vec![';'],
            assign_delimiters: vec!['='],
            quote_chars: vec!['"'],
            line_continuation: false,
            accept_no_assignment: false,
            accept_comment_after_key: true,
            consume_all_key_text: false,
            allow_duplicate_sections: true,
        }
    }

    /// Like Standard, but the value is all text after the delimiter: no quotes
    /// and no trailing comments.
    pub fn windows() -> Self {
        Self {
            quote_chars: Vec::new(),
            accept_comment_after_key: false,
            consume_all_key_text: true,
            ..Self::standard()
        }
    }

    /// Like Standard with `#` and `;` comments, `\` continuation and keys
    /// without a value. Comments only follow a closing quote.
    pub fn samba() -> Self {
        Self {
            comment_delimiters: vec!['#', ';'],
            line_continuation: true,
            accept_no_assignment: true,
            accept_comment_after_key: false,
            ..Self::standard()
        }
    }

    /// Like Standard with `#` and `;` comments and `:` or `=` assignment,
    /// `:` written. Comments only follow a closing quote.
    pub fn python() -> Self {
        Self {
            comment_delimiters: vec!['#', ';'],
            assign_delimiters: vec![':', '='],
            accept_comment_after_key: false,
            ..Self::standard()
        }
    }

    /// Like Standard with `#` comments, `=` or `:` assignment, `\` continuation
    /// and keys without a value. Comments only follow a closing quote.
    pub fn mysql() -> Self {
        Self {
            comment_delimiters: vec!['#'],
            assign_delimiters: vec!['=', ':'],
            line_continuation: true,
            accept_no_assignment: true,
            accept_comment_after_key: false,
            ..Self::standard()
        }
    }

    /// The preset this dialect is equal to, if any.
    pub fn kind(&self) -> Option<DialectKind> {
        DialectKind::ALL
            .into_iter()
            .find(|kind| Dialect::from(*kind) == *self)
    }

    /// Characters that start a comment, primary first.
    pub fn comment_delimiters(&self) -> &[char] {
        &self.comment_delimiters
    }

    /// Characters that separate a key from its value, primary first.
    pub fn assign_delimiters(&self) -> &[char] {
        &self.assign_delimiters
    }

    /// Characters that may enclose a value, primary first. Empty when quotes
    /// are not recognised.
    pub fn quote_chars(&self) -> &[char] {
        &self.quote_chars
    }

    /// Whether a value ending in `\` continues on the next line.
    pub fn line_continuation(&self) -> bool {
        self.line_continuation
    }

    /// Whether a line holding only a key is a key with an empty value.
    pub fn accept_no_assignment(&self) -> bool {
        self.accept_no_assignment
    }

    /// Whether a comment delimiter inside an unquoted value starts a comment.
    pub fn accept_comment_after_key(&self) -> bool {
        self.accept_comment_after_key
    }

    /// Whether the value is everything after the delimiter, taken verbatim.
    pub fn consume_all_key_text(&self) -> bool {
        self.consume_all_key_text
    }

    /// Whether a repeated section header continues the earlier section.
    pub fn allow_duplicate_sections(&self) -> bool {
        self.allow_duplicate_sections
    }

    /// Comment marker used when writing. Falls back to `;` for an empty set.
    pub fn primary_comment(&self) -> char {
        self.comment_delimiters.first().copied().unwrap_or(';')
    }

    /// Assignment delimiter used when writing. Falls back to `=` for an empty set.
    pub fn primary_assign(&self) -> char {
        self.assign_delimiters.first().copied().unwrap_or('=')
    }

    /// Quote character used when writing, if the dialect recognises quotes.
    pub fn primary_quote(&self) -> Option<char> {
        self.quote_chars.first().copied()
    }

    /// Whether `c` starts a comment.
    #[inline]
    pub fn is_comment(&self, c: char) -> bool {
        self.comment_delimiters.contains(&c)
    }

    /// Whether `c` is an assignment delimiter.
    #[inline]
    pub fn is_assign(&self, c: char) -> bool {
        self.assign_delimiters.contains(&c)
    }

    /// Whether `c` is a quote character.
    #[inline]
    pub fn is_quote(&self, c: char) -> bool {
        self.quote_chars.contains(&c)
    }

    /// Replace the comment delimiters. Repeats are dropped, order is kept.
    pub fn with_comment_delimiters(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.set_comment_delimiters(delimiters);
        self
    }

    /// Replace the assignment delimiters. Repeats are dropped, order is kept.
    pub fn with_assign_delimiters(mut self, delimiters: impl IntoIterator<Item = char>) -> Self {
        self.set_assign_delimiters(delimiters);
        self
    }

    /// Replace the quote characters. An empty set disables quoting.
    pub fn with_quote_chars(mut self, quotes: impl IntoIterator<Item = char>) -> Self {
        self.set_quote_chars(quotes);
        self
    }

    /// See [`Dialect::line_continuation`].
    pub fn with_line_continuation(mut self, enabled: bool) -> Self {
        self.line_continuation = enabled;
        self
    }

    /// See [`Dialect::accept_no_assignment`].
    pub fn with_accept_no_assignment(mut self, enabled: bool) -> Self {
        self.accept_no_assignment = enabled;
        self
    }

    /// See [`Dialect::accept_comment_after_key`].
    pub fn with_accept_comment_after_key(mut self, enabled: bool) -> Self {
        self.accept_comment_after_key = enabled;
        self
    }

    /// See [`Dialect::consume_all_key_text`].
    pub fn with_consume_all_key_text(mut self, enabled: bool) -> Self {
        self.consume_all_key_text = enabled;
        self
    }

    /// See [`Dialect::allow_duplicate_sections`].
    pub fn with_allow_duplicate_sections(mut self, enabled: bool) -> Self {
        self.allow_duplicate_sections = enabled;
        self
    }

    // The setters below are crate-private: outside the reader a dialect is a
    // value, changed only by making a new one.

    pub(crate) fn set_comment_delimiters(&mut self, delimiters: impl IntoIterator<Item = char>) {
        self.comment_delimiters = dedup(delimiters);
    }

    pub(crate) fn set_assign_delimiters(&mut self, delimiters: impl IntoIterator<Item = char>) {
        self.assign_delimiters = dedup(delimiters);
    }

    pub(crate) fn set_quote_chars(&mut self, quotes: impl IntoIterator<Item = char>) {
        self.quote_chars = dedup(quotes);
    }

    pub(crate) fn set_line_continuation(&mut self, enabled: bool) {
        self.line_continuation = enabled;
    }

    pub(crate) fn set_accept_no_assignment(&mut self, enabled: bool) {
        self.accept_no_assignment = enabled;
    }

    pub(crate) fn set_accept_comment_after_key(&mut self, enabled: bool) {
        self.accept_comment_after_key = enabled;
    }

    pub(crate) fn set_consume_all_key_text(&mut self, enabled: bool) {
        self.consume_all_key_text = enabled;
    }

    pub(crate) fn set_allow_duplicate_sections(&mut self, enabled: bool) {
        self.allow_duplicate_sections = enabled;
    }
}

/// Keep first occurrences, preserving order.
fn dedup(chars: impl IntoIterator<Item = char>) -> Vec<char> {
    let mut out = Vec::new();
    for c in chars {
        if !out.contains(&c) {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_round_trip_through_kind() {
        for kind in DialectKind::ALL {
            assert_eq!(Dialect::from(kind).kind(), Some(kind), "{}", kind.name());
        }
    }

    #[test]
    fn test_primary_delimiters() {
        assert_eq!(Dialect::standard().primary_assign(), '=');
        assert_eq!(Dialect::standard().primary_comment(), ';');
        assert_eq!(Dialect::python().primary_assign(), ':');
        assert_eq!(Dialect::python().primary_comment(), '#');
        assert_eq!(Dialect::mysql().primary_assign(), '=');
        assert_eq!(Dialect::mysql().primary_comment(), '#');
        assert_eq!(Dialect::samba().primary_comment(), '#');
        assert_eq!(Dialect::windows().primary_quote(), None);
    }

    #[test]
    fn test_with_methods_keep_order_and_dedup() {
        let d = Dialect::standard().with_assign_delimiters([':', '=', ':']);
        assert_eq!(d.assign_delimiters(), &[':', '=']);
        assert_eq!(d.kind(), None);
    }

    #[test]
    fn test_empty_sets_fall_back() {
        let d = Dialect::standard()
            .with_comment_delimiters([])
            .with_assign_delimiters([]);
        assert_eq!(d.primary_comment(), ';');
        assert_eq!(d.primary_assign(), '=');
        assert!(!d.is_comment(';'));
    }
}
