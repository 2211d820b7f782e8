//! Deciding how a value must be written to survive re-reading.

use inikit_parse::Dialect;

/// How a value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueStyle {
    Bare,
    Quoted(char),
    /// Bare, with the key comment left off.
    BareWithoutComment,
    /// Needs quoting, but the dialect has no usable quote character.
    Unrepresentable,
}

/// Whether `value` would read back differently if written bare.
fn needs_quoting(value: &str, dialect: &Dialect) -> bool {
    if value.is_empty() {
        return false;
    }
    if value.trim() != value {
        return true;
    }
    if value.chars().next().is_some_and(|c| dialect.is_quote(c)) {
        return true;
    }
    if dialect.accept_comment_after_key() && value.chars().any(|c| dialect.is_comment(c)) {
        return true;
    }
    dialect.line_continuation() && value.ends_with('\\')
}

fn usable_quote(value: &str, dialect: &Dialect) -> Option<char> {
    if dialect.consume_all_key_text() {
        return None;
    }
    dialect
        .quote_chars()
        .iter()
        .copied()
        .find(|q| !value.contains(*q))
}

/// A trailing key comment only survives after a closing quote when the
/// dialect does not split comments off unquoted values. Where no quote can be
/// used the comment is given up, the value never is.
pub(crate) fn value_style(value: &str, dialect: &Dialect, has_comment: bool) -> ValueStyle {
    if needs_quoting(value, dialect) {
        return match usable_quote(value, dialect) {
            Some(quote) => ValueStyle::Quoted(quote),
            None => ValueStyle::Unrepresentable,
        };
    }
    if !has_comment || dialect.accept_comment_after_key() {
        return ValueStyle::Bare;
    }
    match usable_quote(value, dialect) {
        Some(quote) => ValueStyle::Quoted(quote),
        None => ValueStyle::BareWithoutComment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_values_are_bare() {
        let d = Dialect::standard();
        assert_eq!(value_style("rover", &d, false), ValueStyle::Bare);
        assert_eq!(value_style("", &d, false), ValueStyle::Bare);
        assert_eq!(value_style("a = b", &d, false), ValueStyle::Bare);
        assert_eq!(value_style("a \"b\"", &d, false), ValueStyle::Bare);
    }

    #[test]
    fn test_values_that_need_quotes() {
        let d = Dialect::standard();
        assert_eq!(value_style("  padded", &d, false), ValueStyle::Quoted('"'));
        assert_eq!(value_style("trailing ", &d, false), ValueStyle::Quoted('"'));
        assert_eq!(value_style("a;b", &d, false), ValueStyle::Quoted('"'));
    }

    #[test]
    fn test_comment_markers_only_matter_where_split() {
        let samba = Dialect::samba();
        assert_eq!(value_style("a;b#c", &samba, false), ValueStyle::Bare);
        assert_eq!(value_style("ends\\", &samba, false), ValueStyle::Quoted('"'));
        assert_eq!(value_style("v", &samba, true), ValueStyle::Quoted('"'));
        assert_eq!(value_style("v", &Dialect::standard(), true), ValueStyle::Bare);
    }

    #[test]
    fn test_comments_are_dropped_before_values() {
        let windows = Dialect::windows();
        assert_eq!(
            value_style("v ; not a comment", &windows, true),
            ValueStyle::BareWithoutComment
        );
        assert_eq!(value_style("v", &windows, false), ValueStyle::Bare);
        let samba = Dialect::samba();
        assert_eq!(
            value_style("say \"hi\"", &samba, true),
            ValueStyle::BareWithoutComment
        );
    }

    #[test]
    fn test_unrepresentable_values() {
        let d = Dialect::standard();
        assert_eq!(value_style("\"q", &d, false), ValueStyle::Unrepresentable);
        assert_eq!(value_style("\"q", &d, true), ValueStyle::Unrepresentable);
        assert_eq!(
            value_style(" x", &Dialect::windows(), false),
            ValueStyle::Unrepresentable
        );
        assert_eq!(
            value_style(" \"x\"", &d, false),
            ValueStyle::Unrepresentable
        );
        let two_quotes = Dialect::standard().with_quote_chars(['"', '\'']);
        assert_eq!(value_style(" \"x\"", &two_quotes, false), ValueStyle::Quoted('\''));
    }
}
