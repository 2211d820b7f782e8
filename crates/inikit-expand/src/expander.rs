//! Placeholder resolution.

use tracing::trace;

use crate::{ExpandError, Lookup};

/// Nesting limit used by [`Expander::new`].
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Expands `${key}` and `${section|key}` placeholders against a [`Lookup`].
///
/// Stored values are never modified; each call works on a copy.
pub struct Expander<'a, L: ?Sized> {
    lookup: &'a L,
    max_depth: usize,
}

impl<'a, L: Lookup + ?Sized> Expander<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self {
            lookup,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Maximum number of nested references followed.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand `raw` as a value owned by `home_section`.
    pub fn expand(&self, raw: &str, home_section: &str) -> Result<String, ExpandError> {
        let mut stack = Vec::new();
        self.expand_in(raw, home_section, &mut stack)
    }

    /// Expand the stored value of `key` in `section`.
    ///
    /// Unlike [`expand`](Expander::expand), the key itself counts towards cycle
    /// detection, so `a = ${a}` is an error. Returns `Ok(None)` if the key
    /// does not exist.
    pub fn expand_key(&self, section: &str, key: &str) -> Result<Option<String>, ExpandError> {
        let Some(raw) = self.lookup.lookup(section, key) else {
            return Ok(None);
        };
        let mut stack = vec![(section.to_string(), key.to_string())];
        self.expand_in(raw, section, &mut stack).map(Some)
    }

    fn expand_in(
        &self,
        raw: &str,
        home_section: &str,
        stack: &mut Vec<(String, String)>,
    ) -> Result<String, ExpandError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(dollar) = rest.find('$') {
            out.push_str(&rest[..dollar]);
            let tail = &rest[dollar..];

            let Some(body) = tail.strip_prefix("${") else {
                out.push('$');
                rest = &tail[1..];
                continue;
            };

            let Some(close) = body.find('}') else {
                // Unclosed: the remainder is literal text.
                out.push_str(tail);
                rest = "";
                break;
            };

            let reference = &body[..close];
            let (section, key) = reference
                .split_once('|')
                .unwrap_or((home_section, reference));

            match self.lookup.lookup(section, key) {
                Some(value) => {
                    let resolved = self.resolve(section, key, value, stack)?;
                    out.push_str(&resolved);
                }
                None => {
                    trace!("Unresolved reference {section}|{key}");
                    out.push_str(&tail[..close + 3]);
                }
            }
            rest = &body[close + 1..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn resolve(
        &self,
        section: &str,
        key: &str,
        value: &str,
        stack: &mut Vec<(String, String)>,
    ) -> Result<String, ExpandError> {
        if stack.iter().any(|(s, k)| s == section && k == key) {
            let chain = stack
                .iter()
                .map(|(s, k)| format!("{s}|{k}"))
                .chain(std::iter::once(format!("{section}|{key}")))
                .collect();
            return Err(ExpandError::Cycle { chain });
        }
        if stack.len() >= self.max_depth {
            return Err(ExpandError::DepthLimit {
                limit: self.max_depth,
            });
        }

        stack.push((section.to_string(), key.to_string()));
        let resolved = self.expand_in(value, section, stack);
        stack.pop();

        if let Ok(resolved) = &resolved {
            trace!("Resolved {section}|{key} to {resolved:?}");
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand;
    use inikit_testhelpers::setup;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Table(BTreeMap<(String, String), String>);

    impl Table {
        fn with(mut self, section: &str, key: &str, value: &str) -> Self {
            self.0
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl Lookup for Table {
        fn lookup(&self, section: &str, key: &str) -> Option<&str> {
            self.0
                .get(&(section.to_string(), key.to_string()))
                .map(String::as_str)
        }
    }

    fn web() -> Table {
        Table::default()
            .with("web", "apache", "Apache implements ${protocol}")
            .with("web", "protocol", "http")
            .with("server", "domain", "${web|protocol}://example.org/")
    }

    #[test]
    fn test_home_section_reference() {
        setup();
        let t = web();
        assert_eq!(
            expand(&t, "Apache implements ${protocol}", "web").unwrap(),
            "Apache implements http"
        );
    }

    #[test]
    fn test_cross_section_reference() {
        let t = web();
        assert_eq!(
            expand(&t, "${web|protocol}://example.org/", "server").unwrap(),
            "http://example.org/"
        );
    }

    #[test]
    fn test_nested_references_expand_in_their_own_section() {
        let t = web();
        assert_eq!(
            Expander::new(&t).expand_key("server", "domain").unwrap(),
            Some("http://example.org/".to_string())
        );
        assert_eq!(
            expand(&t, "see ${web|apache}", "elsewhere").unwrap(),
            "see Apache implements http"
        );
    }

    #[test]
    fn test_adjacent_placeholders() {
        let t = Table::default()
            .with("s", "protocol", "http")
            .with("s", "version", "1.1");
        assert_eq!(
            expand(&t, "Protocol: ${protocol}${version}", "s").unwrap(),
            "Protocol: http1.1"
        );
    }

    #[test]
    fn test_unresolved_stays_literal() {
        let t = web();
        assert_eq!(
            expand(&t, "x ${missing} ${nope|protocol} y", "web").unwrap(),
            "x ${missing} ${nope|protocol} y"
        );
    }

    #[test]
    fn test_unclosed_and_stray_braces() {
        let t = web();
        assert_eq!(
            expand(&t, "} Apache implements ${protocol", "web").unwrap(),
            "} Apache implements ${protocol"
        );
        assert_eq!(
            expand(&t, "} Apache implements ${protocol}", "web").unwrap(),
            "} Apache implements http"
        );
        assert_eq!(expand(&t, "cost: $5 $", "web").unwrap(), "cost: $5 $");
    }

    #[test]
    fn test_doubled_dollar_is_not_an_escape() {
        let t = web();
        assert_eq!(
            expand(&t, "$${protocol} is ${protocol}", "web").unwrap(),
            "$http is http"
        );
    }

    #[test]
    fn test_first_pipe_splits() {
        let t = Table::default().with("a", "b|c", "deep");
        assert_eq!(expand(&t, "${a|b|c}", "x").unwrap(), "deep");
    }

    #[test]
    fn test_output_is_not_rescanned() {
        let t = Table::default()
            .with("s", "open", "${")
            .with("s", "other", "no");
        assert_eq!(expand(&t, "${open}other}", "s").unwrap(), "${other}");
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let t = Table::default().with("s", "a", "x${a}");
        assert_eq!(
            Expander::new(&t).expand_key("s", "a"),
            Err(ExpandError::Cycle {
                chain: vec!["s|a".into(), "s|a".into()]
            })
        );
    }

    #[test]
    fn test_mutual_reference_is_a_cycle() {
        let t = Table::default()
            .with("s", "a", "${t|b}")
            .with("t", "b", "${s|a}");
        let err = expand(&t, "${a}", "s").unwrap_err();
        assert_eq!(
            err,
            ExpandError::Cycle {
                chain: vec!["s|a".into(), "t|b".into(), "s|a".into()]
            }
        );
        assert_eq!(err.to_string(), "reference cycle: s|a -> t|b -> s|a");
    }

    #[test]
    fn test_depth_limit() {
        let mut t = Table::default();
        for i in 0..10 {
            t = t.with("s", &format!("k{i}"), &format!("${{k{}}}", i + 1));
        }
        t = t.with("s", "k10", "end");

        assert_eq!(expand(&t, "${k0}", "s").unwrap(), "end");
        assert_eq!(
            Expander::new(&t).max_depth(4).expand("${k0}", "s"),
            Err(ExpandError::DepthLimit { limit: 4 })
        );
    }

    #[test]
    fn test_missing_key() {
        let t = web();
        assert_eq!(Expander::new(&t).expand_key("web", "nothing"), Ok(None));
    }

    /// Holds for tables where no value ends in a bare `$` or an unclosed
    /// `${`, since those could pair up with the text that follows.
    fn nested() -> Table {
        Table::default()
            .with("s", "k0", "a ${k1} ${zz}")
            .with("s", "k1", "${k2}/${t|u}")
            .with("s", "k2", "x${k3}y")
            .with("s", "k3", "cost $5 }")
            .with("t", "u", "far ${missing} |")
    }

    fn fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z .:/]{0,4}",
            (0..4usize).prop_map(|i| format!("${{k{i}}}")),
            Just("${t|u}".to_string()),
            Just("${zz}".to_string()),
            Just("${nope|k0}".to_string()),
            Just("$".to_string()),
            Just("{".to_string()),
            Just("}".to_string()),
            Just("|".to_string()),
        ]
    }

    proptest! {
        #[test]
        fn text_without_dollar_is_unchanged(s in "[^$]*") {
            let t = web();
            prop_assert_eq!(expand(&t, &s, "web").unwrap(), s);
        }

        #[test]
        fn unresolvable_placeholders_are_unchanged(s in "[a-z ${}|]*") {
            let t = Table::default();
            prop_assert_eq!(expand(&t, &s, "web").unwrap(), s);
        }

        #[test]
        fn expanding_twice_changes_nothing(
            parts in proptest::collection::vec(fragment(), 0..12)
        ) {
            let t = nested();
            let raw = parts.concat();
            let once = expand(&t, &raw, "s").unwrap();
            let twice = expand(&t, &once, "s").unwrap();
            prop_assert_eq!(twice, once, "raw: {:?}", raw);
        }
    }
}
