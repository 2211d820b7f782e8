//! Test helpers shared by the inikit crates.
//!
//! Error expectations are written inline, under the offending source line:
//!
//! ```text
//! [Main
//! ^ UnterminatedSection
//! ```
//!
//! The first caret gives the expected column, the word after the carets the
//! expected error kind. Annotation lines are removed before parsing.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`; silent by default.
pub fn setup() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An error reported by the code under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActualError {
    /// 1-based line in the source without annotations.
    pub line: u32,
    /// 1-based character column.
    pub column: u32,
    pub kind: String,
}

impl std::fmt::Display for ActualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.kind)
    }
}

/// Parse an annotation line: leading whitespace, one or more `^`, then a kind.
fn parse_annotation(line: &str) -> Option<(u32, String)> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('^') {
        return None;
    }
    let column = line.chars().take_while(|c| c.is_whitespace()).count() as u32 + 1;
    let kind = trimmed.trim_start_matches('^').trim();
    if kind.is_empty() {
        return None;
    }
    Some((column, kind.to_string()))
}

/// Skip the newline that follows an opening `r#"`.
fn strip_leading_newline(annotated: &str) -> &str {
    annotated.strip_prefix('\n').unwrap_or(annotated)
}

/// The source with every annotation line removed.
pub fn source_without_annotations(annotated: &str) -> String {
    let mut out = String::new();
    for line in strip_leading_newline(annotated).split_inclusive('\n') {
        if parse_annotation(line.trim_end_matches(['\r', '\n'])).is_none() {
            out.push_str(line);
        }
    }
    out
}

/// The errors an annotated source expects, in source order.
pub fn expected_errors(annotated: &str) -> Vec<ActualError> {
    let mut errors = Vec::new();
    let mut source_line = 0;
    for line in strip_leading_newline(annotated).lines() {
        match parse_annotation(line) {
            Some((column, kind)) => errors.push(ActualError {
                line: source_line,
                column,
                kind,
            }),
            None => source_line += 1,
        }
    }
    errors
}

/// Assert that `actual` matches the annotations exactly, in order.
#[track_caller]
pub fn assert_annotated_errors(annotated: &str, actual: Vec<ActualError>) {
    let expected = expected_errors(annotated);
    if expected != actual {
        let render = |errors: &[ActualError]| {
            errors
                .iter()
                .map(|e| format!("  {e}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        panic!(
            "error mismatch\nsource:\n{}\nexpected:\n{}\nactual:\n{}",
            source_without_annotations(annotated),
            render(&expected),
            render(&actual),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotations_are_removed() {
        let annotated = "\n[a]\nkey\n^^^ MissingAssignment\nnext = 1\n";
        assert_eq!(source_without_annotations(annotated), "[a]\nkey\nnext = 1\n");
    }

    #[test]
    fn test_expected_errors_refer_to_preceding_line() {
        let annotated = "\n; c\n  [x\n  ^ UnterminatedSection\n";
        assert_eq!(
            expected_errors(annotated),
            vec![ActualError {
                line: 2,
                column: 3,
                kind: "UnterminatedSection".into(),
            }]
        );
    }

    #[test]
    fn test_bare_carets_are_source() {
        assert_eq!(source_without_annotations("^^^\n"), "^^^\n");
    }

    #[test]
    #[should_panic(expected = "error mismatch")]
    fn test_mismatch_panics() {
        assert_annotated_errors("\nx\n^ Oops\n", Vec::new());
    }
}
