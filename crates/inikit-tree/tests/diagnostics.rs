use inikit_tree::{Dialect, Document, Error};

fn render(source: &str, dialect: Dialect) -> String {
    let err = Document::parse_with(source, dialect).unwrap_err();
    let rendered = err.render("test.ini", source);
    String::from_utf8(strip_ansi_escapes::strip(rendered)).unwrap()
}

#[test]
fn unterminated_section_points_at_bracket() {
    let out = render("; header\n[web\n", Dialect::standard());
    assert!(out.contains("unterminated section header"), "{out}");
    assert!(out.contains("test.ini:2:1"), "{out}");
    assert!(out.contains("section header opened here"), "{out}");
    assert!(out.contains("close the section name with ']'"), "{out}");
}

#[test]
fn dialect_mismatch_has_help() {
    let out = render("[Pets]\n# my comment\ndog = rover\n", Dialect::standard());
    assert!(out.contains("not a comment marker in this dialect"), "{out}");
    assert!(out.contains("test.ini:2:1"), "{out}");
    assert!(out.contains("load the file with the dialect it was written in"), "{out}");
}

#[test]
fn non_ascii_source_uses_byte_offsets() {
    let out = render("[größe]\nwert = \"offen\n", Dialect::standard());
    assert!(out.contains("unterminated quoted value"), "{out}");
    assert!(out.contains("test.ini:2:8"), "{out}");
}

#[test]
fn errors_without_location_still_render() {
    let mut doc = Document::new();
    let err = doc.rename_section("missing", "other").unwrap_err();
    assert_eq!(err, Error::SectionNotFound("missing".into()));
    let out = String::from_utf8(strip_ansi_escapes::strip(err.render("test.ini", ""))).unwrap();
    assert!(out.contains("section `missing` not found"), "{out}");
}
