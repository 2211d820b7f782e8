use inikit_format::format_document;
use inikit_testhelpers::setup;
use inikit_tree::{Dialect, DialectKind, Document, Error, Item, ParseErrorKind};
use proptest::prelude::*;

#[test]
fn samba_document_loaded_as_standard_fails() {
    setup();
    let mut doc = Document::with_file_type(Dialect::samba());
    let section = doc.get_or_add_section("Pets");
    section.add_comment("my comment");
    section.set("dog", "rover");

    let text = format_document(&doc).unwrap();
    assert_eq!(text, "[Pets]\n# my comment\ndog = rover\n");

    let err = Document::parse_with(&text, Dialect::standard()).unwrap_err();
    match err {
        Error::Parse(err) => {
            assert_eq!(err.kind, ParseErrorKind::DialectMismatch { marker: '#' });
            assert_eq!(err.line_number(), 2);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }

    let reread = Document::parse_with(&text, Dialect::samba()).unwrap();
    assert_eq!(reread, doc);
}

#[test]
fn reformatting_is_stable() {
    let source = concat!(
        "; header\n",
        "\n",
        "[web] ; site\n",
        "  protocol = http\n",
        "padded = \"  x  \" ; keep\n",
        "[web]\n",
        "protocol = https\n",
    );
    let doc = Document::parse(source).unwrap();
    let once = format_document(&doc).unwrap();
    let twice = format_document(&Document::parse(&once).unwrap()).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        once,
        "; header\n\n[web] ; site\nprotocol = https\npadded = \"  x  \" ; keep\n"
    );
}

// Surrounding whitespace is not part of a comment once stored.
fn comment() -> impl Strategy<Value = String> {
    "[ \t]{0,2}[a-z]{0,6}( [a-z]{1,6}){0,2}[ \t]{0,2}"
}

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ;#=.\\\\-]{0,12}"
}

fn item() -> impl Strategy<Value = Item> {
    prop_oneof![
        comment().prop_map(Item::Comment),
        Just(Item::Blank),
        (
            "[a-z][a-z0-9_]{0,8}",
            value(),
            proptest::option::of(comment())
        )
            .prop_map(|(key, value, comment)| Item::KeyValue {
                key,
                value,
                comment
            }),
    ]
}

fn preamble_item() -> impl Strategy<Value = Item> {
    prop_oneof![comment().prop_map(Item::Comment), Just(Item::Blank)]
}

fn dialect() -> impl Strategy<Value = Dialect> {
    prop_oneof![
        Just(DialectKind::Standard),
        Just(DialectKind::Samba),
        Just(DialectKind::Python),
        Just(DialectKind::Mysql),
    ]
    .prop_map(Dialect::from)
}

type SectionParts = (String, Option<String>, Vec<Item>);

fn section() -> impl Strategy<Value = SectionParts> {
    (
        "[a-z][a-z0-9]{0,8}",
        proptest::option::of(comment()),
        proptest::collection::vec(item(), 0..6),
    )
}

fn build(dialect: Dialect, preamble: Vec<Item>, sections: Vec<SectionParts>) -> Document {
    let mut doc = Document::with_file_type(dialect);
    for item in preamble {
        match item {
            Item::Comment(text) => doc.add_comment(text),
            _ => doc.add_blank(),
        }
    }
    for (name, header_comment, items) in sections {
        let section = doc.get_or_add_section(&name);
        if section.comment().is_none() {
            section.set_comment(header_comment);
        }
        for item in items {
            match item {
                Item::Comment(text) => section.add_comment(text),
                Item::Blank => section.add_blank(),
                Item::KeyValue {
                    key,
                    value,
                    comment,
                } => {
                    section.set(key.clone(), value);
                    section.set_key_comment(&key, comment);
                }
            }
        }
    }
    doc
}

proptest! {
    #[test]
    fn format_then_parse_round_trips(
        dialect in dialect(),
        preamble in proptest::collection::vec(preamble_item(), 0..3),
        sections in proptest::collection::vec(section(), 0..4),
    ) {
        let doc = build(dialect.clone(), preamble, sections);
        let text = format_document(&doc).unwrap();
        let reread = Document::parse_with(&text, dialect).unwrap();
        prop_assert_eq!(reread.section_names(), doc.section_names());
        prop_assert_eq!(reread, doc, "formatted:\n{}", text);
    }
}
