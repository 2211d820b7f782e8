use std::io::Read;

use inikit_parse::{Dialect, DialectKind, Reader};

fn main() {
    let kind = match std::env::args().nth(1).as_deref() {
        Some("windows") => DialectKind::Windows,
        Some("samba") => DialectKind::Samba,
        Some("python") => DialectKind::Python,
        Some("mysql") => DialectKind::Mysql,
        _ => DialectKind::Standard,
    };

    let mut source = String::new();
    std::io::stdin().read_to_string(&mut source).unwrap();

    println!("=== Events ({}) ===", kind.name());
    for lexeme in Reader::from_str(&source, Dialect::from(kind)) {
        match lexeme {
            Ok(lexeme) => println!("{}: {:?}", lexeme.position, lexeme.event),
            Err(err) => println!("error: {err}"),
        }
    }
}
