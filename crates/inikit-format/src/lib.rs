#![doc = include_str!("../README.md")]

use std::io::{self, Write};

use inikit_tree::Document;

mod options;
mod value;
mod writer;

pub use options::{LineEnding, WriteOptions};
pub use writer::IniWriter;

/// Write `document`: the preamble, then every section with its items.
pub fn write_document<W: Write>(
    document: &Document,
    options: &WriteOptions,
    out: W,
) -> io::Result<W> {
    let mut writer = IniWriter::new(out, options.clone());
    for item in document.preamble() {
        writer.write_item(item)?;
    }
    for section in document.sections() {
        writer.write_section_with_items(section)?;
    }
    writer.finish()
}

/// Write `document` in its own file type with native line endings.
pub fn write_document_native<W: Write>(document: &Document, out: W) -> io::Result<W> {
    let options = WriteOptions::new().dialect(document.file_type().clone());
    write_document(document, &options, out)
}

/// Format `document` in its own file type with `\n` line endings.
pub fn format_document(document: &Document) -> io::Result<String> {
    let options = WriteOptions::new()
        .dialect(document.file_type().clone())
        .line_ending(LineEnding::Lf);
    let bytes = write_document(document, &options, Vec::new())?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
