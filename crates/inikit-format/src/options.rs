//! Options for writing INI documents.

use inikit_parse::Dialect;

/// Line terminator written after every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n` on Windows, `\n` elsewhere.
    #[default]
    Native,
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Native if cfg!(windows) => "\r\n",
            LineEnding::Native | LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Options for INI serialization.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Dialect whose primary delimiters and quoting rules are used.
    pub dialect: Dialect,

    /// Line terminator (default: native)
    pub line_ending: LineEnding,

    /// Surround the assignment delimiter with spaces (default: true)
    pub pad_assign: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::standard(),
            line_ending: LineEnding::Native,
            pad_assign: true,
        }
    }
}

impl WriteOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Write `key=value` instead of `key = value`.
    pub fn compact(mut self) -> Self {
        self.pad_assign = false;
        self
    }
}
