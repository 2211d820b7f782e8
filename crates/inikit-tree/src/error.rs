use inikit_expand::ExpandError;
use inikit_parse::ParseError;

/// Errors from loading or editing a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The source could not be parsed.
    Parse(ParseError),
    /// No section with this name.
    SectionNotFound(String),
    /// A section with this name already exists.
    SectionExists(String),
    /// A value could not be expanded.
    Expand(ExpandError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{err}"),
            Error::SectionNotFound(name) => write!(f, "section `{name}` not found"),
            Error::SectionExists(name) => write!(f, "section `{name}` already exists"),
            Error::Expand(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Expand(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<ExpandError> for Error {
    fn from(err: ExpandError) -> Self {
        Error::Expand(err)
    }
}
