#![doc = include_str!("../README.md")]

mod error;
pub use error::ExpandError;

mod expander;
pub use expander::{DEFAULT_MAX_DEPTH, Expander};

/// Read access to raw (unexpanded) values by section and key.
pub trait Lookup {
    fn lookup(&self, section: &str, key: &str) -> Option<&str>;
}

impl<T: Lookup + ?Sized> Lookup for &T {
    fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        (**self).lookup(section, key)
    }
}

/// Expand `raw` as if it were a value of `home_section`, with default limits.
pub fn expand<L: Lookup + ?Sized>(
    lookup: &L,
    raw: &str,
    home_section: &str,
) -> Result<String, ExpandError> {
    Expander::new(lookup).expand(raw, home_section)
}
