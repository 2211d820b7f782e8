/// Errors from resolving placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpandError {
    /// A value refers back to itself, directly or through other values.
    /// `chain` lists the references as `section|key`, ending with the repeat.
    Cycle { chain: Vec<String> },
    /// References nest deeper than the configured limit.
    DepthLimit { limit: usize },
}

impl std::fmt::Display for ExpandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpandError::Cycle { chain } => {
                write!(f, "reference cycle: {}", chain.join(" -> "))
            }
            ExpandError::DepthLimit { limit } => {
                write!(f, "references nest deeper than {limit} levels")
            }
        }
    }
}

impl std::error::Error for ExpandError {}
