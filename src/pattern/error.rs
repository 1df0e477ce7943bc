#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("invalid route pattern {pattern:?}: {source}")]
    InvalidRegex {
        pattern: Box<str>,
        #[source]
        source: regex::Error,
    },

    #[error("route pattern {pattern:?} has {found} capture groups but {expected} parameter names")]
    GroupCountMismatch {
        pattern: Box<str>,
        expected: usize,
        found: usize,
    },
}

impl PatternError {
    pub fn pattern(&self) -> &str {
        match self {
            Self::InvalidRegex { pattern, .. } => pattern,
            Self::GroupCountMismatch { pattern, .. } => pattern,
        }
    }
}
