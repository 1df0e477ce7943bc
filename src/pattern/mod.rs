mod compiler;
mod error;

pub use self::compiler::{CompiledPattern, PatternCompiler};
pub use self::error::PatternError;

use crate::params::Params;

use std::sync::Arc;

use tracing::warn;

/// How much of the path a pattern has to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole path, with one optional trailing slash.
    Exact,
    /// A leading run of whole segments; used by middleware mounted at a path.
    Prefix,
}

#[derive(Debug)]
pub enum MatchResult {
    NoMatch,
    MatchWithParams(Params),
    MatchNoParams,
}

/// A route pattern as registered: the source text plus its compiled form.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: Option<Arc<str>>,
    mode: MatchMode,
    matcher: Matcher,
}

#[derive(Debug, Clone)]
enum Matcher {
    Any,
    Compiled(CompiledPattern),
    Invalid,
}

impl RoutePattern {
    pub fn any() -> Self {
        Self {
            source: None,
            mode: MatchMode::Prefix,
            matcher: Matcher::Any,
        }
    }

    /// Compiles `source`, turning a compile failure into a pattern that
    /// never matches.
    pub fn new(compiler: &PatternCompiler, source: Option<&str>, mode: MatchMode) -> Self {
        match Self::try_new(compiler, source, mode) {
            Ok(pattern) => pattern,
            Err(e) => {
                warn!(
                    pattern = %e.pattern(),
                    error = %e,
                    "route pattern failed to compile; route disabled"
                );
                Self {
                    source: source.map(Arc::from),
                    mode,
                    matcher: Matcher::Invalid,
                }
            }
        }
    }

    pub fn try_new(
        compiler: &PatternCompiler,
        source: Option<&str>,
        mode: MatchMode,
    ) -> Result<Self, PatternError> {
        let source = match source {
            None => return Ok(Self::any()),
            Some(s) => s,
        };
        let compiled = compiler.compile(source, mode)?;
        Ok(Self {
            source: Some(source.into()),
            mode,
            matcher: Matcher::Compiled(compiled),
        })
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub(crate) fn shared_source(&self) -> Option<Arc<str>> {
        self.source.clone()
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.matcher, Matcher::Invalid)
    }

    pub fn compiled(&self) -> Option<&CompiledPattern> {
        match self.matcher {
            Matcher::Compiled(ref c) => Some(c),
            _ => None,
        }
    }

    pub fn parameter_names(&self) -> &[Arc<str>] {
        match self.matcher {
            Matcher::Compiled(ref c) => c.names(),
            _ => &[],
        }
    }

    pub fn matches(&self, path: &str) -> MatchResult {
        match self.matcher {
            Matcher::Any => MatchResult::MatchNoParams,
            Matcher::Invalid => MatchResult::NoMatch,
            Matcher::Compiled(ref c) => match c.captures(path) {
                Some(params) => MatchResult::MatchWithParams(params),
                None => MatchResult::NoMatch,
            },
        }
    }
}
