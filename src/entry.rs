use crate::dispatch::Chain;
use crate::pattern::{MatchResult, RoutePattern};

use std::fmt;
use std::sync::Arc;

use http::Method;

/// Something the chain can hand control to.
///
/// The action owns the [`Chain`] it is given: calling [`Chain::next`]
/// passes control forward, dropping it ends the request here.
pub trait Action: Send + Sync + 'static {
    fn call(&self, chain: Chain);
}

impl<F> Action for F
where
    F: Fn(Chain) + Send + Sync + 'static,
{
    fn call(&self, chain: Chain) {
        (self)(chain)
    }
}

pub type BoxAction = Arc<dyn Action>;

/// Handler and middleware are invoked the same way; the kind is kept for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Handler,
    Middleware,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    Any,
    Only(Method),
}

impl MethodFilter {
    #[inline]
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(m) => m == method,
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(m: Method) -> Self {
        Self::Only(m)
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ALL"),
            Self::Only(m) => f.write_str(m.as_str()),
        }
    }
}

/// One registered (verb, pattern, action) tuple.
#[derive(Clone)]
pub struct RouteEntry {
    method: MethodFilter,
    pattern: RoutePattern,
    kind: ActionKind,
    action: BoxAction,
}

impl RouteEntry {
    pub fn new(
        method: MethodFilter,
        pattern: RoutePattern,
        kind: ActionKind,
        action: BoxAction,
    ) -> Self {
        Self {
            method,
            pattern,
            kind,
            action,
        }
    }

    pub fn method(&self) -> &MethodFilter {
        &self.method
    }

    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub(crate) fn action(&self) -> &BoxAction {
        &self.action
    }

    pub fn try_match(&self, method: &Method, path: &str) -> MatchResult {
        if !self.method.allows(method) {
            return MatchResult::NoMatch;
        }
        self.pattern.matches(path)
    }

    pub fn invoke(&self, chain: Chain) {
        self.action.call(chain)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.source())
            .field("kind", &self.kind)
            .finish()
    }
}
