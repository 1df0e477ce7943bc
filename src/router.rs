use crate::dispatch::{Dispatcher, Fallback};
use crate::entry::{Action, ActionKind, BoxAction, MethodFilter, RouteEntry};
use crate::pattern::{MatchMode, PatternCompiler, PatternError, RoutePattern};

use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub case_sensitive: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
        }
    }
}

/// Registration side of the router.
///
/// Entries are kept in registration order, which is the only precedence
/// rule at dispatch time. All registration must happen before
/// [`build`](Router::build); the resulting [`Dispatcher`] is immutable.
#[derive(Default)]
pub struct Router {
    compiler: PatternCompiler,
    entries: Vec<RouteEntry>,
    fallback: Option<Arc<dyn Fallback>>,
}

macro_rules! define_method {
    ($name:ident, $any:ident, $method:ident) => {
        pub fn $name(&mut self, pattern: &str, action: impl Action) -> &mut Self {
            self.route(Method::$method, pattern, action)
        }

        pub fn $any(&mut self, action: impl Action) -> &mut Self {
            self.route_any(Method::$method, action)
        }
    };
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            compiler: PatternCompiler::new().case_sensitive(options.case_sensitive),
            entries: Vec::new(),
            fallback: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn route(&mut self, method: Method, pattern: &str, action: impl Action) -> &mut Self {
        let pattern = RoutePattern::new(&self.compiler, Some(pattern), MatchMode::Exact);
        self.push(method.into(), pattern, ActionKind::Handler, Arc::new(action))
    }

    /// Registers `action` for every path requested with `method`.
    pub fn route_any(&mut self, method: Method, action: impl Action) -> &mut Self {
        self.push(method.into(), RoutePattern::any(), ActionKind::Handler, Arc::new(action))
    }

    pub fn try_route(
        &mut self,
        method: Method,
        pattern: &str,
        action: impl Action,
    ) -> Result<&mut Self, PatternError> {
        let pattern = RoutePattern::try_new(&self.compiler, Some(pattern), MatchMode::Exact)?;
        Ok(self.push(method.into(), pattern, ActionKind::Handler, Arc::new(action)))
    }

    define_method!(get, get_any, GET);
    define_method!(post, post_any, POST);
    define_method!(put, put_any, PUT);
    define_method!(delete, delete_any, DELETE);
    define_method!(patch, patch_any, PATCH);
    define_method!(head, head_any, HEAD);
    define_method!(options, options_any, OPTIONS);
    define_method!(connect, connect_any, CONNECT);
    define_method!(trace, trace_any, TRACE);

    pub fn all(&mut self, pattern: &str, action: impl Action) -> &mut Self {
        let pattern = RoutePattern::new(&self.compiler, Some(pattern), MatchMode::Exact);
        self.push(MethodFilter::Any, pattern, ActionKind::Handler, Arc::new(action))
    }

    pub fn all_any(&mut self, action: impl Action) -> &mut Self {
        self.push(MethodFilter::Any, RoutePattern::any(), ActionKind::Handler, Arc::new(action))
    }

    /// Middleware for every request.
    pub fn use_any(&mut self, middleware: impl Action) -> &mut Self {
        self.push(
            MethodFilter::Any,
            RoutePattern::any(),
            ActionKind::Middleware,
            Arc::new(middleware),
        )
    }

    /// Middleware for requests whose path starts with the segments of `prefix`.
    pub fn use_at(&mut self, prefix: &str, middleware: impl Action) -> &mut Self {
        let pattern = RoutePattern::new(&self.compiler, Some(prefix), MatchMode::Prefix);
        self.push(MethodFilter::Any, pattern, ActionKind::Middleware, Arc::new(middleware))
    }

    pub fn try_use_at(
        &mut self,
        prefix: &str,
        middleware: impl Action,
    ) -> Result<&mut Self, PatternError> {
        let pattern = RoutePattern::try_new(&self.compiler, Some(prefix), MatchMode::Prefix)?;
        Ok(self.push(MethodFilter::Any, pattern, ActionKind::Middleware, Arc::new(middleware)))
    }

    /// Appends every entry of `router` below `prefix`, keeping its order.
    pub fn mount(&mut self, prefix: &str, router: Router) -> &mut Self {
        if router.fallback.is_some() {
            debug!(prefix, "fallback of a mounted router is ignored");
        }
        for entry in router.entries {
            let (source, mode) = match entry.pattern().source() {
                Some(source) => (join_path(prefix, source), entry.pattern().mode()),
                None => (prefix.to_owned(), MatchMode::Prefix),
            };
            let pattern = RoutePattern::new(&self.compiler, Some(source.as_str()), mode);
            self.push(
                entry.method().clone(),
                pattern,
                entry.kind(),
                Arc::clone(entry.action()),
            );
        }
        self
    }

    pub fn nest(&mut self, prefix: &str, f: impl FnOnce(&mut Router)) -> &mut Self {
        let mut router = Self::new();
        f(&mut router);
        self.mount(prefix, router)
    }

    /// Sets the responder used when no entry matched a request.
    pub fn fallback(&mut self, fallback: impl Fallback) -> &mut Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.entries, self.fallback)
    }
}

impl Router {
    fn push(
        &mut self,
        method: MethodFilter,
        pattern: RoutePattern,
        kind: ActionKind,
        action: BoxAction,
    ) -> &mut Self {
        debug!(
            method = %method,
            pattern = ?pattern.source(),
            kind = ?kind,
            "route registered"
        );
        self.entries.push(RouteEntry::new(method, pattern, kind, action));
        self
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("compiler", &self.compiler)
            .field("entries", &self.entries)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn join_path(prefix: &str, pattern: &str) -> String {
    format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        pattern.trim_start_matches('/')
    )
}
