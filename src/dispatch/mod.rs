mod chain;

pub use self::chain::Chain;

use crate::entry::RouteEntry;
use crate::request::Request;
use crate::response::ResponseWriter;

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Last-resort responder for requests no entry matched.
pub trait Fallback: Send + Sync + 'static {
    fn serve(&self, req: &Request, res: &mut dyn ResponseWriter);
}

impl<F> Fallback for F
where
    F: Fn(&Request, &mut dyn ResponseWriter) + Send + Sync + 'static,
{
    fn serve(&self, req: &Request, res: &mut dyn ResponseWriter) {
        (self)(req, res)
    }
}

/// The frozen entry list of a router, shared read-only by every request.
///
/// Built by [`Router::build`](crate::Router::build); nothing can be
/// registered once a dispatcher exists.
#[derive(Clone)]
pub struct Dispatcher {
    entries: Arc<[RouteEntry]>,
    fallback: Option<Arc<dyn Fallback>>,
}

impl Dispatcher {
    pub(crate) fn new(entries: Vec<RouteEntry>, fallback: Option<Arc<dyn Fallback>>) -> Self {
        Self {
            entries: entries.into(),
            fallback,
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Runs `request` through the entries in registration order.
    ///
    /// Returns once the chain is either finished or held by an action that
    /// has not called `next` yet; in the latter case the response is
    /// completed from wherever the action resumes it.
    pub fn dispatch<W>(&self, request: Request, response: W)
    where
        W: ResponseWriter + 'static,
    {
        self.dispatch_boxed(request, Box::new(response))
    }

    pub fn dispatch_boxed(&self, request: Request, response: Box<dyn ResponseWriter>) {
        Chain::new(self.clone(), request, response).next()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("entries", &self.entries)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
