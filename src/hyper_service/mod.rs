//! Serving a [`Dispatcher`](crate::Dispatcher) with hyper.
//!
//! The request body is not read by the router. It is parked in the
//! request's extensions and can be claimed once with [`take_body`].
//!
//! A panic inside an action that runs synchronously in `call` is caught and
//! answered with a 500. A panic in a task the action spawned stays in that
//! task; the chain it held still ends the response with a 500 when dropped.

mod service;
mod writer;

pub use self::service::RouterService;
pub use self::writer::HyperWriter;

use crate::request::Request;

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use hyper::Body;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

struct RequestBody(Mutex<Option<Body>>);

pub fn take_body(req: &Request) -> Option<Body> {
    let slot = req.extensions().get::<RequestBody>()?;
    let mut guard = slot.0.lock().unwrap_or_else(|e| e.into_inner());
    guard.take()
}

pub(crate) fn park_body(req: &mut Request, body: Body) {
    req.extensions_mut()
        .insert(RequestBody(Mutex::new(Some(body))));
}
