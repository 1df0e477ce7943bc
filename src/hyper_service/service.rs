use super::{park_body, BoxFuture, HyperWriter};
use crate::dispatch::{BoxError, Dispatcher};
use crate::request::Request;
use crate::response::WriteError;
use crate::router::Router;

use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use hyper::service::Service;
use hyper::Body;
use tokio::sync::oneshot;
use tracing::error;

type HyperRequest = hyper::Request<Body>;
type HyperResponse = hyper::Response<Body>;

/// A hyper service running every request through a shared dispatcher.
///
/// Cloning is cheap; clone one per connection.
#[derive(Debug, Clone)]
pub struct RouterService {
    dispatcher: Dispatcher,
}

impl RouterService {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl Service<HyperRequest> for RouterService {
    type Response = HyperResponse;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<HyperResponse, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: HyperRequest) -> Self::Future {
        let (parts, body) = req.into_parts();

        let mut request = Request::new(parts.method, parts.uri.path()).with_headers(parts.headers);
        park_body(&mut request, body);

        // the chain answers a panicking action with a 500 while unwinding
        let (tx, rx) = oneshot::channel();
        let dispatcher = &self.dispatcher;
        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
            dispatcher.dispatch(request, HyperWriter::new(tx))
        }));
        if dispatched.is_err() {
            error!("request handler panicked inside the router service");
        }

        Box::pin(async move {
            match rx.await {
                Ok(res) => Ok(res),
                Err(_) => Err(Box::new(WriteError::Closed) as BoxError),
            }
        })
    }
}

impl Dispatcher {
    pub fn into_service(self) -> RouterService {
        RouterService::new(self)
    }
}

impl Router {
    pub fn into_service(self) -> RouterService {
        self.build().into_service()
    }
}
