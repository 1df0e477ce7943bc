use crate::response::{ResponseWriter, WriteError, DEFAULT_STATUS};

use std::mem;

use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use http::{HeaderMap, StatusCode};
use hyper::{Body, Response};
use tokio::sync::oneshot;

/// Buffers the response and hands it to the waiting service future on `end`.
#[derive(Debug)]
pub struct HyperWriter {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    tx: Option<oneshot::Sender<Response<Body>>>,
}

impl HyperWriter {
    pub fn new(tx: oneshot::Sender<Response<Body>>) -> Self {
        Self {
            status: DEFAULT_STATUS,
            headers: HeaderMap::new(),
            body: Vec::new(),
            tx: Some(tx),
        }
    }
}

impl ResponseWriter for HyperWriter {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn append_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    fn clear_body(&mut self) {
        self.body.clear();
    }

    fn is_ended(&self) -> bool {
        self.tx.is_none()
    }

    fn end(&mut self) -> Result<(), WriteError> {
        let tx = self.tx.take().ok_or(WriteError::AlreadyEnded)?;

        if !self.headers.contains_key(CONTENT_LENGTH) {
            self.headers
                .insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        }

        let mut res = Response::new(Body::from(mem::take(&mut self.body)));
        *res.status_mut() = self.status;
        *res.headers_mut() = mem::take(&mut self.headers);

        tx.send(res).map_err(|_| WriteError::Closed)
    }
}
