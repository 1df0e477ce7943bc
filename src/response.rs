use std::sync::{Arc, Mutex, MutexGuard};

use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH};
use http::{HeaderMap, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("response has already been ended")]
    AlreadyEnded,
    #[error("connection closed before the response was delivered")]
    Closed,
}

/// The response side of a request, owned by the chain while it runs.
///
/// `end` is expected to write `Content-Length` when no action set it.
pub trait ResponseWriter: Send {
    fn status(&self) -> StatusCode;
    fn set_status(&mut self, status: StatusCode);
    fn set_header(&mut self, name: HeaderName, value: HeaderValue);
    fn append_body(&mut self, bytes: &[u8]);
    fn clear_body(&mut self);
    fn is_ended(&self) -> bool;
    fn end(&mut self) -> Result<(), WriteError>;
}

/// Status every response starts with, until an action says otherwise.
pub const DEFAULT_STATUS: StatusCode = StatusCode::NOT_FOUND;

/// An in-memory [`ResponseWriter`]. Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recorded>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    pub ended: bool,
}

impl Default for Recorded {
    fn default() -> Self {
        Self {
            status: DEFAULT_STATUS,
            headers: HeaderMap::new(),
            body: Vec::new(),
            ended: false,
        }
    }
}

impl Recorded {
    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or("")
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Recorded {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ResponseWriter for Recorder {
    fn status(&self) -> StatusCode {
        self.lock().status
    }

    fn set_status(&mut self, status: StatusCode) {
        self.lock().status = status
    }

    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.lock().headers.insert(name, value);
    }

    fn append_body(&mut self, bytes: &[u8]) {
        self.lock().body.extend_from_slice(bytes)
    }

    fn clear_body(&mut self) {
        self.lock().body.clear()
    }

    fn is_ended(&self) -> bool {
        self.lock().ended
    }

    fn end(&mut self) -> Result<(), WriteError> {
        let mut rec = self.lock();
        if rec.ended {
            return Err(WriteError::AlreadyEnded);
        }
        if !rec.headers.contains_key(CONTENT_LENGTH) {
            let len = HeaderValue::from(rec.body.len());
            rec.headers.insert(CONTENT_LENGTH, len);
        }
        rec.ended = true;
        Ok(())
    }
}
