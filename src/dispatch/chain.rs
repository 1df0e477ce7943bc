use super::{BoxError, Dispatcher};
use crate::params::Params;
use crate::pattern::MatchResult;
use crate::request::Request;
use crate::response::{ResponseWriter, DEFAULT_STATUS};

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::thread;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use tracing::{debug, error, warn};

/// The dispatch state of one request, handed from action to action.
///
/// Owning a `Chain` means holding control of the request. It can be moved
/// to another thread or task and resumed there with [`next`](Chain::next).
/// Dropping it without calling `next` ends the request: the response is
/// completed as-is.
pub struct Chain {
    dispatcher: Dispatcher,
    cursor: usize,
    request: Request,
    response: Box<dyn ResponseWriter>,
    error: Option<BoxError>,
    matched: bool,
    finished: bool,
}

impl Chain {
    pub(super) fn new(
        dispatcher: Dispatcher,
        request: Request,
        response: Box<dyn ResponseWriter>,
    ) -> Self {
        Self {
            dispatcher,
            cursor: 0,
            request,
            response,
            error: None,
            matched: false,
            finished: false,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    pub fn params(&self) -> &Params {
        self.request.params()
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.request.param(name)
    }

    pub fn response(&self) -> &dyn ResponseWriter {
        &*self.response
    }

    pub fn response_mut(&mut self) -> &mut dyn ResponseWriter {
        &mut *self.response
    }

    /// Index of the entry currently holding the chain.
    pub fn position(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    /// Flags the request as failed. Takes effect at the next advance.
    pub fn set_error(&mut self, err: impl Into<BoxError>) {
        self.error = Some(err.into());
    }

    pub fn fail(mut self, err: impl Into<BoxError>) {
        self.set_error(err);
        self.next()
    }

    /// Writes a complete response and stops the chain.
    pub fn send(mut self, status: StatusCode, body: impl AsRef<[u8]>) {
        let res = &mut *self.response;
        res.set_status(status);
        res.append_body(body.as_ref());
        self.finish()
    }

    /// Hands control to the next entry that matches the request.
    pub fn next(mut self) {
        let entries = Arc::clone(&self.dispatcher.entries);

        while self.error.is_none() && self.cursor < entries.len() {
            let index = self.cursor;
            self.cursor += 1;

            let entry = &entries[index];
            match entry.try_match(self.request.method(), self.request.path()) {
                MatchResult::NoMatch => continue,
                MatchResult::MatchWithParams(params) => self.request.params = params,
                MatchResult::MatchNoParams => self.request.params.clear(),
            }

            debug!(
                method = %self.request.method(),
                path = %self.request.path(),
                index,
                entry = %entry.method(),
                pattern = ?entry.pattern().source(),
                "route entry matched"
            );

            self.request.route_matched = entry.pattern().shared_source();
            self.matched = true;
            entry.invoke(self);
            return;
        }

        self.finish()
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Some(err) = self.error.take() {
            error!(
                method = %self.request.method(),
                path = %self.request.path(),
                route = ?self.request.route_matched(),
                error = %err,
                "request chain aborted"
            );

            let res = &mut *self.response;
            if res.is_ended() {
                warn!(path = %self.request.path(), "response already ended; error not delivered");
                return;
            }
            res.clear_body();
            res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
            res.set_header(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
            res.append_body(err.to_string().as_bytes());
            self.end_response();
            return;
        }

        if self.response.is_ended() {
            return;
        }

        if !self.matched && self.response.status() == DEFAULT_STATUS {
            if let Some(ref fallback) = self.dispatcher.fallback {
                fallback.serve(&self.request, &mut *self.response);
            }
        }

        if !self.response.is_ended() {
            self.end_response();
        }
    }

    fn end_response(&mut self) {
        if let Err(e) = self.response.end() {
            warn!(
                method = %self.request.method(),
                path = %self.request.path(),
                error = %e,
                "failed to end response"
            );
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if thread::panicking() && self.error.is_none() {
            self.error = Some("request handler panicked".into());
        }
        self.finish();
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("method", self.request.method())
            .field("path", &self.request.path())
            .field("position", &self.position())
            .field("error", &self.error.as_ref().map(|e| e.to_string()))
            .field("matched", &self.matched)
            .finish()
    }
}
