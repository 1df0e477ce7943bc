use crate::params::Params;

use std::sync::Arc;

use http::{Extensions, HeaderMap, Method};

/// The request as seen by the router and by every action in the chain.
///
/// The router only reads the method and path. Transports put whatever else
/// actions need (the body, connection info) into the extensions.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    extensions: Extensions,
    pub(crate) params: Params,
    pub(crate) route_matched: Option<Arc<str>>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            extensions: Extensions::new(),
            params: Params::new(),
            route_matched: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Parameters captured by the entry being invoked. Not carried over
    /// from earlier entries.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Pattern text of the most recently matched entry.
    pub fn route_matched(&self) -> Option<&str> {
        self.route_matched.as_deref()
    }
}
