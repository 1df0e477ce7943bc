//! An ordered, middleware-chaining HTTP router.
//!
//! Routes are registered with Express-style patterns (`/users/:id`,
//! `/files/*`, `/opt/:name?`, `/n/(x)+`) and tried strictly in registration
//! order. Every entry whose method and pattern match gets a turn; each one
//! receives the request's [`Chain`] and decides whether to pass control on
//! with [`Chain::next`] or to stop there.
//!
//! ```
//! use express_router::{Chain, Method, Recorder, Request, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router
//!     .use_any(|mut chain: Chain| {
//!         chain.response_mut().set_header(
//!             http::header::SERVER,
//!             http::HeaderValue::from_static("express-router"),
//!         );
//!         chain.next()
//!     })
//!     .get("/hello/:name", |chain: Chain| {
//!         let body = format!("hello, {}!", chain.param("name").unwrap_or("world"));
//!         chain.send(StatusCode::OK, body)
//!     });
//!
//! let dispatcher = router.build();
//! let res = Recorder::new();
//! dispatcher.dispatch(Request::new(Method::GET, "/hello/rust"), res.clone());
//!
//! let rec = res.snapshot();
//! assert_eq!(rec.status, StatusCode::OK);
//! assert_eq!(rec.body_str(), "hello, rust!");
//! ```
//!
//! Registration is not synchronized with dispatch: build the router fully,
//! then [`Router::build`] freezes it into a [`Dispatcher`] that can be shared
//! across threads.

#![forbid(unsafe_code)]

mod dispatch;
mod entry;
mod params;
mod pattern;
mod request;
mod response;
mod router;
mod router_macro;

#[cfg(feature = "hyper-service")]
pub mod hyper_service;

pub use self::dispatch::{BoxError, Chain, Dispatcher, Fallback};
pub use self::entry::{Action, ActionKind, MethodFilter, RouteEntry};
pub use self::params::Params;
pub use self::pattern::{
    CompiledPattern, MatchMode, MatchResult, PatternCompiler, PatternError, RoutePattern,
};
pub use self::request::Request;
pub use self::response::{Recorded, Recorder, ResponseWriter, WriteError, DEFAULT_STATUS};
pub use self::router::{Router, RouterOptions};

pub use http::{Method, StatusCode};
