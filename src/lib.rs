//! # Ligero
//!
//! Ligero is a minimal HTTP request router built on [hyper](https://hyper.rs).
//!
//! It matches the method and path of a request against registered route
//! patterns, extracts the named parameters, and dispatches to the handler of
//! the first matching route. Requests nobody claims go to an optional fallback
//! handler, or get a `404 Not Found`.
//!
//! ## Features
//!
//! **Named parameters:** Give a path segment a name, `/users/{id}`, and the
//! router delivers its value to the handler through [`RouteRequest::param`].
//!
//! **Context path:** Mount an application under a base path such as `/api`
//! and declare routes without it. Requests for `/api/users/7` are matched
//! against `/users/7`.
//!
//! **Path normalization:** Duplicate and trailing slashes are ignored, so
//! `//users//7/` reaches the same route as `/users/7`.
//!
//! **Predictable precedence:** Routes are tried in registration order and the
//! first match wins, even if a later route is more specific.
//!
//! **Failures stay inside:** Handler errors and panics are logged and turned
//! into a `500 Internal Server Error`; the connection is never dropped.
//!
//! ## Usage
//!
//! Here is a simple example:
//!
//! ```rust,no_run
//! use ligero::{App, Config, HandlerResult, Response, RouteRequest};
//!
//! fn index(_: &RouteRequest<'_>, res: &mut Response) -> HandlerResult {
//!     res.send("Hello, World!");
//!     Ok(())
//! }
//!
//! fn hello(req: &RouteRequest<'_>, res: &mut Response) -> HandlerResult {
//!     res.send(format!("Hello, {}", req.param("user").unwrap_or("stranger")));
//!     Ok(())
//! }
//!
//! fn main() -> Result<(), ligero::Error> {
//!     App::new(Config::default().with_port(3000))
//!         .get("/", index)
//!         .get("/hello/{user}", hello)
//!         .run()
//! }
//! ```
//!
//! ### Named parameters
//!
//! As you can see, `{user}` is a *named parameter*. The values are accessible
//! via [`RouteRequest::params`].
//!
//! Named parameters only match a single path segment:
//!
//! ```ignore
//! Pattern: /user/{user}
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! ### Responses
//!
//! Handlers write into a [`Response`]. Status and headers can be set until
//! the first byte of the body is written; JSON bodies go through `serde_json`:
//!
//! ```rust
//! use ligero::Router;
//! use hyper::StatusCode;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User<'a> {
//!     id: &'a str,
//! }
//!
//! let router = Router::default()
//!     .post("/users/{id}", |req, res| {
//!         let id = req.param("id").unwrap_or_default();
//!         res.status(StatusCode::CREATED).json(&User { id })?;
//!         Ok(())
//!     })
//!     .get("/old", |_, res| {
//!         res.redirect("/new");
//!         Ok(())
//!     });
//! ```
//!
//! ### Not Found Handler
//!
//! Requests which could not be matched by this router go to the
//! [`Router::fallback`] handler:
//!
//! ```rust
//! use ligero::Router;
//! use hyper::StatusCode;
//!
//! let router = Router::default().fallback(|req, res| {
//!     res.status(StatusCode::NOT_FOUND)
//!         .send(format!("nothing at {}", req.path()));
//!     Ok(())
//! });
//! ```
//!
//! ## Logging
//!
//! Ligero logs through [`tracing`](https://docs.rs/tracing). Install a
//! subscriber, such as `tracing-subscriber`, to see registered routes,
//! per-request matching at `debug` level, and handler failures.

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod error;
pub mod params;
pub mod path;
pub mod pattern;
pub mod request;
pub mod response;

#[doc(hidden)]
pub mod router;

#[doc(hidden)]
pub mod service;

pub mod table;

#[doc(inline)]
pub use app::App;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use error::{BoxError, Error, Result};

#[doc(inline)]
pub use params::Params;

#[doc(inline)]
pub use request::{Request, RouteRequest};

#[doc(inline)]
pub use response::Response;

#[doc(inline)]
pub use router::{Handler, HandlerResult, Router};
