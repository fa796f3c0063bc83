//! [`Router`](crate::Router) matches requests against route patterns and
//! dispatches them to handlers.
//!
//! ```rust
//! use ligero::{Router, Request};
//! use hyper::body::Bytes;
//! use hyper::StatusCode;
//!
//! let router = Router::new("/api")
//!     .get("/hello/{user}", |req, res| {
//!         res.send(format!("Hello, {}", req.param("user").unwrap_or("stranger")));
//!         Ok(())
//!     });
//!
//! let req: Request = hyper::Request::get("/api/hello/gordon")
//!     .body(Bytes::new())
//!     .unwrap()
//!     .into();
//!
//! let res = router.dispatch(&req);
//! assert_eq!(res.status_code(), StatusCode::OK);
//! assert_eq!(res.body(), b"Hello, gordon");
//! ```
//!
//! The registered path, against which the router matches incoming requests,
//! can contain named parameters written as `{name}`. A parameter matches
//! exactly one path segment:
//! ```ignore
//!  Path: /user/{user}
//!
//!   /user/gordon              match
//!   /user/you                 match
//!   /user/gordon/profile      no match
//!   /user/                    no match
//! ```
//!
//! Routes are tried in the order they were registered, and the first one that
//! matches wins. Registering `/user/{user}` before `/user/new` means the
//! second route is never reached for `GET /user/new`.
//!
//! Requests that match no route go to the [fallback](Router::fallback) handler
//! if one is set, and get a `404 Not Found` otherwise.
use crate::error::{BoxError, Error, Result};
use crate::params::Params;
use crate::path::{normalize, normalize_context, strip_context};
use crate::request::{Request, RouteRequest};
use crate::response::Response;
use crate::service::MakeRouterService;
use crate::table::{canonical_method, Route, RouteTable};

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use hyper::Method;
use tracing::{debug, debug_span, error, info, warn};

/// What a handler returns. Any error is turned into a `500` response.
pub type HandlerResult = std::result::Result<(), BoxError>;

/// Represents an HTTP handler.
///
/// This trait is implemented for functions and closures taking the matched
/// request and the response to write into:
/// ```rust
/// # use ligero::{Handler, HandlerResult, Response, RouteRequest};
/// fn hello(_: &RouteRequest<'_>, res: &mut Response) -> HandlerResult {
///     res.send("hello");
///     Ok(())
/// }
///
/// let handler: Box<dyn Handler> = Box::new(hello);
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, req: &RouteRequest<'_>, res: &mut Response) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync,
{
    fn handle(&self, req: &RouteRequest<'_>, res: &mut Response) -> HandlerResult {
        self(req, res)
    }
}

/// Router dispatches requests to different handlers via configurable routes.
///
/// Routes are registered while building the router. Once it is serving, the
/// router is only read, so it can be shared between threads freely.
pub struct Router {
    context_path: String,
    table: RouteTable,
    fallback: Option<Box<dyn Handler>>,
}

impl Router {
    /// Creates a router for an application mounted under `context_path`.
    ///
    /// The context path is normalized, so `api/` and `/api` are equivalent,
    /// and an empty context path is the root.
    pub fn new(context_path: &str) -> Self {
        Router {
            context_path: normalize_context(context_path),
            table: RouteTable::default(),
            fallback: None,
        }
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    /// Registers a handler for a method and path, returning an error if the
    /// method or path is invalid.
    ///
    /// Method names are case-insensitive.
    /// ```rust
    /// use ligero::Router;
    ///
    /// let router = Router::default()
    ///     .try_handle("purge", "/cache/{key}", |_, res| {
    ///         res.send("purged");
    ///         Ok(())
    ///     })
    ///     .unwrap();
    ///
    /// assert!(Router::default()
    ///     .try_handle("GET", "/{id}/{id}", |_, _| Ok(()))
    ///     .is_err());
    /// ```
    pub fn try_handle<M, H>(mut self, method: M, path: &str, handler: H) -> Result<Self>
    where
        M: AsRef<str>,
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        let method = parse_method(method.as_ref())?;
        self.table.register(&method, path, Box::new(handler))?;

        info!(%method, path = %normalize(path), "route registered");
        Ok(self)
    }

    /// Insert a handler into the router for a specific path at the specified method.
    ///
    /// # Panics
    ///
    /// Panics if the method is not a valid HTTP method or if the path is not
    /// a valid pattern, for example when a parameter name is used twice.
    /// ```rust
    /// use ligero::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::default()
    ///     .handle(Method::GET, "/teapot", |_, res| {
    ///         res.send("I am a teapot!");
    ///         Ok(())
    ///     });
    /// ```
    pub fn handle<M, H>(self, method: M, path: &str, handler: H) -> Self
    where
        M: AsRef<str>,
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        match self.try_handle(method, path, handler) {
            Ok(router) => router,
            Err(err) => panic!("{}", err),
        }
    }

    /// Register a handler for `GET` requests
    pub fn get<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::GET, path, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::POST, path, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PUT, path, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PATCH, path, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete<H>(self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::DELETE, path, handler)
    }

    /// Handler called when no route matches. Setting it again replaces the
    /// previous one.
    ///
    /// The handler receives the request without path parameters.
    /// ```rust
    /// use ligero::Router;
    /// use hyper::StatusCode;
    ///
    /// let router = Router::default().fallback(|req, res| {
    ///     res.status(StatusCode::NOT_FOUND)
    ///         .json(&serde_json::json!({ "error": "not found", "path": req.path() }))?;
    ///     Ok(())
    /// });
    /// ```
    pub fn fallback<H>(mut self, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Lookup allows the manual lookup of a route for a specific method and
    /// path. The path is normalized and the context path removed, as it is
    /// when dispatching.
    /// ```rust
    /// use ligero::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::new("/api")
    ///     .get("/users/{id}", |_, _| Ok(()));
    ///
    /// let (route, params) = router.find(&Method::GET, "/api/users/7/").unwrap();
    /// assert_eq!(route.pattern().as_str(), "/users/{id}");
    /// assert_eq!(params.get("id"), Some("7"));
    /// ```
    pub fn find(&self, method: &Method, path: &str) -> Option<(&Route, Params)> {
        let path = strip_context(&normalize(path), &self.context_path);
        self.table.find(method, &path)
    }

    /// The routes registered for `method`, in the order they are tried.
    pub fn lookup(&self, method: &Method) -> &[Route] {
        self.table.lookup(method)
    }

    /// Lists every registered `(method, pattern)` pair.
    pub fn routes(&self) -> Vec<(&Method, &str)> {
        self.table.routes()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Routes a request and returns the response written for it.
    ///
    /// Handler errors and panics never escape: they are logged and answered
    /// with `500 Internal Server Error`.
    pub fn dispatch(&self, req: &Request) -> Response {
        let mut res = Response::new();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.route(req, &mut res)));

        let err = match outcome {
            Ok(Ok(())) => return res,
            Ok(Err(err)) => Error::Handler(err),
            Err(panic) => Error::Handler(panic_message(panic.as_ref()).into()),
        };

        error!(method = %req.method(), path = req.path(), error = %err, "request failed");
        Response::from_error(&err)
    }

    /// Converts the `Router` into a `Service` which you can serve directly
    /// with hyper.
    /// ```rust,no_run
    /// # use ligero::Router;
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let router = Router::default()
    ///     .get("/", |_, res| {
    ///         res.send("Hello, World!");
    ///         Ok(())
    ///     });
    ///
    /// hyper::Server::bind(&([127, 0, 0, 1], 3030).into())
    ///     .serve(router.into_service())
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService::new(self)
    }

    fn route(&self, req: &Request, res: &mut Response) -> HandlerResult {
        let method = canonical_method(req.method());
        let path = strip_context(&normalize(req.path()), &self.context_path);

        let span = debug_span!("dispatch", %method, path = %path);
        let _enter = span.enter();

        for route in self.table.lookup(&method) {
            match route.pattern().matches(&path) {
                Some(params) => {
                    debug!(route = route.pattern().as_str(), "route matched");
                    return route.handler().handle(&RouteRequest::new(req, params), res);
                }
                None => debug!(route = route.pattern().as_str(), "route did not match"),
            }
        }

        if let Some(fallback) = &self.fallback {
            debug!("no route matched, calling fallback");
            return fallback.handle(&RouteRequest::new(req, Params::default()), res);
        }

        let err = Error::NoRouteMatched {
            method,
            path: normalize(req.path()),
        };
        warn!("{}", err);
        *res = Response::from_error(&err);
        Ok(())
    }
}

/// A router mounted at the root.
impl Default for Router {
    fn default() -> Self {
        Router::new("/")
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("context_path", &self.context_path)
            .field("table", &self.table)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
        Error::InvalidMethod {
            method: method.to_owned(),
        }
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("handler panicked: {}", msg)
    } else {
        "handler panicked".to_owned()
    }
}
