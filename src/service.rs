//! Glue between hyper and the [`Router`].
//!
//! The body is read asynchronously, then the request is dispatched on tokio's
//! blocking pool, since handlers are plain synchronous functions.
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::future::{self, BoxFuture};
use futures_util::{ready, FutureExt};
use hyper::service::Service;
use hyper::Body;
use tracing::{error, warn};

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl MakeRouterService {
    pub(crate) fn new(router: Router) -> Self {
        MakeRouterService(RouterService(Arc::new(router)))
    }
}

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = Infallible;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(Arc<Router>);

impl RouterService {
    /// The router behind this service.
    pub fn router(&self) -> &Router {
        &self.0
    }
}

impl Service<hyper::Request<Body>> for RouterService {
    type Response = hyper::Response<Body>;
    type Error = Infallible;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: hyper::Request<Body>) -> Self::Future {
        ResponseFut {
            inner: serve(self.0.clone(), req).boxed(),
        }
    }
}

/// Future returned by [`RouterService`].
pub struct ResponseFut {
    inner: BoxFuture<'static, hyper::Response<Body>>,
}

impl Future for ResponseFut {
    type Output = Result<hyper::Response<Body>, Infallible>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let res = ready!(self.inner.as_mut().poll(cx));
        Poll::Ready(Ok(res))
    }
}

async fn serve(router: Arc<Router>, req: hyper::Request<Body>) -> hyper::Response<Body> {
    let (parts, body) = req.into_parts();
    let body = match hyper::body::to_bytes(body).await {
        Ok(body) => body,
        Err(err) => {
            let err = Error::Body(err);
            warn!(error = %err, "failed to read request body");
            return Response::from_error(&err).into_hyper();
        }
    };

    let req = Request::from_parts(parts, body);
    match tokio::task::spawn_blocking(move || router.dispatch(&req)).await {
        Ok(res) => res.into_hyper(),
        Err(err) => {
            let err = Error::Handler(err.into());
            error!(error = %err, "dispatch task failed");
            Response::from_error(&err).into_hyper()
        }
    }
}
