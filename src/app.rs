//! A configured server around a [`Router`].
use crate::config::Config;
use crate::error::{Error, Result};
use crate::request::RouteRequest;
use crate::response::Response;
use crate::router::{HandlerResult, Router};

use std::future::Future;

use tracing::{error, info};

/// An application: a [`Router`] mounted under the configured context path,
/// served by hyper.
///
/// ```rust,no_run
/// use ligero::{App, Config};
///
/// fn main() -> Result<(), ligero::Error> {
///     App::new(Config::default().with_port(8082).with_context_path("/api"))
///         .get("/greet/{name}", |req, res| {
///             res.json(&serde_json::json!({ "message": format!("Hello, {}!", req.param("name").unwrap_or("")) }))?;
///             Ok(())
///         })
///         .run()
/// }
/// ```
#[derive(Debug)]
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    pub fn new(config: Config) -> Self {
        let router = Router::new(&config.context_path);
        App { config, router }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Register a handler for `GET` requests. See [`Router::get`].
    pub fn get<H>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.get(path, handler);
        self
    }

    /// Register a handler for `POST` requests. See [`Router::post`].
    pub fn post<H>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.post(path, handler);
        self
    }

    /// Register a handler for `PUT` requests. See [`Router::put`].
    pub fn put<H>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.put(path, handler);
        self
    }

    /// Register a handler for `PATCH` requests. See [`Router::patch`].
    pub fn patch<H>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.patch(path, handler);
        self
    }

    /// Register a handler for `DELETE` requests. See [`Router::delete`].
    pub fn delete<H>(mut self, path: &str, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.delete(path, handler);
        self
    }

    /// Set the handler for unmatched requests. See [`Router::fallback`].
    pub fn fallback<H>(mut self, handler: H) -> Self
    where
        H: Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult + Send + Sync + 'static,
    {
        self.router = self.router.fallback(handler);
        self
    }

    /// Serves on a new tokio runtime until the process receives Ctrl+C.
    ///
    /// At most `workers` threads run handlers at the same time.
    pub fn run(self) -> Result<()> {
        self.config.validate()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .max_blocking_threads(self.config.workers)
            .enable_all()
            .build()?;

        runtime.block_on(self.serve_with_shutdown(shutdown_signal()))
    }

    /// Serves until `signal` completes, then waits for in-flight requests to
    /// finish.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.config.validate()?;
        let addr = self.config.socket_addr()?;

        for (method, path) in self.router.routes() {
            info!(%method, path, "route available");
        }
        if !self.router.has_fallback() {
            info!("no fallback handler, unmatched requests get 404");
        }

        let context_path = self.router.context_path().to_owned();
        let server = hyper::Server::try_bind(&addr)
            .map_err(Error::Serve)?
            .serve(self.router.into_service());

        info!(addr = %server.local_addr(), %context_path, "server listening");
        server
            .with_graceful_shutdown(signal)
            .await
            .map_err(Error::Serve)?;
        info!("server stopped");

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "unable to listen for shutdown signal");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::Method;

    #[test]
    fn routes_go_to_router() {
        let app = App::new(Config::default().with_context_path("/api"))
            .get("/", |_, _| Ok(()))
            .post("/datos", |_, _| Ok(()))
            .put("/datos/{id}", |_, _| Ok(()))
            .patch("/datos/{id}", |_, _| Ok(()))
            .delete("/datos/{id}", |_, _| Ok(()))
            .fallback(|_, _| Ok(()));

        assert_eq!(app.router().context_path(), "/api");
        assert!(app.router().has_fallback());
        assert_eq!(app.router().lookup(&Method::GET).len(), 1);
        assert_eq!(app.into_router().routes().len(), 5);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_binding() {
        let app = App::new(Config::default().with_workers(0));
        let result = app.serve_with_shutdown(async {}).await;
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn run_rejects_zero_workers() {
        let app = App::new(Config::default().with_workers(0).with_port(0));
        match app.run() {
            Err(Error::InvalidConfig { field, .. }) => assert_eq!(field, "workers"),
            other => panic!("expected invalid config, got {:?}", other),
        }
    }

    #[test]
    fn run_rejects_bad_host() {
        let mut config = Config::default().with_port(0);
        config.host = "not an ip".to_owned();
        assert!(matches!(App::new(config).run(), Err(Error::InvalidAddress(_))));
    }
}
