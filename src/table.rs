//! Per-method route storage.
use crate::error::Result;
use crate::params::Params;
use crate::pattern::Pattern;
use crate::router::Handler;

use std::collections::HashMap;
use std::fmt;

use hyper::Method;

/// A compiled pattern and the handler it dispatches to.
pub struct Route {
    pattern: Pattern,
    handler: Box<dyn Handler>,
}

impl Route {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Routes grouped by method, each group in registration order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: HashMap<Method, Vec<Route>>,
}

impl RouteTable {
    /// Compiles `path` and appends it to the routes of `method`.
    pub fn register(
        &mut self,
        method: &Method,
        path: &str,
        handler: Box<dyn Handler>,
    ) -> Result<()> {
        let pattern = Pattern::compile(path)?;
        self.routes
            .entry(canonical_method(method))
            .or_insert_with(Vec::new)
            .push(Route { pattern, handler });
        Ok(())
    }

    /// The routes registered for `method`, in registration order.
    pub fn lookup(&self, method: &Method) -> &[Route] {
        self.routes
            .get(&canonical_method(method))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the first route for `method` matching the normalized `path`,
    /// along with the parameters it binds.
    pub fn find(&self, method: &Method, path: &str) -> Option<(&Route, Params)> {
        self.lookup(method)
            .iter()
            .find_map(|route| route.pattern.matches(path).map(|params| (route, params)))
    }

    /// Lists every registered `(method, pattern)` pair.
    ///
    /// Methods are sorted by name; patterns keep their registration order.
    pub fn routes(&self) -> Vec<(&Method, &str)> {
        let mut methods = self.routes.keys().collect::<Vec<_>>();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        methods
            .into_iter()
            .flat_map(|method| {
                self.routes[method]
                    .iter()
                    .map(move |route| (method, route.pattern.as_str()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Upper-cases extension methods so `get` and `GET` share the same routes.
pub(crate) fn canonical_method(method: &Method) -> Method {
    let name = method.as_str();
    if !name.bytes().any(|b| b.is_ascii_lowercase()) {
        return method.clone();
    }

    Method::from_bytes(name.to_ascii_uppercase().as_bytes()).unwrap_or_else(|_| method.clone())
}
