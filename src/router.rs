//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. The router is the
//! terminal handler of the middleware chain: [`Router::into_handler`] turns it
//! into a [`BoxedHandler`], so every middleware sees every request, including
//! the ones that end in `404` or `405`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{self, BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Body of the `404` sent when no route matches the path under any method.
pub const NOT_FOUND_BODY: &str = "404 page not found";

/// The application router.
///
/// Build it once at startup. Each registration returns `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`:
    ///
    /// ```rust
    /// # use tollgate::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn delete_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,    "/users/{userID}", get_user)
    ///     .on(Method::Delete, "/users/{userID}", delete_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route for
    /// the same method. Routes are fixed at startup, so this is a programming
    /// error rather than a runtime condition.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler::boxed(handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Turns the routing table into the terminal handler of a chain.
    pub fn into_handler(self) -> BoxedHandler {
        let router = Arc::new(self);
        handler::boxed(move |mut req: Request| {
            let router = Arc::clone(&router);
            async move {
                let found = router.lookup(req.method(), req.path());
                match found {
                    Ok((handler, params)) => {
                        req.set_params(params);
                        handler.call(req).await
                    }
                    Err(rejection) => rejection,
                }
            }
        })
    }

    /// Finds the handler for `method` + `path`.
    ///
    /// `HEAD` falls back to the `GET` route. On a miss the error is the
    /// response to send: `405` with an `Allow` header when the path exists
    /// under other methods, `404 page not found` otherwise.
    fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Result<(BoxedHandler, HashMap<String, String>), Response> {
        let found = self.find(method, path).or_else(|| match method {
            Method::Head => self.find(&Method::Get, path),
            _ => None,
        });
        if let Some(hit) = found {
            return Ok(hit);
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        if allowed.is_empty() {
            return Err(Response::builder()
                .status(Status::NotFound)
                .text(NOT_FOUND_BODY));
        }

        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
        }
        allowed.sort();
        let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");

        Err(Response::builder()
            .status(Status::MethodNotAllowed)
            .header("allow", &allow)
            .text(Status::MethodNotAllowed.reason()))
    }

    fn find(&self, method: &Method, path: &str) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((Arc::clone(matched.value), params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn show_id(req: Request) -> String {
        format!("id={}", req.param("id").unwrap_or_default())
    }

    async fn created(_req: Request) -> Status {
        Status::Created
    }

    fn app() -> BoxedHandler {
        Router::new()
            .get("/items/{id}", show_id)
            .on(Method::Post, "/items/{id}", created)
            .into_handler()
    }

    #[tokio::test]
    async fn fills_path_params() {
        let res = app().call(Request::new(Method::Get, "/items/7")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"id=7");
    }

    #[tokio::test]
    async fn dispatches_by_method() {
        let res = app().call(Request::new(Method::Post, "/items/7")).await;
        assert_eq!(res.status_code(), 201);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let res = app().call(Request::new(Method::Get, "/nope")).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), b"404 page not found");
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let res = app().call(Request::new(Method::Delete, "/items/7")).await;
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.header("allow"), Some("GET, HEAD, POST"));
    }

    #[tokio::test]
    async fn extension_method_is_405_unless_routed() {
        let purge = Method::Extension("PURGE".into());

        let res = app().call(Request::new(purge.clone(), "/items/7")).await;
        assert_eq!(res.status_code(), 405);
        assert_eq!(res.header("allow"), Some("GET, HEAD, POST"));

        let routed = Router::new()
            .on(purge.clone(), "/items/{id}", created)
            .get("/items/{id}", show_id)
            .into_handler();
        assert_eq!(routed.call(Request::new(purge, "/items/7")).await.status_code(), 201);

        let res = routed.call(Request::new(Method::Put, "/items/7")).await;
        assert_eq!(res.header("allow"), Some("GET, HEAD, PURGE"));
    }

    #[tokio::test]
    async fn head_falls_back_to_get() {
        let res = app().call(Request::new(Method::Head, "/items/3")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"id=3");
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new().get("/a/{x}", show_id).get("/a/{y}", show_id);
    }
}
