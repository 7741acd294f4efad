//! End-to-end behaviour of the composed service handler.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tollgate::handler::BoxedHandler;
use tollgate::middleware::{self, request_logger, require_token};
use tollgate::{Config, Method, Middleware, Request, Router, app, chain, get_user};

fn lookup(token: Option<&str>) -> Request {
    let req = Request::new(Method::Get, "/users/42");
    match token {
        Some(t) => req.with_header("Authorization", t),
        None => req,
    }
}

/// The production stack with a terminal handler that counts its calls.
fn counted() -> (BoxedHandler, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let routes = Router::new().get("/users/{userID}", move |req: Request| {
        counter.fetch_add(1, Ordering::SeqCst);
        get_user(req)
    });

    let handler = chain(vec![
        middleware::boxed(request_logger),
        middleware::boxed(require_token("123")),
    ])
    .wrap(routes.into_handler());

    (handler, calls)
}

#[tokio::test]
async fn authorized_lookup_echoes_id() {
    let (handler, calls) = counted();

    let res = handler.call(lookup(Some("123"))).await;

    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"User ID: 42");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn wrong_token_never_reaches_handler() {
    let (handler, calls) = counted();

    let res = handler.call(lookup(Some("wrong"))).await;

    assert_eq!(res.status_code(), 401);
    assert_eq!(res.body(), b"Unauthorized");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (handler, calls) = counted();

    let res = handler.call(lookup(None)).await;

    assert_eq!(res.status_code(), 401);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn id_is_taken_verbatim() {
    let handler = app(&Config::default());

    let req = Request::new(Method::Get, "/users/al%20ice").with_header("authorization", "123");
    let res = handler.call(req).await;

    assert_eq!(res.body(), b"User ID: al%20ice");
}

#[tokio::test]
async fn auth_applies_to_unrouted_paths() {
    let handler = app(&Config::default());

    let anonymous = handler.call(Request::new(Method::Get, "/missing")).await;
    let authorized = handler
        .call(Request::new(Method::Get, "/missing").with_header("authorization", "123"))
        .await;

    assert_eq!(anonymous.status_code(), 401);
    assert_eq!(authorized.status_code(), 404);
    assert_eq!(authorized.body(), b"404 page not found");
}

#[tokio::test]
async fn extension_methods_pass_through_the_chain() {
    let (handler, calls) = counted();
    let purge = Method::Extension("PURGE".into());

    let anonymous = handler.call(Request::new(purge.clone(), "/users/42")).await;
    let authorized = handler
        .call(Request::new(purge, "/users/42").with_header("authorization", "123"))
        .await;

    assert_eq!(anonymous.status_code(), 401);
    assert_eq!(authorized.status_code(), 405);
    assert_eq!(authorized.header("allow"), Some("GET, HEAD"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_get_on_user_route_is_405() {
    let handler = app(&Config::default());

    let req = Request::new(Method::Post, "/users/42").with_header("authorization", "123");
    let res = handler.call(req).await;

    assert_eq!(res.status_code(), 405);
    assert_eq!(res.header("allow"), Some("GET, HEAD"));
}

#[tokio::test]
async fn configured_token_replaces_default() {
    let config = Config { auth_token: "s3cret".to_owned(), ..Config::default() };
    let handler = app(&config);

    let old = handler.call(lookup(Some("123"))).await;
    let new = handler.call(lookup(Some("s3cret"))).await;

    assert_eq!(old.status_code(), 401);
    assert_eq!(new.status_code(), 200);
}
