//! Middleware and chain composition.
//!
//! A middleware is a function from the next handler to a new handler that
//! wraps it. Anything of shape `Fn(BoxedHandler) -> BoxedHandler` qualifies,
//! so a plain `fn` item works as middleware:
//!
//! ```rust
//! use std::sync::Arc;
//! use tollgate::handler::{self, BoxedHandler};
//! use tollgate::middleware::{self, chain, Middleware};
//! use tollgate::Request;
//!
//! fn timing(next: BoxedHandler) -> BoxedHandler {
//!     handler::boxed(move |req: Request| {
//!         let next = Arc::clone(&next);
//!         async move {
//!             let started = std::time::Instant::now();   // pre-phase
//!             let res = next.call(req).await;
//!             let _elapsed = started.elapsed();          // post-phase
//!             res
//!         }
//!     })
//! }
//!
//! let stack = chain(vec![
//!     middleware::boxed(timing),
//!     middleware::boxed(middleware::require_token("123")),
//! ]);
//! # let terminal = handler::boxed(|_req: Request| async { "ok" });
//! let app = stack.wrap(terminal);
//! ```
//!
//! # Ordering
//!
//! The first middleware listed is the outermost: it runs its pre-phase before
//! every other layer and its post-phase after every other layer has returned.
//! A middleware that returns without calling `next` ends the request there;
//! nothing inside it runs.

pub mod auth;
pub mod logger;

use std::sync::Arc;

use crate::handler::BoxedHandler;

pub use auth::require_token;
pub use logger::request_logger;

/// Wraps a handler in another handler.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

impl<F> Middleware for F
where
    F: Fn(BoxedHandler) -> BoxedHandler + Send + Sync + 'static,
{
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        self(next)
    }
}

/// A type-erased middleware, as stored in a chain.
pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn boxed(middleware: impl Middleware) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Composes `middlewares` into one middleware, first element outermost.
///
/// Applying the result to `h` gives `m[0](m[1](…m[n-1](h)))`, built in one
/// pass from the last element to the first. An empty chain hands `h` back
/// untouched. Composition itself has no side effects, so the result can be
/// applied once at startup and the handler it yields shared by every request.
pub fn chain(middlewares: Vec<BoxedMiddleware>) -> impl Middleware {
    move |handler: BoxedHandler| {
        middlewares.iter().rev().fold(handler, |next, m| m.wrap(next))
    }
}
