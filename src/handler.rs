//! Handler trait and type erasure.
//!
//! # From `async fn` to shared handler
//!
//! Routes, middleware, and the server all pass handlers around as a single
//! type, [`BoxedHandler`]. User code never names a concrete handler type:
//!
//! ```text
//! async fn get_user(req: Request) -> Response { … }   ← user writes this
//!        ↓ handler::boxed(get_user)  /  router.get(…, get_user)
//! Arc::new(FnHandler(get_user))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time                  ← one vtable dispatch
//! ```
//!
//! A middleware receives the next `BoxedHandler`, captures a clone of the
//! `Arc` in a new closure, and returns that closure boxed the same way. Nested
//! wrapping therefore costs one `Arc` clone and one virtual call per layer.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Send + 'static` lets tokio move the future between worker threads.
/// Middleware authors only see it as the return type of `next.call(req)`.
#[doc(hidden)]
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe dispatch interface behind [`BoxedHandler`].
///
/// Public because [`BoxedHandler`] is, but only ever implemented here;
/// callers reach it through `Arc<dyn ErasedHandler>` and never name it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Satisfied automatically by any function or closure with the shape
///
/// ```text
/// Fn(Request) -> impl Future<Output = impl IntoResponse>
/// ```
///
/// The trait is sealed; only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// Private, so no other crate can implement `Handler` on its own types.
mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Erases a handler into the shared [`BoxedHandler`] form.
///
/// This is how middleware builds the handler it hands back:
///
/// ```rust
/// use std::sync::Arc;
/// use tollgate::handler::{self, BoxedHandler};
/// use tollgate::Request;
///
/// fn passthrough(next: BoxedHandler) -> BoxedHandler {
///     handler::boxed(move |req: Request| {
///         let next = Arc::clone(&next);
///         async move { next.call(req).await }
///     })
/// }
/// ```
pub fn boxed(handler: impl Handler) -> BoxedHandler {
    handler.into_boxed_handler()
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // Run the synchronous part of the handler now; only the returned
        // future is boxed and polled later.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
