//! Static-token authorization.
//!
//! Every request must carry `Authorization: <token>` with the configured
//! token, compared byte for byte. There is no scheme prefix and no trimming:
//! `Bearer 123` does not match `123`.

use std::sync::Arc;

use tracing::warn;

use crate::handler::{self, BoxedHandler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Token accepted when none is configured.
pub const DEFAULT_TOKEN: &str = "123";

/// Rejects requests whose `Authorization` header is not exactly `token`.
///
/// A missing header counts as the empty string. On mismatch the response is
/// `401` with body `Unauthorized` and `next` is never called.
pub fn require_token(token: impl Into<String>) -> impl Middleware {
    let token: Arc<str> = Arc::from(token.into());

    move |next: BoxedHandler| {
        let token = Arc::clone(&token);
        handler::boxed(move |req: Request| {
            let next = Arc::clone(&next);
            let authorized = req.header("authorization").unwrap_or_default() == &*token;
            async move {
                if !authorized {
                    warn!(method = %req.method(), path = %req.path(), "unauthorized request");
                    return unauthorized();
                }
                next.call(req).await
            }
        })
    }
}

fn unauthorized() -> Response {
    Response::builder()
        .status(Status::Unauthorized)
        .text(Status::Unauthorized.reason())
}
