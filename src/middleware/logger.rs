//! Per-request access log.

use std::sync::Arc;

use tracing::info;

use crate::handler::{self, BoxedHandler};
use crate::request::Request;

/// Logs method and path, then delegates. No post-phase.
pub fn request_logger(next: BoxedHandler) -> BoxedHandler {
    handler::boxed(move |req: Request| {
        let next = Arc::clone(&next);
        async move {
            info!(method = %req.method(), path = %req.path(), "request");
            next.call(req).await
        }
    })
}
