//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops calling `listener.accept()`, so no new connections are made.
//! 2. Lets every in-flight connection task run to completion.
//! 3. Returns from [`Server::serve`].
//!
//! Request bodies are buffered up to [`MAX_BODY_BYTES`]; anything larger is
//! answered with `413` before it reaches the middleware chain. Stricter limits
//! belong in the reverse proxy (`client_max_body_size` in nginx).

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::handler::BoxedHandler;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// Largest request body the server buffers.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Parses `addr` as `host:port`.
    ///
    /// ```rust
    /// use tollgate::Server;
    /// assert!(Server::bind("0.0.0.0:8080").is_ok());
    /// assert!(Server::bind(":8080").is_err());
    /// ```
    pub fn bind(addr: &str) -> Result<Self, Error> {
        let parsed = addr.parse().map_err(|e| Error::addr(addr, e))?;
        Ok(Self::new(parsed))
    }

    /// Serves `app` until SIGTERM or Ctrl-C, then drains in-flight requests.
    pub async fn serve(self, app: BoxedHandler) -> Result<(), Error> {
        self.serve_with_shutdown(app, shutdown_signal()).await
    }

    /// Serves `app` until `signal` resolves, then drains in-flight requests.
    pub async fn serve_with_shutdown(
        self,
        app: BoxedHandler,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        run(listener, app, signal).await;
        Ok(())
    }
}

async fn run(listener: TcpListener, app: BoxedHandler, signal: impl Future<Output = ()>) {
    match listener.local_addr() {
        Ok(addr) => info!(%addr, "tollgate listening"),
        Err(e) => warn!("listening on unknown address: {e}"),
    }

    let mut tasks = tokio::task::JoinSet::new();

    tokio::pin!(signal);

    loop {
        tokio::select! {
            // Check shutdown first so a signal stops accepting even when more
            // connections are queued.
            biased;

            () = &mut signal => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let app = app.clone();
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    // Called once per request on the connection.
                    let svc = service_fn(move |req| dispatch(app.clone(), req));

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(%peer, "connection error: {e}");
                    }
                });
            }

            // Reap finished tasks so the set does not grow on long-running servers.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}

    info!("tollgate stopped");
}

/// Converts one hyper request, runs it through `app`, converts the response.
///
/// Never fails: problems with the request itself become `4xx` responses.
/// Every method token hyper accepts reaches `app`, including extensions
/// like `PURGE`, so middleware sees it before the router rejects it.
async fn dispatch(
    app: BoxedHandler,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    // hyper has already validated the token; this only guards the conversion.
    let Ok(method) = parts.method.as_str().parse::<Method>() else {
        return Ok(Response::status(Status::BadRequest).into_http());
    };

    let body = match read_body(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(rejection) => return Ok(rejection.into_http()),
    };

    // Non-UTF-8 header values cannot be compared as text and are dropped.
    let headers = parts.headers.iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|v| (name.as_str().to_owned(), v.to_owned()))
        })
        .collect();

    let request = Request::from_parts(method, parts.uri.path().to_owned(), headers, body);
    Ok(app.call(request).await.into_http())
}

/// Buffers `body`, or returns the response to send instead.
async fn read_body<B>(body: B, limit: usize) -> Result<Vec<u8>, Response>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes().to_vec()),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!(limit, "request body too large");
            Err(Response::builder()
                .status(Status::PayloadTooLarge)
                .text(Status::PayloadTooLarge.reason()))
        }
        Err(e) => {
            warn!("failed to read request body: {e}");
            Err(Response::status(Status::BadRequest))
        }
    }
}

/// Resolves on the first SIGTERM or SIGINT. Only Ctrl-C on non-Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
