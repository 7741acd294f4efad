//! # tollgate
//!
//! A small HTTP service: one user-lookup endpoint behind a request logger and
//! a static-token check, built from composable middleware.
//!
//! ## Shape
//!
//! ```text
//! request → request_logger → require_token → router → get_user
//!                                  │
//!                                  └─ 401 Unauthorized (next never called)
//! ```
//!
//! - Handlers are `async fn(Request) -> impl IntoResponse`, erased into a
//!   shared [`BoxedHandler`](handler::BoxedHandler).
//! - A [`Middleware`] maps a handler to a handler. [`chain`] composes a list of
//!   them, first element outermost.
//! - The [`Router`] is the terminal handler, so middleware sees every request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use tollgate::{Config, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tollgate::Error> {
//!     let config = Config::from_env()?;
//!     Server::new(config.addr).serve(app(&config)).await
//! }
//! ```
//!
//! ```text
//! $ curl -H 'Authorization: 123' localhost:8080/users/42
//! User ID: 42
//! $ curl -i localhost:8080/users/42
//! HTTP/1.1 401 Unauthorized
//! ```

mod app;
mod config;
mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;
mod users;

pub mod handler;
pub mod middleware;

pub use app::app;
pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::{InvalidMethod, Method};
pub use middleware::{Middleware, chain};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use users::get_user;
